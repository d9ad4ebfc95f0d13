//! Connection lifecycle state machine.
//!
//! One live broker session exists per authenticated app lifetime,
//! independent of which conversation is open. The manager here is pure:
//! it decides states and retry delays, while the platform socket
//! adapter owns the actual WebSocket and drives the timers.
//!
//! Retry policy: capped exponential backoff with no attempt limit —
//! the session always eventually retries. Once the delay hits the cap
//! the state becomes `Offline` so the UI can surface it, but retrying
//! continues unchanged underneath.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session and no attempt in flight
    Disconnected,
    /// Handshake in flight
    Connecting,
    /// Live session established
    Connected,
    /// Still retrying, but backoff has reached its cap
    Offline,
}

/// Backoff schedule for the connection handshake — the only retried
/// operation in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_ms: u32,
    pub max_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_ms: 3_000,
            max_ms: 60_000,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (0-based): doubles each
    /// failure, saturating at `max_ms`.
    pub fn delay_for(&self, attempt: u32) -> u32 {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_ms
            .saturating_mul(factor)
            .min(self.max_ms)
    }
}

pub struct ConnectionManager {
    policy: ReconnectPolicy,
    state: ConnectionState,
    failures: u32,
}

impl ConnectionManager {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// A handshake is starting. Keeps `Offline` visible while an
    /// attempt beyond the cap is in flight.
    pub fn attempt_started(&mut self) {
        if self.state != ConnectionState::Offline {
            self.state = ConnectionState::Connecting;
        }
    }

    /// Handshake succeeded; the backoff schedule resets.
    pub fn established(&mut self) {
        self.state = ConnectionState::Connected;
        self.failures = 0;
    }

    /// The session dropped or the handshake failed. Returns the delay
    /// in milliseconds before the next attempt.
    pub fn lost(&mut self) -> u32 {
        let delay = self.policy.delay_for(self.failures);
        self.failures = self.failures.saturating_add(1);
        self.state = if delay >= self.policy.max_ms {
            ConnectionState::Offline
        } else {
            ConnectionState::Disconnected
        };
        delay
    }

    /// Deliberate teardown (logout, unmount). No retry follows.
    pub fn closed(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.failures = 0;
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}
