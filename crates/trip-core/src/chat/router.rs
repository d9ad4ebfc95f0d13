//! Subscription router: binds exactly one live topic listener to the
//! conversation currently open in the UI.
//!
//! Invariant: the previous listener is always released before the next
//! one is attached, so stale deliveries from an earlier topic can never
//! land in the newly active conversation. Calls are synchronous on the
//! single-threaded event loop, so two rapid switches resolve to the
//! most recently requested conversation with exactly one listener.

use crate::ports::ChatTransport;

pub struct SubscriptionRouter {
    active: Option<String>,
}

impl SubscriptionRouter {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// The conversation currently holding the topic listener.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, conversation_id: &str) -> bool {
        self.active.as_deref() == Some(conversation_id)
    }

    /// Unsubscribe the current listener (if any), then subscribe the
    /// topic for `conversation_id`. `None` or an empty id only
    /// unsubscribes.
    pub fn set_active(&mut self, transport: &dyn ChatTransport, conversation_id: Option<&str>) {
        let next = conversation_id.filter(|id| !id.is_empty());
        if self.active.as_deref() == next {
            return;
        }

        if let Some(previous) = self.active.take() {
            transport.unsubscribe(&previous);
        }

        if let Some(id) = next {
            transport.subscribe(id);
            self.active = Some(id.to_string());
        }
    }

    /// Release the listener without attaching a new one.
    pub fn clear(&mut self, transport: &dyn ChatTransport) {
        self.set_active(transport, None);
    }
}

impl Default for SubscriptionRouter {
    fn default() -> Self {
        Self::new()
    }
}
