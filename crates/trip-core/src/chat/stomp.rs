//! Minimal STOMP 1.2 frame codec.
//!
//! Covers the subset the broker conversation uses: CONNECT/CONNECTED,
//! SUBSCRIBE/UNSUBSCRIBE, SEND, MESSAGE, DISCONNECT, ERROR. Frames are
//! command + headers + body, NUL-terminated; header values use the
//! standard backslash escaping. Lone newlines on the wire are
//! heart-beats and are filtered out before decoding.

use trip_types::{Result, TripError};

const TOPIC_PREFIX: &str = "/topic/conversations/";

/// Broker topic for one conversation's live updates.
pub fn topic_for(conversation_id: &str) -> String {
    format!("{}{}", TOPIC_PREFIX, conversation_id)
}

/// Inverse of [`topic_for`]: extract the conversation id a MESSAGE
/// frame's destination addresses.
pub fn conversation_from_topic(destination: &str) -> Option<&str> {
    destination
        .strip_prefix(TOPIC_PREFIX)
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Send,
    Message,
    Disconnect,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Send => "SEND",
            Command::Message => "MESSAGE",
            Command::Disconnect => "DISCONNECT",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Option<Command> {
        match s {
            "CONNECT" => Some(Command::Connect),
            "CONNECTED" => Some(Command::Connected),
            "SUBSCRIBE" => Some(Command::Subscribe),
            "UNSUBSCRIBE" => Some(Command::Unsubscribe),
            "SEND" => Some(Command::Send),
            "MESSAGE" => Some(Command::Message),
            "DISCONNECT" => Some(Command::Disconnect),
            "RECEIPT" => Some(Command::Receipt),
            "ERROR" => Some(Command::Error),
            _ => None,
        }
    }
}

/// One STOMP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First value for a header key, if present.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// CONNECT frame carrying the bearer credential.
    pub fn connect(token: &str) -> Frame {
        Frame::new(Command::Connect)
            .header("accept-version", "1.0,1.1,1.2")
            .header("heart-beat", "0,0")
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn subscribe(subscription_id: &str, destination: &str) -> Frame {
        Frame::new(Command::Subscribe)
            .header("id", subscription_id)
            .header("destination", destination)
    }

    pub fn unsubscribe(subscription_id: &str) -> Frame {
        Frame::new(Command::Unsubscribe).header("id", subscription_id)
    }

    pub fn send(destination: &str, body: &str) -> Frame {
        Frame::new(Command::Send)
            .header("destination", destination)
            .header("content-type", "application/json")
            .with_body(body)
    }

    pub fn disconnect() -> Frame {
        Frame::new(Command::Disconnect)
    }

    /// Serialize to the wire format (NUL-terminated).
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push_str(self.command.as_str());
        out.push('\n');
        for (key, value) in &self.headers {
            out.push_str(&escape(key));
            out.push(':');
            out.push_str(&escape(value));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse one frame from the wire. The caller filters heart-beats
    /// (payloads that are only newlines) beforehand.
    pub fn decode(raw: &str) -> Result<Frame> {
        let raw = raw.trim_end_matches('\0');
        let (head, body) = raw
            .split_once("\n\n")
            .map(|(h, b)| (h, b.to_string()))
            .unwrap_or((raw, String::new()));

        let mut lines = head.lines();
        let command_line = lines
            .next()
            .ok_or_else(|| TripError::Transport("empty frame".to_string()))?;
        let command = Command::parse(command_line.trim_end_matches('\r')).ok_or_else(|| {
            TripError::Transport(format!("unknown STOMP command: {}", command_line))
        })?;

        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                break;
            }
            let (key, value) = line.split_once(':').ok_or_else(|| {
                TripError::Transport(format!("malformed header line: {}", line))
            })?;
            headers.push((unescape(key)?, unescape(value)?));
        }

        Ok(Frame {
            command,
            headers,
            body,
        })
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            ':' => out.push_str("\\c"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            other => {
                return Err(TripError::Transport(format!(
                    "bad header escape: \\{}",
                    other.map(String::from).unwrap_or_default()
                )))
            }
        }
    }
    Ok(out)
}
