use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::User;

/// Conversation kind as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationKind {
    /// One-to-one direct message
    Dm,
    /// Named group with a member list
    Group,
}

/// A conversation the user participates in.
///
/// Created by REST calls (create-group, open-DM) or discovered via the
/// list fetch. Never deleted locally except on explicit leave/delete,
/// which is server-authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub kind: ConversationKind,
    pub members: Vec<User>,
    /// Client-local favourite flag, never synced.
    pub is_favorite: bool,
    /// Whether the live topic for this conversation is currently attached.
    pub is_subscribed: bool,
}

impl Conversation {
    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }
}

/// A single chat message as held in a conversation's message list.
///
/// Invariants: ids are unique within a conversation; ordering is
/// non-decreasing by `created_at`. Messages are never mutated or
/// locally deleted once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: u64,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Derived at merge time by comparing the sender to the current
    /// session identity. Never cached across sessions.
    pub is_own: bool,
}

/// Sender reference carried by message payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderRef {
    pub id: u64,
    pub name: String,
}

/// Validated schema for one inbound live frame.
///
/// Frames that fail to decode into this shape are logged and dropped;
/// there is no best-effort field access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFrame {
    pub id: u64,
    /// Some brokers echo the conversation id in the body; when present
    /// it must agree with the topic the frame arrived on.
    #[serde(default)]
    pub conversation_id: Option<u64>,
    pub sender: SenderRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MessageFrame {
    /// Fold the frame into a [`ChatMessage`], deriving `is_own` from the
    /// given session user id.
    pub fn into_message(self, session_user_id: Option<u64>) -> ChatMessage {
        ChatMessage {
            id: self.id.to_string(),
            is_own: session_user_id == Some(self.sender.id),
            sender_id: self.sender.id,
            sender_name: self.sender.name,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
