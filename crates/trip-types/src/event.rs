use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Events emitted by the core services.
/// UI drains these each frame for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// The live socket session is established
    ChatConnected,

    /// The live session dropped; a reconnect attempt is scheduled
    ChatDisconnected,

    /// Reconnect backoff hit its cap — surfaced as an offline banner.
    /// Retries continue in the background.
    ChatOffline,

    /// History fetch for a conversation finished
    HistoryLoaded { conversation_id: String },

    /// A live frame was merged into the active conversation
    MessageReceived {
        conversation_id: String,
        message: ChatMessage,
    },

    /// The backend rejected the credential; route back to login
    SessionExpired,

    /// Transient user-facing notification
    Toast { message: String, success: bool },
}
