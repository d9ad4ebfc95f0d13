//! Merge reducer: produces the authoritative, ordered message list for
//! the open conversation from a one-shot history fetch plus the live
//! frame stream.
//!
//! Merging is idempotent: an id-keyed set per conversation drops
//! duplicate deliveries (e.g. a history record echoed again as a live
//! frame). `is_own` is derived at merge time from the current session
//! identity and the whole store is cleared on session change, so a
//! later login can never relabel another user's messages.

use std::collections::HashSet;

use trip_types::chat::{ChatMessage, MessageFrame};

pub struct ThreadStore {
    session_user: Option<u64>,
    active: Option<String>,
    messages: Vec<ChatMessage>,
    seen: HashSet<String>,
}

impl ThreadStore {
    pub fn new() -> Self {
        Self {
            session_user: None,
            active: None,
            messages: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Bind the store to a session identity. Any change clears the
    /// held list — message labelling never survives a session switch.
    pub fn set_session(&mut self, user_id: Option<u64>) {
        if self.session_user != user_id {
            self.session_user = user_id;
            self.active = None;
            self.messages.clear();
            self.seen.clear();
        }
    }

    /// Mark a conversation as open. The prior list is dropped; history
    /// for the new conversation replaces it once the fetch resolves.
    pub fn open(&mut self, conversation_id: &str) {
        self.active = Some(conversation_id.to_string());
        self.messages.clear();
        self.seen.clear();
    }

    pub fn close(&mut self) {
        self.active = None;
        self.messages.clear();
        self.seen.clear();
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Replace the list with fetched history. Returns false when the
    /// response arrived for a conversation that is no longer open —
    /// late responses are discarded rather than applied to the wrong
    /// view.
    pub fn load_history(&mut self, conversation_id: &str, frames: Vec<MessageFrame>) -> bool {
        if self.active.as_deref() != Some(conversation_id) {
            log::debug!(
                "discarding stale history for conversation {} (open: {:?})",
                conversation_id,
                self.active
            );
            return false;
        }

        self.messages.clear();
        self.seen.clear();
        for frame in frames {
            self.merge(conversation_id, frame);
        }
        true
    }

    /// Append one live frame, provided its conversation matches the
    /// active one. Frames for inactive conversations are ignored — no
    /// background accumulation. Returns the merged message, or `None`
    /// when the frame was discarded or already seen.
    pub fn append_live(
        &mut self,
        conversation_id: &str,
        frame: MessageFrame,
    ) -> Option<&ChatMessage> {
        if self.active.as_deref() != Some(conversation_id) {
            return None;
        }
        self.merge(conversation_id, frame)
    }

    fn merge(&mut self, conversation_id: &str, frame: MessageFrame) -> Option<&ChatMessage> {
        // A body-level conversation id, when present, must agree with
        // the topic the frame arrived on.
        if let Some(body_conv) = frame.conversation_id {
            if body_conv.to_string() != conversation_id {
                log::warn!(
                    "frame body addresses conversation {} but arrived on topic {}",
                    body_conv,
                    conversation_id
                );
                return None;
            }
        }

        let id = frame.id.to_string();
        if !self.seen.insert(id) {
            return None;
        }

        self.messages.push(frame.into_message(self.session_user));
        self.messages.last()
    }
}

impl Default for ThreadStore {
    fn default() -> Self {
        Self::new()
    }
}
