//! Chat service — glues the transport, the subscription router, and the
//! merge reducer behind one interface the UI layer drives.

use std::cell::RefCell;
use std::rc::Rc;

use trip_types::{
    chat::{ChatMessage, MessageFrame},
    event::AppEvent,
    session::Session,
    Result,
};

use crate::chat::router::SubscriptionRouter;
use crate::chat::thread::ThreadStore;
use crate::event_bus::EventBus;
use crate::ports::{ChatApi, ChatTransport};

pub struct ChatService {
    api: Rc<dyn ChatApi>,
    transport: Rc<dyn ChatTransport>,
    bus: EventBus,
    router: RefCell<SubscriptionRouter>,
    thread: Rc<RefCell<ThreadStore>>,
}

impl ChatService {
    pub fn new(api: Rc<dyn ChatApi>, transport: Rc<dyn ChatTransport>, bus: EventBus) -> Self {
        Self {
            api,
            transport,
            bus,
            router: RefCell::new(SubscriptionRouter::new()),
            thread: Rc::new(RefCell::new(ThreadStore::new())),
        }
    }

    /// Open the live session for an authenticated user. Installs the
    /// frame handler and connects; a prior session for a different
    /// credential must be stopped first.
    pub fn start(&self, session: &Session) {
        self.thread
            .borrow_mut()
            .set_session(Some(session.user_id()));

        let thread = self.thread.clone();
        let bus = self.bus.clone();
        self.transport
            .set_frame_handler(Rc::new(move |conversation_id: String, body: String| {
                let frame: MessageFrame = match serde_json::from_str(&body) {
                    Ok(frame) => frame,
                    Err(e) => {
                        // Malformed frames are dropped, never
                        // best-effort-read.
                        log::warn!("dropping malformed frame: {}", e);
                        return;
                    }
                };
                let merged = thread
                    .borrow_mut()
                    .append_live(&conversation_id, frame)
                    .cloned();
                if let Some(message) = merged {
                    bus.emit(AppEvent::MessageReceived {
                        conversation_id,
                        message,
                    });
                }
            }));

        self.transport.connect(&session.token);
    }

    /// Tear down on logout or view unmount: releases the topic
    /// listener, closes the session, clears the held list.
    pub fn stop(&self) {
        self.router.borrow_mut().clear(self.transport.as_ref());
        self.transport.disconnect();
        self.thread.borrow_mut().set_session(None);
    }

    /// Switch the open conversation: re-route the single topic
    /// listener, then fetch history once. The previous listener is
    /// released before the new one attaches, and a history response
    /// that lands after another switch is discarded.
    pub async fn open_conversation(&self, conversation_id: &str) {
        self.thread.borrow_mut().open(conversation_id);
        self.router
            .borrow_mut()
            .set_active(self.transport.as_ref(), Some(conversation_id));

        match self.api.message_history(conversation_id).await {
            Ok(frames) => {
                let applied = self
                    .thread
                    .borrow_mut()
                    .load_history(conversation_id, frames);
                if applied {
                    self.bus.emit(AppEvent::HistoryLoaded {
                        conversation_id: conversation_id.to_string(),
                    });
                }
            }
            Err(e) if e.is_auth() => self.bus.emit(AppEvent::SessionExpired),
            Err(e) => {
                log::warn!("history fetch failed for {}: {}", conversation_id, e);
                self.bus.toast("Failed to load messages", false);
            }
        }
    }

    /// Navigating away from the conversation view.
    pub fn close_conversation(&self) {
        self.router.borrow_mut().clear(self.transport.as_ref());
        self.thread.borrow_mut().close();
    }

    pub fn active_conversation(&self) -> Option<String> {
        self.thread.borrow().active().map(String::from)
    }

    /// Snapshot of the open conversation's ordered message list.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.thread.borrow().messages().to_vec()
    }

    /// Fire-and-forget send over REST. Whitespace-only content is a
    /// no-op. There is no local echo: the sender sees their own message
    /// only once it comes back over the live subscription. On failure
    /// the caller keeps the input text.
    pub async fn send(&self, conversation_id: &str, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(());
        }

        match self.api.post_message(conversation_id, content).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_auth() => {
                self.bus.emit(AppEvent::SessionExpired);
                Err(e)
            }
            Err(e) => {
                log::warn!("send failed for {}: {}", conversation_id, e);
                self.bus.toast("Failed to send message", false);
                Err(e)
            }
        }
    }
}
