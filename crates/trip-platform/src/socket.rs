//! Live STOMP-over-WebSocket transport.
//!
//! Owns the browser `WebSocket`, speaks the STOMP handshake on top of
//! it, and drives the reconnect timers. The pure connection state
//! machine lives in trip-core; this adapter feeds it and obeys the
//! delays it hands back.
//!
//! Lifecycle: `connect()` stores the credential and opens the socket;
//! every drop schedules a retry (capped backoff, no attempt limit)
//! until `disconnect()` clears the credential. A broker session that
//! dies takes its subscriptions with it, so the active topic is
//! re-attached after every successful handshake.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use trip_core::chat::stomp::{self, Command, Frame};
use trip_core::chat::{ConnectionManager, ConnectionState};
use trip_core::event_bus::EventBus;
use trip_core::ports::{ChatTransport, FrameHandler};
use trip_types::event::AppEvent;

pub struct StompSocket {
    inner: Rc<Inner>,
}

struct Inner {
    ws_url: String,
    bus: EventBus,
    state: RefCell<State>,
}

#[derive(Default)]
struct State {
    socket: Option<WebSocket>,
    manager: ConnectionManager,
    /// Present while a live session is wanted; cleared on deliberate
    /// disconnect, which also stops the retry loop.
    token: Option<String>,
    active: Option<Subscription>,
    handler: Option<FrameHandler>,
    next_sub: u64,
    on_open: Option<Closure<dyn FnMut()>>,
    on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    on_close: Option<Closure<dyn FnMut(CloseEvent)>>,
    on_error: Option<Closure<dyn FnMut()>>,
}

struct Subscription {
    conversation_id: String,
    /// `None` while the broker session is down; a fresh id is minted
    /// when the topic re-attaches.
    sub_id: Option<String>,
}

impl StompSocket {
    pub fn new(ws_url: impl Into<String>, bus: EventBus) -> Self {
        Self {
            inner: Rc::new(Inner {
                ws_url: ws_url.into(),
                bus,
                state: RefCell::new(State::default()),
            }),
        }
    }
}

impl Inner {
    fn open_socket(self: &Rc<Self>) {
        if self.state.borrow().socket.is_some() {
            return;
        }

        let ws = match WebSocket::new(&self.ws_url) {
            Ok(ws) => ws,
            Err(e) => {
                log::warn!("websocket open failed: {:?}", e);
                self.clone().schedule_retry();
                return;
            }
        };

        let inner = self.clone();
        let on_open = Closure::<dyn FnMut()>::new(move || {
            let st = inner.state.borrow();
            if let (Some(ws), Some(token)) = (st.socket.as_ref(), st.token.as_ref()) {
                if let Err(e) = ws.send_with_str(&Frame::connect(token).encode()) {
                    log::warn!("failed to send CONNECT: {:?}", e);
                }
            }
        });

        let inner = self.clone();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            if let Some(raw) = event.data().as_string() {
                inner.handle_payload(&raw);
            }
        });

        let inner = self.clone();
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            let deliberate;
            {
                let mut st = inner.state.borrow_mut();
                st.socket = None;
                if let Some(sub) = st.active.as_mut() {
                    sub.sub_id = None;
                }
                deliberate = st.token.is_none();
                if deliberate {
                    st.manager.closed();
                }
            }
            if !deliberate {
                log::debug!("socket closed (code {}), scheduling retry", event.code());
                inner.clone().schedule_retry();
            }
        });

        // Errors are always followed by a close event; retry is
        // scheduled there.
        let on_error = Closure::<dyn FnMut()>::new(move || {
            log::debug!("websocket error");
        });

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let mut st = self.state.borrow_mut();
        st.manager.attempt_started();
        st.socket = Some(ws);
        st.on_open = Some(on_open);
        st.on_message = Some(on_message);
        st.on_close = Some(on_close);
        st.on_error = Some(on_error);
    }

    fn handle_payload(self: &Rc<Self>, raw: &str) {
        // Lone EOLs are heart-beats.
        if raw.trim_matches(|c| c == '\n' || c == '\r').is_empty() {
            return;
        }

        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("undecodable frame from broker: {}", e);
                return;
            }
        };

        match frame.command {
            Command::Connected => self.handle_connected(),
            Command::Message => {
                let conversation_id = frame
                    .header_value("destination")
                    .and_then(stomp::conversation_from_topic)
                    .map(String::from);
                match conversation_id {
                    Some(conversation_id) => {
                        let handler = self.state.borrow().handler.clone();
                        if let Some(handler) = handler {
                            handler(conversation_id, frame.body);
                        }
                    }
                    None => log::debug!("MESSAGE frame without a conversation destination"),
                }
            }
            Command::Error => log::warn!(
                "broker error: {}",
                frame.header_value("message").unwrap_or("(no message)")
            ),
            Command::Receipt => {}
            other => log::debug!("ignoring {} frame", other.as_str()),
        }
    }

    fn handle_connected(self: &Rc<Self>) {
        let reattach;
        {
            let mut st = self.state.borrow_mut();
            st.manager.established();
            reattach = st.active.take().map(|sub| sub.conversation_id);
        }
        self.bus.emit(AppEvent::ChatConnected);
        if let Some(conversation_id) = reattach {
            self.attach(&conversation_id);
        }
    }

    fn attach(self: &Rc<Self>, conversation_id: &str) {
        let mut st = self.state.borrow_mut();
        if st
            .active
            .as_ref()
            .is_some_and(|sub| sub.conversation_id == conversation_id)
        {
            return;
        }

        if !st.manager.is_connected() {
            // Remember the intent; the topic attaches after the
            // handshake completes.
            st.active = Some(Subscription {
                conversation_id: conversation_id.to_string(),
                sub_id: None,
            });
            return;
        }

        st.next_sub += 1;
        let sub_id = format!("sub-{}", st.next_sub);
        let frame = Frame::subscribe(&sub_id, &stomp::topic_for(conversation_id)).encode();
        if let Some(ws) = st.socket.as_ref() {
            if let Err(e) = ws.send_with_str(&frame) {
                log::warn!("failed to send SUBSCRIBE: {:?}", e);
            }
        }
        st.active = Some(Subscription {
            conversation_id: conversation_id.to_string(),
            sub_id: Some(sub_id),
        });
    }

    fn schedule_retry(self: Rc<Self>) {
        let delay;
        let offline;
        {
            let mut st = self.state.borrow_mut();
            delay = st.manager.lost();
            offline = st.manager.state() == ConnectionState::Offline;
        }
        self.bus.emit(if offline {
            AppEvent::ChatOffline
        } else {
            AppEvent::ChatDisconnected
        });

        spawn_local(async move {
            TimeoutFuture::new(delay).await;
            if self.state.borrow().token.is_some() {
                self.open_socket();
            }
        });
    }
}

impl ChatTransport for StompSocket {
    fn connect(&self, token: &str) {
        self.inner.state.borrow_mut().token = Some(token.to_string());
        self.inner.open_socket();
    }

    fn disconnect(&self) {
        let socket;
        {
            let mut st = self.inner.state.borrow_mut();
            st.token = None;
            st.active = None;
            st.manager.closed();
            socket = st.socket.take();
        }
        if let Some(ws) = socket {
            let _ = ws.send_with_str(&Frame::disconnect().encode());
            let _ = ws.close();
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.state.borrow().manager.is_connected()
    }

    fn subscribe(&self, conversation_id: &str) {
        self.inner.attach(conversation_id);
    }

    fn unsubscribe(&self, conversation_id: &str) {
        let mut st = self.inner.state.borrow_mut();
        let matches = st
            .active
            .as_ref()
            .is_some_and(|sub| sub.conversation_id == conversation_id);
        if !matches {
            return;
        }
        let sub = st.active.take();
        if let Some(Subscription {
            sub_id: Some(sub_id),
            ..
        }) = sub
        {
            if let Some(ws) = st.socket.as_ref() {
                if let Err(e) = ws.send_with_str(&Frame::unsubscribe(&sub_id).encode()) {
                    log::warn!("failed to send UNSUBSCRIBE: {:?}", e);
                }
            }
        }
    }

    fn publish(&self, destination: &str, body: &str) {
        let st = self.inner.state.borrow();
        if !st.manager.is_connected() {
            // Best-effort channel: dropped, not queued.
            log::debug!("dropping publish to {} while disconnected", destination);
            return;
        }
        if let Some(ws) = st.socket.as_ref() {
            if let Err(e) = ws.send_with_str(&Frame::send(destination, body).encode()) {
                log::warn!("failed to send frame: {:?}", e);
            }
        }
    }

    fn set_frame_handler(&self, handler: FrameHandler) {
        self.inner.state.borrow_mut().handler = Some(handler);
    }
}
