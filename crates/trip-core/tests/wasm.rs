//! WASM-target tests for trip-core.
//!
//! Runs EventBus, STOMP codec, router, reducer, and ChatService tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::json;

use trip_core::chat::stomp::{self, Frame};
use trip_core::chat::{
    ChatService, ConnectionManager, ConnectionState, ReconnectPolicy, SubscriptionRouter,
    ThreadStore,
};
use trip_core::event_bus::EventBus;
use trip_core::ports::{ChatApi, ChatTransport, FrameHandler};
use trip_types::chat::{Conversation, MessageFrame};
use trip_types::event::AppEvent;
use trip_types::session::{Session, User};
use trip_types::{Result, TripError};

fn frame(id: u64, sender_id: u64, content: &str, timestamp: &str) -> MessageFrame {
    serde_json::from_value(json!({
        "id": id,
        "sender": { "id": sender_id, "name": format!("user-{}", sender_id) },
        "content": content,
        "createdAt": timestamp,
    }))
    .unwrap()
}

fn session(user_id: u64) -> Session {
    Session::new(
        User {
            id: user_id,
            name: format!("user-{}", user_id),
            email: format!("u{}@example.com", user_id),
            avatar_url: None,
        },
        "jwt-test",
    )
}

#[derive(Default)]
struct MockTransport {
    connected: Cell<bool>,
    subs: RefCell<Vec<String>>,
    handler: RefCell<Option<FrameHandler>>,
}

impl MockTransport {
    fn deliver(&self, conversation_id: &str, body: &str) {
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            handler(conversation_id.to_string(), body.to_string());
        }
    }
}

impl ChatTransport for MockTransport {
    fn connect(&self, _token: &str) {
        self.connected.set(true);
    }

    fn disconnect(&self) {
        self.connected.set(false);
        self.subs.borrow_mut().clear();
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn subscribe(&self, conversation_id: &str) {
        self.subs.borrow_mut().push(conversation_id.to_string());
    }

    fn unsubscribe(&self, conversation_id: &str) {
        self.subs.borrow_mut().retain(|id| id != conversation_id);
    }

    fn publish(&self, _destination: &str, _body: &str) {}

    fn set_frame_handler(&self, handler: FrameHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }
}

#[derive(Default)]
struct MockChatApi {
    history: RefCell<Vec<MessageFrame>>,
    posts: RefCell<Vec<(String, String)>>,
}

#[async_trait(?Send)]
impl ChatApi for MockChatApi {
    async fn conversations(&self) -> Result<Vec<Conversation>> {
        Ok(vec![])
    }

    async fn create_group(&self, _name: &str, _member_ids: &[u64]) -> Result<Conversation> {
        Err(TripError::Other("not implemented in mock".to_string()))
    }

    async fn open_dm(&self, _user_id: u64) -> Result<Conversation> {
        Err(TripError::Other("not implemented in mock".to_string()))
    }

    async fn add_members(&self, _conversation_id: &str, _member_ids: &[u64]) -> Result<()> {
        Ok(())
    }

    async fn remove_member(&self, _conversation_id: &str, _user_id: u64) -> Result<()> {
        Ok(())
    }

    async fn delete_group(&self, _conversation_id: &str) -> Result<()> {
        Ok(())
    }

    async fn message_history(&self, _conversation_id: &str) -> Result<Vec<MessageFrame>> {
        Ok(self.history.borrow().clone())
    }

    async fn post_message(&self, conversation_id: &str, content: &str) -> Result<()> {
        self.posts
            .borrow_mut()
            .push((conversation_id.to_string(), content.to_string()));
        Ok(())
    }
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::ChatConnected);
    bus.toast("saved", true);

    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 2);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn event_bus_clone_shares_state() {
    let bus1 = EventBus::new();
    let bus2 = bus1.clone();
    bus1.emit(AppEvent::ChatDisconnected);
    assert_eq!(bus2.drain().len(), 1);
}

// ─── STOMP Codec Tests ───────────────────────────────────

#[wasm_bindgen_test]
fn stomp_roundtrip() {
    let original = Frame::send("/app/chat.send", r#"{"conversationId":42}"#);
    let decoded = Frame::decode(&original.encode()).unwrap();
    assert_eq!(decoded, original);
}

#[wasm_bindgen_test]
fn stomp_topic_mapping() {
    let topic = stomp::topic_for("42");
    assert_eq!(topic, "/topic/conversations/42");
    assert_eq!(stomp::conversation_from_topic(&topic), Some("42"));
}

#[wasm_bindgen_test]
fn stomp_rejects_garbage() {
    assert!(Frame::decode("BOGUS\n\n\0").is_err());
}

// ─── Backoff Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn backoff_caps_and_goes_offline() {
    let mut manager = ConnectionManager::new(ReconnectPolicy {
        initial_ms: 1_000,
        max_ms: 4_000,
    });
    assert_eq!(manager.lost(), 1_000);
    assert_eq!(manager.lost(), 2_000);
    assert_eq!(manager.lost(), 4_000);
    assert_eq!(manager.state(), ConnectionState::Offline);

    manager.established();
    assert_eq!(manager.lost(), 1_000);
}

// ─── Router + Reducer Tests ──────────────────────────────

#[wasm_bindgen_test]
fn router_single_listener_on_latest() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();
    router.set_active(&transport, Some("a"));
    router.set_active(&transport, Some("b"));
    assert_eq!(*transport.subs.borrow(), vec!["b".to_string()]);
}

#[wasm_bindgen_test]
fn reducer_orders_history_before_live() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history(
        "42",
        vec![
            frame(1, 7, "first", "2026-01-10T09:00:00Z"),
            frame(2, 9, "second", "2026-01-10T09:05:00Z"),
        ],
    );
    store.append_live("42", frame(3, 7, "third", "2026-01-10T09:10:00Z"));

    let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[wasm_bindgen_test]
fn reducer_drops_duplicates_and_stale_history() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history("42", vec![frame(1, 7, "hi", "2026-01-10T09:00:00Z")]);
    assert!(store
        .append_live("42", frame(1, 7, "hi", "2026-01-10T09:00:00Z"))
        .is_none());

    store.open("43");
    assert!(!store.load_history("42", vec![frame(2, 7, "late", "2026-01-10T09:01:00Z")]));
    assert!(store.messages().is_empty());
}

// ─── ChatService Tests (async) ───────────────────────────

#[wasm_bindgen_test]
async fn service_open_loads_history_and_merges_live() {
    let api = Rc::new(MockChatApi::default());
    *api.history.borrow_mut() = vec![frame(1, 7, "hello", "2026-01-10T09:00:00Z")];
    let transport = Rc::new(MockTransport::default());
    let bus = EventBus::new();
    let service = ChatService::new(api, transport.clone(), bus.clone());

    service.start(&session(9));
    service.open_conversation("42").await;
    assert_eq!(*transport.subs.borrow(), vec!["42".to_string()]);
    assert_eq!(service.messages().len(), 1);
    bus.drain();

    transport.deliver(
        "42",
        r#"{ "id": 2, "sender": { "id": 9, "name": "user-9" }, "content": "mine",
             "createdAt": "2026-01-10T09:05:00Z" }"#,
    );
    assert_eq!(service.messages().len(), 2);
    assert!(service.messages()[1].is_own);
    assert!(bus
        .drain()
        .iter()
        .any(|e| matches!(e, AppEvent::MessageReceived { .. })));
}

#[wasm_bindgen_test]
async fn service_send_trims_and_skips_empty() {
    let api = Rc::new(MockChatApi::default());
    let transport = Rc::new(MockTransport::default());
    let service = ChatService::new(api.clone(), transport, EventBus::new());

    service.start(&session(9));
    service.send("42", "   ").await.unwrap();
    service.send("42", "  hello  ").await.unwrap();

    assert_eq!(
        *api.posts.borrow(),
        vec![("42".to_string(), "hello".to_string())]
    );
    // No local echo either way.
    assert!(service.messages().is_empty());
}
