use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::json;

use trip_types::chat::{Conversation, MessageFrame};
use trip_types::event::AppEvent;
use trip_types::session::{Session, User};
use trip_types::{Result, TripError};

use crate::chat::connection::{ConnectionManager, ConnectionState, ReconnectPolicy};
use crate::chat::router::SubscriptionRouter;
use crate::chat::service::ChatService;
use crate::chat::stomp::{self, Command, Frame};
use crate::chat::thread::ThreadStore;
use crate::event_bus::EventBus;
use crate::ports::{ChatApi, ChatTransport, FrameHandler};

// Single-threaded block_on for sync tests (everything in the mocks
// completes immediately).
fn block_on<F: std::future::Future<Output = T>, T>(f: F) -> T {
    use std::sync::Arc;
    use std::task::{Context, Poll, Wake, Waker};

    struct NoopWaker;
    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    let waker = Waker::from(Arc::new(NoopWaker));
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(val) => return val,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

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

// ─── Mock Transport ──────────────────────────────────────

#[derive(Default)]
struct MockTransport {
    connected: Cell<bool>,
    subs: RefCell<Vec<String>>,
    calls: RefCell<Vec<String>>,
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
        self.calls.borrow_mut().push("connect".to_string());
    }

    fn disconnect(&self) {
        self.connected.set(false);
        self.subs.borrow_mut().clear();
        self.calls.borrow_mut().push("disconnect".to_string());
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn subscribe(&self, conversation_id: &str) {
        self.subs.borrow_mut().push(conversation_id.to_string());
        self.calls
            .borrow_mut()
            .push(format!("sub:{}", conversation_id));
    }

    fn unsubscribe(&self, conversation_id: &str) {
        self.subs.borrow_mut().retain(|id| id != conversation_id);
        self.calls
            .borrow_mut()
            .push(format!("unsub:{}", conversation_id));
    }

    fn publish(&self, _destination: &str, _body: &str) {}

    fn set_frame_handler(&self, handler: FrameHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }
}

// ─── Mock Chat API ───────────────────────────────────────

#[derive(Default)]
struct MockChatApi {
    history: RefCell<Vec<MessageFrame>>,
    posts: RefCell<Vec<(String, String)>>,
    fail_posts: Cell<bool>,
    auth_expired: Cell<bool>,
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
        if self.auth_expired.get() {
            return Err(TripError::Unauthorized);
        }
        Ok(self.history.borrow().clone())
    }

    async fn post_message(&self, conversation_id: &str, content: &str) -> Result<()> {
        if self.auth_expired.get() {
            return Err(TripError::Unauthorized);
        }
        if self.fail_posts.get() {
            return Err(TripError::Network("backend unreachable".to_string()));
        }
        self.posts
            .borrow_mut()
            .push((conversation_id.to_string(), content.to_string()));
        Ok(())
    }
}

fn service_fixture() -> (ChatService, Rc<MockChatApi>, Rc<MockTransport>, EventBus) {
    let api = Rc::new(MockChatApi::default());
    let transport = Rc::new(MockTransport::default());
    let bus = EventBus::new();
    let service = ChatService::new(api.clone(), transport.clone(), bus.clone());
    (service, api, transport, bus)
}

// ─── EventBus Tests ──────────────────────────────────────

#[test]
fn test_event_bus_new_is_empty() {
    let bus = EventBus::new();
    assert!(!bus.has_pending());
    assert!(bus.drain().is_empty());
}

#[test]
fn test_event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::ChatConnected);
    bus.toast("saved", true);

    assert!(bus.has_pending());
    let events = bus.drain();
    assert_eq!(events.len(), 2);
    assert!(!bus.has_pending());
}

#[test]
fn test_event_bus_clone_shares_state() {
    let bus1 = EventBus::new();
    let bus2 = bus1.clone();

    bus1.emit(AppEvent::ChatDisconnected);
    assert!(bus2.has_pending());
    assert_eq!(bus2.drain().len(), 1);
    assert!(!bus1.has_pending());
}

// ─── STOMP Codec Tests ───────────────────────────────────

#[test]
fn test_stomp_connect_carries_bearer() {
    let encoded = Frame::connect("jwt-abc").encode();
    assert!(encoded.starts_with("CONNECT\n"));
    assert!(encoded.contains("Authorization:Bearer jwt-abc\n"));
    assert!(encoded.ends_with("\n\n\0"));
}

#[test]
fn test_stomp_encode_decode_roundtrip() {
    let original = Frame::send("/app/chat.send", r#"{"conversationId":42,"content":"hi"}"#);
    let decoded = Frame::decode(&original.encode()).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(decoded.header_value("destination"), Some("/app/chat.send"));
}

#[test]
fn test_stomp_header_escaping_roundtrip() {
    let original = Frame::new(Command::Send).header("x-note", "a:b\nc\\d");
    let decoded = Frame::decode(&original.encode()).unwrap();
    assert_eq!(decoded.header_value("x-note"), Some("a:b\nc\\d"));
}

#[test]
fn test_stomp_decode_message_frame() {
    let raw = "MESSAGE\ndestination:/topic/conversations/42\nsubscription:sub-1\n\n{\"id\":3}\0";
    let decoded = Frame::decode(raw).unwrap();
    assert_eq!(decoded.command, Command::Message);
    assert_eq!(
        decoded.header_value("destination"),
        Some("/topic/conversations/42")
    );
    assert_eq!(decoded.body, "{\"id\":3}");
}

#[test]
fn test_stomp_decode_rejects_unknown_command() {
    assert!(Frame::decode("BOGUS\n\n\0").is_err());
}

#[test]
fn test_stomp_decode_rejects_malformed_header() {
    assert!(Frame::decode("MESSAGE\nno-colon-here\n\nbody\0").is_err());
}

#[test]
fn test_topic_mapping() {
    assert_eq!(stomp::topic_for("42"), "/topic/conversations/42");
    assert_eq!(
        stomp::conversation_from_topic("/topic/conversations/42"),
        Some("42")
    );
    assert_eq!(stomp::conversation_from_topic("/topic/conversations/"), None);
    assert_eq!(stomp::conversation_from_topic("/queue/other"), None);
}

// ─── Reconnect Policy Tests ──────────────────────────────

#[test]
fn test_backoff_doubles_and_caps() {
    let policy = ReconnectPolicy {
        initial_ms: 3_000,
        max_ms: 60_000,
    };
    assert_eq!(policy.delay_for(0), 3_000);
    assert_eq!(policy.delay_for(1), 6_000);
    assert_eq!(policy.delay_for(2), 12_000);
    assert_eq!(policy.delay_for(4), 48_000);
    assert_eq!(policy.delay_for(5), 60_000);
    assert_eq!(policy.delay_for(30), 60_000);
    // Shift overflow saturates rather than wrapping.
    assert_eq!(policy.delay_for(40), 60_000);
}

#[test]
fn test_connection_manager_lifecycle() {
    let mut manager = ConnectionManager::default();
    assert_eq!(manager.state(), ConnectionState::Disconnected);

    manager.attempt_started();
    assert_eq!(manager.state(), ConnectionState::Connecting);

    manager.established();
    assert!(manager.is_connected());

    let delay = manager.lost();
    assert_eq!(delay, 3_000);
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

#[test]
fn test_connection_manager_reaches_offline_but_keeps_retrying() {
    let mut manager = ConnectionManager::new(ReconnectPolicy {
        initial_ms: 1_000,
        max_ms: 8_000,
    });

    // 1000, 2000, 4000, then capped.
    assert_eq!(manager.lost(), 1_000);
    assert_eq!(manager.lost(), 2_000);
    assert_eq!(manager.lost(), 4_000);
    assert_eq!(manager.state(), ConnectionState::Disconnected);

    assert_eq!(manager.lost(), 8_000);
    assert_eq!(manager.state(), ConnectionState::Offline);

    // Offline stays visible while further attempts run, and the delay
    // never grows past the cap.
    manager.attempt_started();
    assert_eq!(manager.state(), ConnectionState::Offline);
    assert_eq!(manager.lost(), 8_000);
}

#[test]
fn test_connection_manager_success_resets_backoff() {
    let mut manager = ConnectionManager::default();
    manager.lost();
    manager.lost();
    manager.established();
    assert_eq!(manager.lost(), 3_000);
}

#[test]
fn test_connection_manager_deliberate_close() {
    let mut manager = ConnectionManager::default();
    manager.established();
    manager.closed();
    assert_eq!(manager.state(), ConnectionState::Disconnected);
    assert_eq!(manager.lost(), 3_000);
}

// ─── Subscription Router Tests ───────────────────────────

#[test]
fn test_router_attaches_single_listener() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();

    router.set_active(&transport, Some("42"));
    assert_eq!(router.active(), Some("42"));
    assert_eq!(*transport.subs.borrow(), vec!["42".to_string()]);
}

#[test]
fn test_router_releases_previous_before_attaching() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();

    router.set_active(&transport, Some("42"));
    router.set_active(&transport, Some("43"));

    assert_eq!(
        *transport.calls.borrow(),
        vec!["sub:42".to_string(), "unsub:42".to_string(), "sub:43".to_string()]
    );
    assert_eq!(*transport.subs.borrow(), vec!["43".to_string()]);
}

#[test]
fn test_router_rapid_switch_leaves_one_listener_on_latest() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();

    router.set_active(&transport, Some("a"));
    router.set_active(&transport, Some("b"));
    router.set_active(&transport, Some("c"));

    assert_eq!(transport.subs.borrow().len(), 1);
    assert_eq!(*transport.subs.borrow(), vec!["c".to_string()]);
    assert!(router.is_active("c"));
}

#[test]
fn test_router_same_id_is_idempotent() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();

    router.set_active(&transport, Some("42"));
    router.set_active(&transport, Some("42"));
    assert_eq!(transport.calls.borrow().len(), 1);
}

#[test]
fn test_router_empty_id_only_unsubscribes() {
    let transport = MockTransport::default();
    let mut router = SubscriptionRouter::new();

    router.set_active(&transport, Some("42"));
    router.set_active(&transport, Some(""));
    assert!(router.active().is_none());
    assert!(transport.subs.borrow().is_empty());

    // Clearing with nothing attached touches the transport no further.
    let calls_before = transport.calls.borrow().len();
    router.clear(&transport);
    assert_eq!(transport.calls.borrow().len(), calls_before);
}

// ─── Thread Store (Merge Reducer) Tests ──────────────────

#[test]
fn test_history_then_live_append_stays_ordered() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");

    let applied = store.load_history(
        "42",
        vec![
            frame(1, 7, "first", "2026-01-10T09:00:00Z"),
            frame(2, 9, "second", "2026-01-10T09:05:00Z"),
        ],
    );
    assert!(applied);

    store.append_live("42", frame(3, 7, "third", "2026-01-10T09:10:00Z"));

    let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(store
        .messages()
        .windows(2)
        .all(|w| w[0].created_at <= w[1].created_at));
}

#[test]
fn test_history_replaces_not_appends() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history("42", vec![frame(1, 7, "old", "2026-01-10T09:00:00Z")]);

    // Re-opening the same conversation refetches and replaces.
    store.open("42");
    store.load_history("42", vec![frame(2, 7, "new", "2026-01-10T10:00:00Z")]);
    assert_eq!(store.messages().len(), 1);
    assert_eq!(store.messages()[0].id, "2");
}

#[test]
fn test_frames_for_inactive_conversation_discarded() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));

    // User had "42" open, then opened "43"; history for "43" has not
    // resolved yet when a live frame for "42" arrives.
    store.open("42");
    store.open("43");
    let merged = store.append_live("42", frame(8, 7, "late", "2026-01-10T09:00:00Z"));
    assert!(merged.is_none());

    store.load_history("43", vec![frame(20, 7, "hi", "2026-01-10T09:01:00Z")]);
    let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["20"]);
}

#[test]
fn test_late_history_response_discarded() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.open("43");

    // The fetch for "42" resolves after the user already moved on.
    let applied = store.load_history("42", vec![frame(1, 7, "stale", "2026-01-10T09:00:00Z")]);
    assert!(!applied);
    assert!(store.messages().is_empty());
    assert_eq!(store.active(), Some("43"));
}

#[test]
fn test_duplicate_delivery_is_idempotent() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history("42", vec![frame(1, 7, "hello", "2026-01-10T09:00:00Z")]);

    // The same message echoed again as a live frame.
    let merged = store.append_live("42", frame(1, 7, "hello", "2026-01-10T09:00:00Z"));
    assert!(merged.is_none());
    assert_eq!(store.messages().len(), 1);
}

#[test]
fn test_body_conversation_id_must_match_topic() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");

    let mut misrouted = frame(5, 7, "hi", "2026-01-10T09:00:00Z");
    misrouted.conversation_id = Some(99);
    assert!(store.append_live("42", misrouted).is_none());

    let mut consistent = frame(6, 7, "hi", "2026-01-10T09:00:00Z");
    consistent.conversation_id = Some(42);
    assert!(store.append_live("42", consistent).is_some());
}

#[test]
fn test_is_own_derived_from_current_session() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history(
        "42",
        vec![
            frame(1, 9, "mine", "2026-01-10T09:00:00Z"),
            frame(2, 7, "theirs", "2026-01-10T09:01:00Z"),
        ],
    );
    assert!(store.messages()[0].is_own);
    assert!(!store.messages()[1].is_own);
}

#[test]
fn test_session_change_clears_list() {
    let mut store = ThreadStore::new();
    store.set_session(Some(9));
    store.open("42");
    store.load_history("42", vec![frame(1, 9, "mine", "2026-01-10T09:00:00Z")]);

    // Logging in as a different user must not relabel old messages —
    // the list is cleared instead.
    store.set_session(Some(7));
    assert!(store.messages().is_empty());
    assert!(store.active().is_none());
}

// ─── Chat Service Tests ──────────────────────────────────

#[test]
fn test_open_conversation_loads_history_and_subscribes() {
    let (service, api, transport, bus) = service_fixture();
    *api.history.borrow_mut() = vec![
        frame(1, 7, "hello", "2026-01-10T09:00:00Z"),
        frame(2, 9, "hi", "2026-01-10T09:01:00Z"),
    ];

    service.start(&session(9));
    block_on(service.open_conversation("42"));

    assert_eq!(*transport.subs.borrow(), vec!["42".to_string()]);
    assert_eq!(service.messages().len(), 2);
    assert!(service.messages()[1].is_own);

    let events = bus.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::HistoryLoaded { conversation_id } if conversation_id == "42")));
}

#[test]
fn test_switch_conversation_rebinds_listener() {
    let (service, _api, transport, _bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));
    block_on(service.open_conversation("43"));

    assert_eq!(*transport.subs.borrow(), vec!["43".to_string()]);
    let calls = transport.calls.borrow();
    let unsub_pos = calls.iter().position(|c| c == "unsub:42").unwrap();
    let sub_pos = calls.iter().position(|c| c == "sub:43").unwrap();
    assert!(unsub_pos < sub_pos);
}

#[test]
fn test_live_frame_is_merged_and_emitted() {
    let (service, _api, transport, bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));
    bus.drain();

    transport.deliver(
        "42",
        r#"{ "id": 3, "sender": { "id": 9, "name": "user-9" }, "content": "echo",
             "createdAt": "2026-01-10T09:10:00Z" }"#,
    );

    assert_eq!(service.messages().len(), 1);
    assert!(service.messages()[0].is_own);

    let events = bus.drain();
    assert!(matches!(
        &events[..],
        [AppEvent::MessageReceived { conversation_id, message }]
            if conversation_id == "42" && message.id == "3"
    ));
}

#[test]
fn test_frame_for_other_conversation_is_ignored() {
    let (service, _api, transport, bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("43"));
    bus.drain();

    transport.deliver(
        "42",
        r#"{ "id": 3, "sender": { "id": 7, "name": "user-7" }, "content": "stray",
             "createdAt": "2026-01-10T09:10:00Z" }"#,
    );

    assert!(service.messages().is_empty());
    assert!(bus.drain().is_empty());
}

#[test]
fn test_malformed_frame_is_dropped() {
    let (service, _api, transport, bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));
    bus.drain();

    transport.deliver("42", "{ not json }");
    transport.deliver("42", r#"{ "id": 1 }"#);

    assert!(service.messages().is_empty());
    assert!(bus.drain().is_empty());
}

#[test]
fn test_send_whitespace_only_is_noop() {
    let (service, api, _transport, bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));
    bus.drain();

    assert!(block_on(service.send("42", "   ")).is_ok());
    assert!(api.posts.borrow().is_empty());
    assert!(service.messages().is_empty());
    assert!(bus.drain().is_empty());
}

#[test]
fn test_send_posts_once_without_local_echo() {
    let (service, api, _transport, _bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));

    block_on(service.send("42", "  see you there  ")).unwrap();

    assert_eq!(
        *api.posts.borrow(),
        vec![("42".to_string(), "see you there".to_string())]
    );
    // No optimistic append: the sender's copy arrives only via the
    // live subscription.
    assert!(service.messages().is_empty());
}

#[test]
fn test_send_failure_toasts_and_returns_err() {
    let (service, api, _transport, bus) = service_fixture();
    api.fail_posts.set(true);
    service.start(&session(9));
    block_on(service.open_conversation("42"));
    bus.drain();

    assert!(block_on(service.send("42", "hello")).is_err());
    let events = bus.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::Toast { success: false, .. })));
}

#[test]
fn test_expired_credential_surfaces_session_expired() {
    let (service, api, _transport, bus) = service_fixture();
    api.auth_expired.set(true);
    service.start(&session(9));
    block_on(service.open_conversation("42"));

    let events = bus.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::SessionExpired)));
}

#[test]
fn test_stop_releases_listener_and_disconnects() {
    let (service, _api, transport, _bus) = service_fixture();
    service.start(&session(9));
    block_on(service.open_conversation("42"));

    service.stop();
    assert!(transport.subs.borrow().is_empty());
    assert!(!transport.is_connected());
    assert!(service.messages().is_empty());
}
