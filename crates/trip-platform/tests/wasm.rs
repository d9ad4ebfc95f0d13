//! WASM-target tests for trip-platform (Node.js runtime).
//!
//! Tests MemoryStorage and the SessionManager-over-storage flow under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! The localStorage and WebSocket adapters need a browser environment.

use wasm_bindgen_test::*;

use std::rc::Rc;

use trip_core::event_bus::EventBus;
use trip_core::ports::{ChatTransport, StoragePort};
use trip_core::session::SessionManager;
use trip_platform::storage::MemoryStorage;
use trip_platform::StompSocket;
use trip_types::config::keys;
use trip_types::session::{Session, User};

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("key1", "value1").await.unwrap();
    let result = storage.get("key1").await.unwrap();
    assert_eq!(result, Some("value1".to_string()));
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", "v1").await.unwrap();
    storage.set("key", "v2").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert_eq!(result, Some("v2".to_string()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", "val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_delete_nonexistent() {
    let storage = MemoryStorage::new();
    storage.delete("nonexistent").await.unwrap();
}

// ─── Session persistence ─────────────────────────────────

fn sample_session() -> Session {
    Session::new(
        User {
            id: 9,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            avatar_url: None,
        },
        "jwt-abc",
    )
}

#[wasm_bindgen_test]
async fn session_establish_persists_token_and_user() {
    let storage = Rc::new(MemoryStorage::new());
    let manager = SessionManager::new(storage.clone());

    manager.establish(sample_session()).await.unwrap();

    assert_eq!(
        storage.get(keys::TOKEN).await.unwrap(),
        Some("jwt-abc".to_string())
    );
    let user_json = storage.get(keys::USER).await.unwrap().unwrap();
    assert!(user_json.contains("asha@example.com"));
}

#[wasm_bindgen_test]
async fn session_restores_from_storage() {
    let storage = Rc::new(MemoryStorage::new());
    {
        let manager = SessionManager::new(storage.clone());
        manager.establish(sample_session()).await.unwrap();
    }

    let manager = SessionManager::new(storage);
    let restored = manager.restore().await.unwrap();
    assert_eq!(restored.user_id(), 9);
    assert!(manager.is_authenticated());
}

#[wasm_bindgen_test]
async fn session_restore_requires_both_records() {
    let storage = Rc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "jwt-abc").await.unwrap();

    let manager = SessionManager::new(storage);
    assert!(manager.restore().await.is_none());
    assert!(!manager.is_authenticated());
}

#[wasm_bindgen_test]
async fn session_clear_removes_both_records() {
    let storage = Rc::new(MemoryStorage::new());
    let manager = SessionManager::new(storage.clone());
    manager.establish(sample_session()).await.unwrap();

    manager.clear().await;
    assert!(storage.get(keys::TOKEN).await.unwrap().is_none());
    assert!(storage.get(keys::USER).await.unwrap().is_none());
    assert!(!manager.is_authenticated());
}

#[wasm_bindgen_test]
async fn session_corrupt_user_record_is_rejected() {
    let storage = Rc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "jwt-abc").await.unwrap();
    storage.set(keys::USER, "{ not json }").await.unwrap();

    let manager = SessionManager::new(storage);
    assert!(manager.restore().await.is_none());
}

// ─── STOMP transport ─────────────────────────────────────

#[wasm_bindgen_test]
fn socket_publish_dropped_while_disconnected() {
    // No live session: the publish is dropped, not queued, and no
    // socket is opened as a side effect.
    let socket = StompSocket::new("wss://example.invalid/ws", EventBus::new());
    assert!(!socket.is_connected());
    socket.publish("/app/chat.send", r#"{"conversationId":42,"content":"hi"}"#);
    assert!(!socket.is_connected());
}
