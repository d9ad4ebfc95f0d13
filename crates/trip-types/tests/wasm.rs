//! WASM-target tests for trip-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use trip_types::chat::*;
use trip_types::config::*;
use trip_types::session::*;
use trip_types::travel::*;

#[wasm_bindgen_test]
fn frame_decode_and_fold() {
    let frame: MessageFrame = serde_json::from_str(
        r#"{ "id": 3, "sender": { "id": 7, "name": "Asha" }, "content": "hello",
             "createdAt": "2026-01-10T09:30:00Z" }"#,
    )
    .unwrap();
    let msg = frame.into_message(Some(7));
    assert!(msg.is_own);
    assert_eq!(msg.sender_name, "Asha");
}

#[wasm_bindgen_test]
fn frame_rejects_malformed() {
    assert!(serde_json::from_str::<MessageFrame>(r#"{ "id": 3 }"#).is_err());
}

#[wasm_bindgen_test]
fn session_from_login_response() {
    let resp: LoginResponse = serde_json::from_str(
        r#"{ "token": "t", "user": { "id": 1, "name": "A", "email": "a@b.c" } }"#,
    )
    .unwrap();
    let session = Session::new(resp.user, resp.token);
    assert_eq!(session.user_id(), 1);
}

#[wasm_bindgen_test]
fn hotel_decode() {
    let hotel: Hotel = serde_json::from_str(
        r#"{ "id": 1, "name": "Sea View", "location": "Goa", "price": 4200.0 }"#,
    )
    .unwrap();
    assert_eq!(hotel.name, "Sea View");
}

#[wasm_bindgen_test]
fn theme_persistence_label() {
    assert_eq!(Theme::Dark.label(), "dark");
    assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
}
