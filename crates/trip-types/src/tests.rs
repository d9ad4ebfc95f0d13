use crate::chat::*;
use crate::config::*;
use crate::error::TripError;
use crate::session::*;
use crate::travel::*;

// ─── Frame Schema Tests ──────────────────────────────────

#[test]
fn test_frame_decodes_full_payload() {
    let body = r#"{
        "id": 3,
        "conversationId": 42,
        "sender": { "id": 7, "name": "Asha" },
        "content": "hello",
        "createdAt": "2026-01-10T09:30:00Z"
    }"#;
    let frame: MessageFrame = serde_json::from_str(body).unwrap();
    assert_eq!(frame.id, 3);
    assert_eq!(frame.conversation_id, Some(42));
    assert_eq!(frame.sender.id, 7);
    assert_eq!(frame.content, "hello");
}

#[test]
fn test_frame_conversation_id_optional() {
    let body = r#"{
        "id": 1,
        "sender": { "id": 2, "name": "Ben" },
        "content": "hi",
        "createdAt": "2026-01-10T09:30:00Z"
    }"#;
    let frame: MessageFrame = serde_json::from_str(body).unwrap();
    assert!(frame.conversation_id.is_none());
}

#[test]
fn test_frame_rejects_missing_sender() {
    let body = r#"{ "id": 1, "content": "hi", "createdAt": "2026-01-10T09:30:00Z" }"#;
    assert!(serde_json::from_str::<MessageFrame>(body).is_err());
}

#[test]
fn test_frame_rejects_bad_timestamp() {
    let body = r#"{
        "id": 1,
        "sender": { "id": 2, "name": "Ben" },
        "content": "hi",
        "createdAt": "yesterday"
    }"#;
    assert!(serde_json::from_str::<MessageFrame>(body).is_err());
}

#[test]
fn test_frame_into_message_own() {
    let frame: MessageFrame = serde_json::from_str(
        r#"{ "id": 5, "sender": { "id": 9, "name": "Me" }, "content": "x",
             "createdAt": "2026-01-10T09:30:00Z" }"#,
    )
    .unwrap();
    let msg = frame.clone().into_message(Some(9));
    assert!(msg.is_own);
    assert_eq!(msg.id, "5");

    let msg = frame.into_message(Some(10));
    assert!(!msg.is_own);
}

#[test]
fn test_frame_into_message_no_session() {
    let frame: MessageFrame = serde_json::from_str(
        r#"{ "id": 5, "sender": { "id": 9, "name": "Me" }, "content": "x",
             "createdAt": "2026-01-10T09:30:00Z" }"#,
    )
    .unwrap();
    assert!(!frame.into_message(None).is_own);
}

// ─── Session Tests ───────────────────────────────────────

#[test]
fn test_login_response_decode() {
    let body = r#"{
        "token": "jwt-abc",
        "user": { "id": 4, "name": "Dia", "email": "dia@example.com" }
    }"#;
    let resp: LoginResponse = serde_json::from_str(body).unwrap();
    let session = Session::new(resp.user, resp.token);
    assert_eq!(session.user_id(), 4);
    assert_eq!(session.token, "jwt-abc");
    assert!(session.user.avatar_url.is_none());
}

#[test]
fn test_user_avatar_roundtrip() {
    let user = User {
        id: 1,
        name: "A".into(),
        email: "a@b.c".into(),
        avatar_url: Some("data:image/png;base64,xyz".into()),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(json.contains("avatarUrl"));
    let back: User = serde_json::from_str(&json).unwrap();
    assert_eq!(back, user);
}

// ─── Conversation / Outgoing Tests ───────────────────────

#[test]
fn test_conversation_is_group() {
    let conv = Conversation {
        id: "42".into(),
        name: "Goa trip".into(),
        kind: ConversationKind::Group,
        members: vec![],
        is_favorite: false,
        is_subscribed: false,
    };
    assert!(conv.is_group());
}

// ─── Travel Types Tests ──────────────────────────────────

#[test]
fn test_hotel_decode_defaults() {
    let body = r#"{ "id": 1, "name": "Sea View", "location": "Goa", "price": 4200.0 }"#;
    let hotel: Hotel = serde_json::from_str(body).unwrap();
    assert_eq!(hotel.rating, 0.0);
    assert_eq!(hotel.review_count, 0);
    assert!(hotel.images.is_empty());
}

#[test]
fn test_flight_decode_camel_case() {
    let body = r#"{
        "id": 10, "airline": "IndiGo", "departureCity": "DEL", "arrivalCity": "BOM",
        "departureTime": "06:10", "arrivalTime": "08:25", "duration": "2h 15m",
        "price": 5400.0, "seatClass": "economy"
    }"#;
    let flight: Flight = serde_json::from_str(body).unwrap();
    assert_eq!(flight.departure_city, "DEL");
    assert_eq!(flight.seat_class, "economy");
}

#[test]
fn test_booking_draft_hotel_tag() {
    let draft = BookingDraft::Hotel {
        user_id: 1,
        hotel_id: 2,
        check_in: "2026-02-01".into(),
        check_out: "2026-02-03".into(),
        nights: 2,
        rooms: 1,
        guests: vec![],
        include_breakfast: true,
        include_late_checkout: false,
        price: 8400.0,
        payment_method: "card".into(),
    };
    let json = serde_json::to_string(&draft).unwrap();
    assert!(json.contains(r#""type":"hotel""#));
    assert!(json.contains(r#""hotelId":2"#));
    assert_eq!(draft.price(), 8400.0);
}

#[test]
fn test_guest_completeness() {
    let mut guest = Guest::default();
    assert!(!guest.is_complete());
    guest.full_name = "R. Rao".into();
    guest.age = "34".into();
    guest.gender = "female".into();
    assert!(guest.is_complete());
}

#[test]
fn test_payment_method_labels() {
    let card = PaymentMethod::Card {
        id: "1".into(),
        last4: "4242".into(),
    };
    assert_eq!(card.label(), "Card •••• 4242");
    let upi = PaymentMethod::Upi {
        id: "2".into(),
        upi_id: "me@bank".into(),
    };
    assert!(upi.label().contains("me@bank"));
    assert_eq!(upi.id(), "2");
}

#[test]
fn test_new_payment_methods_get_unique_ids() {
    let a = PaymentMethod::new_card("4242");
    let b = PaymentMethod::new_card("4242");
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_payment_method_storage_roundtrip() {
    let methods = vec![
        PaymentMethod::Card {
            id: "1".into(),
            last4: "0004".into(),
        },
        PaymentMethod::Upi {
            id: "2".into(),
            upi_id: "me@bank".into(),
        },
    ];
    let json = serde_json::to_string(&methods).unwrap();
    let back: Vec<PaymentMethod> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, methods);
}

// ─── Config Tests ────────────────────────────────────────

#[test]
fn test_theme_toggle() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
}

#[test]
fn test_theme_parse() {
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert!("solarized".parse::<Theme>().is_err());
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert!(config.api_base.starts_with("https://"));
    assert!(config.ws_url.starts_with("wss://"));
    assert_eq!(config.theme, Theme::Light);
}

// ─── Error Tests ─────────────────────────────────────────

#[test]
fn test_error_is_auth() {
    assert!(TripError::Unauthorized.is_auth());
    assert!(!TripError::Network("down".into()).is_auth());
}

#[test]
fn test_error_from_serde() {
    let err = serde_json::from_str::<MessageFrame>("{{nope").unwrap_err();
    let trip: TripError = err.into();
    assert!(matches!(trip, TripError::Serialization(_)));
}
