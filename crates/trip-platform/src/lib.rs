//! Browser platform adapters.
//!
//! Implements the `trip-core` port traits against real browser APIs:
//! REST over `fetch()` (gloo-net), the live STOMP session over
//! `WebSocket` (web-sys), and key-value persistence over
//! `localStorage`.

pub mod rest;
pub mod socket;
pub mod storage;

pub use rest::RestBackend;
pub use socket::StompSocket;
pub use storage::{auto_detect_storage, LocalStorage, MemoryStorage};
