//! The live conversation delivery engine.
//!
//! Three collaborators: the connection manager owns one socket session
//! per authenticated user; the subscription router attaches a single
//! topic listener keyed to the open conversation; the merge reducer
//! folds inbound frames and REST-fetched history into an ordered,
//! deduplicated per-conversation message list.

pub mod connection;
pub mod router;
pub mod service;
pub mod stomp;
pub mod thread;

pub use connection::{ConnectionManager, ConnectionState, ReconnectPolicy};
pub use router::SubscriptionRouter;
pub use service::ChatService;
pub use thread::ThreadStore;
