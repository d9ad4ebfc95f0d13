//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `trip-core` (pure Rust).
//! Implementations live in `trip-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::rc::Rc;

use async_trait::async_trait;
use trip_types::{
    chat::{Conversation, MessageFrame},
    session::{Session, User},
    travel::{
        Activity, Booking, BookingDraft, CheckoutSession, Flight, Hotel, NewActivity,
        PendingBooking, Review, Train, WishlistItem,
    },
    Result,
};

// ─── Auth Port ───────────────────────────────────────────────

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// Registration does not log in; the user is routed back to login.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<()>;

    async fn me(&self) -> Result<User>;
    async fn update_profile(&self, name: &str, email: &str) -> Result<()>;
    async fn update_password(&self, old_password: &str, new_password: &str) -> Result<()>;
    async fn upload_avatar(&self, avatar_base64: &str) -> Result<()>;
    async fn list_users(&self) -> Result<Vec<User>>;
}

// ─── Chat REST Port ──────────────────────────────────────────

#[async_trait(?Send)]
pub trait ChatApi {
    async fn conversations(&self) -> Result<Vec<Conversation>>;
    async fn create_group(&self, name: &str, member_ids: &[u64]) -> Result<Conversation>;
    async fn open_dm(&self, user_id: u64) -> Result<Conversation>;
    async fn add_members(&self, conversation_id: &str, member_ids: &[u64]) -> Result<()>;
    async fn remove_member(&self, conversation_id: &str, user_id: u64) -> Result<()>;
    async fn delete_group(&self, conversation_id: &str) -> Result<()>;

    /// One-shot history fetch for a conversation-open event. History
    /// records share the live-frame schema.
    async fn message_history(&self, conversation_id: &str) -> Result<Vec<MessageFrame>>;

    /// Fire-and-forget send. No retry; the authoritative copy arrives
    /// back over the live channel.
    async fn post_message(&self, conversation_id: &str, content: &str) -> Result<()>;
}

// ─── Live Transport Port ─────────────────────────────────────

/// Receives one decoded topic delivery: the conversation id the frame's
/// topic addresses, plus the raw frame body (JSON). Schema validation
/// happens in the core, not the adapter.
pub type FrameHandler = Rc<dyn Fn(String, String)>;

/// The live publish/subscribe channel to the message broker.
///
/// All operations are intentionally infallible at the call site: a
/// failed or dropped connection surfaces only through events, and
/// publishes while disconnected are silently dropped (best-effort,
/// at-most-once).
pub trait ChatTransport {
    /// Open a session authenticated with the bearer credential. On
    /// failure the adapter retries on its own (capped backoff).
    fn connect(&self, token: &str);

    /// Close the session and invalidate all subscriptions derived
    /// from it.
    fn disconnect(&self);

    fn is_connected(&self) -> bool;

    /// Attach the single topic listener for a conversation.
    fn subscribe(&self, conversation_id: &str);

    /// Release a conversation's topic listener.
    fn unsubscribe(&self, conversation_id: &str);

    /// Publish to a broker destination. Dropped when disconnected.
    fn publish(&self, destination: &str, body: &str);

    /// Install the inbound frame callback. Called once per delivery.
    fn set_frame_handler(&self, handler: FrameHandler);
}

// ─── Travel Port ─────────────────────────────────────────────

#[async_trait(?Send)]
pub trait TravelApi {
    async fn hotels(&self) -> Result<Vec<Hotel>>;
    async fn hotel(&self, id: u64) -> Result<Hotel>;

    async fn wishlist(&self) -> Result<Vec<WishlistItem>>;
    async fn add_to_wishlist(&self, hotel_id: u64) -> Result<()>;
    async fn remove_from_wishlist(&self, hotel_id: u64) -> Result<()>;

    async fn reviews(&self, hotel_id: u64) -> Result<Vec<Review>>;
    async fn add_review(&self, hotel_id: u64, rating: u8, comment: &str) -> Result<Review>;
    async fn delete_review(&self, review_id: u64) -> Result<()>;

    async fn itinerary(&self) -> Result<Vec<Activity>>;
    async fn add_activity(&self, activity: &NewActivity) -> Result<Activity>;
    async fn delete_activity(&self, id: u64) -> Result<()>;

    async fn search_flights(&self, from: &str, to: &str) -> Result<Vec<Flight>>;
    async fn search_trains(&self, from: &str, to: &str) -> Result<Vec<Train>>;

    async fn init_booking(&self, draft: &BookingDraft) -> Result<PendingBooking>;
    async fn confirm_booking(&self, payment_session_id: &str) -> Result<()>;
    async fn bookings_for_user(&self, user_id: u64) -> Result<Vec<Booking>>;
    async fn create_checkout_session(
        &self,
        booking_id: u64,
        amount: f64,
    ) -> Result<CheckoutSession>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
