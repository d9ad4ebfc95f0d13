//! REST adapter for the travel backend.
//!
//! Implements the auth, chat, and travel port traits over browser
//! `fetch()` via gloo-net. One instance is shared by every service;
//! the bearer credential is installed after login/restore and cleared
//! on logout.
//!
//! The backend wraps some responses in ad-hoc envelopes
//! (`{conversations: [...]}`, `{messages: [...]}`, `{group: ...}`);
//! the wire structs at the bottom of this file absorb those shapes.

use std::cell::RefCell;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use trip_core::ports::{AuthApi, ChatApi, TravelApi};
use trip_types::{
    chat::{Conversation, ConversationKind, MessageFrame},
    session::{LoginResponse, Session, User},
    travel::{
        Activity, Booking, BookingDraft, CheckoutSession, Flight, Hotel, NewActivity,
        PendingBooking, Review, Train, WishlistItem,
    },
    Result, TripError,
};

pub struct RestBackend {
    base: String,
    token: RefCell<Option<String>>,
}

impl RestBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            base: api_base.into(),
            token: RefCell::new(None),
        }
    }

    /// Install or clear the bearer credential used on every request.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let response = self
            .authorize(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(|e| TripError::Network(e.to_string()))?;
        check(response).await
    }

    async fn delete(&self, path: &str) -> Result<Response> {
        let response = self
            .authorize(Request::delete(&self.url(path)))
            .send()
            .await
            .map_err(|e| TripError::Network(e.to_string()))?;
        check(response).await
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .authorize(Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| TripError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TripError::Network(e.to_string()))?;
        check(response).await
    }

    async fn patch_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .authorize(Request::patch(&self.url(path)))
            .json(body)
            .map_err(|e| TripError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TripError::Network(e.to_string()))?;
        check(response).await
    }
}

/// Map non-2xx responses onto the error taxonomy. 401/403 collapse to
/// `Unauthorized` so callers can route back to login uniformly.
async fn check(response: Response) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    if status == 401 || status == 403 {
        return Err(TripError::Unauthorized);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => "unknown error".to_string(),
    };
    Err(TripError::Api { status, message })
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| TripError::Serialization(e.to_string()))
}

// ─── Auth ────────────────────────────────────────────────────

#[async_trait(?Send)]
impl AuthApi for RestBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .post_json(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        let login: LoginResponse = decode(response).await?;
        Ok(Session::new(login.user, login.token))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        self.post_json(
            "/api/auth/register",
            &json!({ "name": name, "email": email, "password": password }),
        )
        .await?;
        Ok(())
    }

    async fn me(&self) -> Result<User> {
        decode(self.get("/api/auth/me").await?).await
    }

    async fn update_profile(&self, name: &str, email: &str) -> Result<()> {
        self.patch_json("/api/auth/update", &json!({ "name": name, "email": email }))
            .await?;
        Ok(())
    }

    async fn update_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        self.patch_json(
            "/api/auth/update-password",
            &json!({ "oldPassword": old_password, "newPassword": new_password }),
        )
        .await?;
        Ok(())
    }

    async fn upload_avatar(&self, avatar_base64: &str) -> Result<()> {
        self.patch_json(
            "/api/auth/upload-avatar",
            &json!({ "avatarBase64": avatar_base64 }),
        )
        .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        decode(self.get("/api/auth/all").await?).await
    }
}

// ─── Chat ────────────────────────────────────────────────────

#[async_trait(?Send)]
impl ChatApi for RestBackend {
    async fn conversations(&self) -> Result<Vec<Conversation>> {
        let envelope: ConversationsEnvelope = decode(self.get("/api/conversations").await?).await?;
        Ok(envelope
            .conversations
            .into_iter()
            .map(WireConversation::into_conversation)
            .collect())
    }

    async fn create_group(&self, name: &str, member_ids: &[u64]) -> Result<Conversation> {
        let response = self
            .post_json(
                "/api/conversations/group",
                &json!({ "name": name, "memberIds": member_ids }),
            )
            .await?;
        let envelope: GroupEnvelope = decode(response).await?;
        Ok(envelope.group.into_conversation())
    }

    async fn open_dm(&self, user_id: u64) -> Result<Conversation> {
        let response = self
            .post_json(
                &format!("/api/conversations/dm?userId={}", user_id),
                &json!({}),
            )
            .await?;
        let envelope: DmEnvelope = decode(response).await?;
        Ok(envelope.conversation.into_conversation())
    }

    async fn add_members(&self, conversation_id: &str, member_ids: &[u64]) -> Result<()> {
        self.post_json(
            &format!("/api/conversations/{}/members", conversation_id),
            &json!({ "memberIds": member_ids }),
        )
        .await?;
        Ok(())
    }

    async fn remove_member(&self, conversation_id: &str, user_id: u64) -> Result<()> {
        self.delete(&format!(
            "/api/conversations/{}/members/{}",
            conversation_id, user_id
        ))
        .await?;
        Ok(())
    }

    async fn delete_group(&self, conversation_id: &str) -> Result<()> {
        self.delete(&format!("/api/conversations/{}", conversation_id))
            .await?;
        Ok(())
    }

    async fn message_history(&self, conversation_id: &str) -> Result<Vec<MessageFrame>> {
        let envelope: MessagesEnvelope =
            decode(self.get(&format!("/api/messages/{}", conversation_id)).await?).await?;
        Ok(envelope.messages)
    }

    async fn post_message(&self, conversation_id: &str, content: &str) -> Result<()> {
        self.post_json(
            "/api/messages",
            &json!({ "conversationId": conversation_id, "content": content }),
        )
        .await?;
        Ok(())
    }
}

// ─── Travel ──────────────────────────────────────────────────

#[async_trait(?Send)]
impl TravelApi for RestBackend {
    async fn hotels(&self) -> Result<Vec<Hotel>> {
        decode(self.get("/api/hotels").await?).await
    }

    async fn hotel(&self, id: u64) -> Result<Hotel> {
        decode(self.get(&format!("/api/hotels/{}", id)).await?).await
    }

    async fn wishlist(&self) -> Result<Vec<WishlistItem>> {
        decode(self.get("/api/wishlist").await?).await
    }

    async fn add_to_wishlist(&self, hotel_id: u64) -> Result<()> {
        self.post_json(&format!("/api/wishlist/{}", hotel_id), &json!({}))
            .await?;
        Ok(())
    }

    async fn remove_from_wishlist(&self, hotel_id: u64) -> Result<()> {
        self.delete(&format!("/api/wishlist/{}", hotel_id)).await?;
        Ok(())
    }

    async fn reviews(&self, hotel_id: u64) -> Result<Vec<Review>> {
        decode(self.get(&format!("/api/reviews/{}", hotel_id)).await?).await
    }

    async fn add_review(&self, hotel_id: u64, rating: u8, comment: &str) -> Result<Review> {
        let response = self
            .post_json(
                &format!("/api/reviews/{}", hotel_id),
                &json!({ "rating": rating, "comment": comment }),
            )
            .await?;
        decode(response).await
    }

    async fn delete_review(&self, review_id: u64) -> Result<()> {
        self.delete(&format!("/api/reviews/{}", review_id)).await?;
        Ok(())
    }

    async fn itinerary(&self) -> Result<Vec<Activity>> {
        decode(self.get("/api/itinerary").await?).await
    }

    async fn add_activity(&self, activity: &NewActivity) -> Result<Activity> {
        decode(self.post_json("/api/itinerary", activity).await?).await
    }

    async fn delete_activity(&self, id: u64) -> Result<()> {
        self.delete(&format!("/api/itinerary/delete/{}", id)).await?;
        Ok(())
    }

    async fn search_flights(&self, from: &str, to: &str) -> Result<Vec<Flight>> {
        decode(
            self.get(&format!("/api/travel/flights/search?from={}&to={}", from, to))
                .await?,
        )
        .await
    }

    async fn search_trains(&self, from: &str, to: &str) -> Result<Vec<Train>> {
        decode(
            self.get(&format!("/api/travel/trains/search?from={}&to={}", from, to))
                .await?,
        )
        .await
    }

    async fn init_booking(&self, draft: &BookingDraft) -> Result<PendingBooking> {
        decode(self.post_json("/api/bookings/init", draft).await?).await
    }

    async fn confirm_booking(&self, payment_session_id: &str) -> Result<()> {
        self.post_json(
            &format!("/api/bookings/confirm/{}", payment_session_id),
            &json!({}),
        )
        .await?;
        Ok(())
    }

    async fn bookings_for_user(&self, user_id: u64) -> Result<Vec<Booking>> {
        decode(self.get(&format!("/api/bookings/user/{}", user_id)).await?).await
    }

    async fn create_checkout_session(
        &self,
        booking_id: u64,
        amount: f64,
    ) -> Result<CheckoutSession> {
        let response = self
            .post_json(
                "/api/payment/create-checkout-session",
                &json!({ "bookingId": booking_id, "amount": amount }),
            )
            .await?;
        decode(response).await
    }
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default = "unknown_error")]
    message: String,
}

fn unknown_error() -> String {
    "unknown error".to_string()
}

#[derive(Deserialize)]
struct ConversationsEnvelope {
    #[serde(default)]
    conversations: Vec<WireConversation>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    messages: Vec<MessageFrame>,
}

#[derive(Deserialize)]
struct GroupEnvelope {
    group: WireConversation,
}

#[derive(Deserialize)]
struct DmEnvelope {
    conversation: WireConversation,
}

#[derive(Deserialize)]
struct WireConversation {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    members: Vec<User>,
}

impl WireConversation {
    fn into_conversation(self) -> Conversation {
        let kind = match self.kind.as_deref() {
            Some("DM") => ConversationKind::Dm,
            _ => ConversationKind::Group,
        };
        Conversation {
            id: self.id.to_string(),
            name: self.name.unwrap_or_else(|| match kind {
                ConversationKind::Dm => self
                    .members
                    .first()
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Direct message".to_string()),
                ConversationKind::Group => "Group".to_string(),
            }),
            kind,
            members: self.members,
            is_favorite: false,
            is_subscribed: false,
        }
    }
}
