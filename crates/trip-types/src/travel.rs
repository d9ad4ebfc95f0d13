use serde::{Deserialize, Serialize};

/// A hotel listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: u64,
    pub name: String,
    pub location: String,
    /// Price per night.
    pub price: f64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A review attached to a hotel listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    #[serde(default)]
    pub author: Option<String>,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A flight search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: u64,
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    pub seat_class: String,
}

/// A train search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub id: u64,
    pub train_name: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    pub train_class: String,
}

/// One wishlist entry; the backend nests the full hotel record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: u64,
    pub hotel: Hotel,
}

/// One itinerary activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub day: u32,
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub location: String,
}

/// Payload for creating a new activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub day: u32,
    pub time: String,
    pub title: String,
    pub notes: String,
    pub location: String,
}

/// A booking as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    pub total_amount: f64,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub hotel_name: Option<String>,
}

/// One traveller on a hotel or train booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub full_name: String,
    pub age: String,
    pub gender: String,
}

impl Guest {
    pub fn is_complete(&self) -> bool {
        !self.full_name.is_empty() && !self.age.is_empty() && !self.gender.is_empty()
    }
}

/// Checkout payload posted to the pending-booking endpoint.
///
/// The three wizard variants serialize to the ad-hoc shapes the backend
/// expects (`type` discriminator plus variant-specific fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookingDraft {
    #[serde(rename_all = "camelCase")]
    Hotel {
        user_id: u64,
        hotel_id: u64,
        check_in: String,
        check_out: String,
        nights: u32,
        rooms: u32,
        guests: Vec<Guest>,
        include_breakfast: bool,
        include_late_checkout: bool,
        price: f64,
        payment_method: String,
    },
    #[serde(rename_all = "camelCase")]
    Flight {
        user_id: u64,
        name: String,
        from_location: String,
        to_location: String,
        passenger_count: u32,
        price: f64,
        payment_method: String,
    },
    #[serde(rename_all = "camelCase")]
    Train {
        user_id: u64,
        name: String,
        from_location: String,
        to_location: String,
        passenger_count: u32,
        guests: Vec<Guest>,
        price: f64,
        payment_method: String,
    },
}

impl BookingDraft {
    pub fn price(&self) -> f64 {
        match self {
            BookingDraft::Hotel { price, .. }
            | BookingDraft::Flight { price, .. }
            | BookingDraft::Train { price, .. } => *price,
        }
    }
}

/// A pending booking returned by the init endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBooking {
    pub id: u64,
}

/// A Stripe-style checkout session; the client redirects to `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// A locally stored payment-method label. Never synced with the
/// backend; lives in browser local storage only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentMethod {
    Card { id: String, last4: String },
    Upi { id: String, upi_id: String },
}

impl PaymentMethod {
    pub fn new_card(last4: impl Into<String>) -> Self {
        PaymentMethod::Card {
            id: uuid::Uuid::new_v4().to_string(),
            last4: last4.into(),
        }
    }

    pub fn new_upi(upi_id: impl Into<String>) -> Self {
        PaymentMethod::Upi {
            id: uuid::Uuid::new_v4().to_string(),
            upi_id: upi_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PaymentMethod::Card { id, .. } | PaymentMethod::Upi { id, .. } => id,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PaymentMethod::Card { last4, .. } => format!("Card •••• {}", last4),
            PaymentMethod::Upi { upi_id, .. } => format!("UPI {}", upi_id),
        }
    }
}
