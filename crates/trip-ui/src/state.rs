//! UI-level state that drives rendering.
//!
//! A read-only projection of the core services, updated each frame by
//! draining the EventBus plus explicit pushes from the app layer after
//! async fetches resolve. Panels mutate only their own form fields.

use trip_types::chat::{ChatMessage, Conversation};
use trip_types::config::Theme;
use trip_types::event::AppEvent;
use trip_types::session::User;
use trip_types::travel::{
    Activity, Booking, Flight, Guest, Hotel, PaymentMethod, Review, Train, WishlistItem,
};

/// Which top-level view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Explore,
    Details,
    Community,
    Wishlist,
    Itinerary,
    Trips,
    Profile,
    Payments,
}

/// Live-chat connection status as shown in the Community header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStatus {
    Connecting,
    Connected,
    Disconnected,
    /// Reconnect backoff hit its cap; retries continue underneath.
    Offline,
}

/// Transient notification; expires after a fixed number of frames.
#[derive(Clone)]
pub struct Toast {
    pub message: String,
    pub success: bool,
    pub ttl_frames: u32,
}

const TOAST_TTL_FRAMES: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Login/register form fields.
pub struct LoginForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub busy: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::SignIn,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            busy: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelTab {
    Hotels,
    Flights,
    Trains,
}

/// Hotel list ordering on the Explore view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelSort {
    Featured,
    PriceAsc,
    RatingDesc,
}

/// Explore search form.
pub struct SearchForm {
    pub tab: TravelTab,
    pub from: String,
    pub to: String,
    pub busy: bool,
    pub hotel_sort: HotelSort,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            tab: TravelTab::Hotels,
            from: String::new(),
            to: String::new(),
            busy: false,
            hotel_sort: HotelSort::Featured,
        }
    }
}

/// Sidebar filter on the Community view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFilter {
    All,
    Favourites,
    Groups,
    People,
}

#[derive(Default)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
}

#[derive(Default)]
pub struct ActivityForm {
    pub day: u32,
    pub time: String,
    pub title: String,
    pub notes: String,
    pub location: String,
}

impl ActivityForm {
    pub fn is_valid(&self) -> bool {
        self.day >= 1 && !self.time.trim().is_empty() && !self.title.trim().is_empty()
    }
}

#[derive(Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub avatar_data: String,
}

// ─── Currency converter ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Inr];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
        }
    }

    /// Indicative static rate, one USD in this currency.
    fn per_usd(self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Eur => 0.92,
            Currency::Gbp => 0.79,
            Currency::Inr => 83.2,
        }
    }

    pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
        amount / from.per_usd() * to.per_usd()
    }
}

/// Offline currency converter on the Profile view.
pub struct ConverterForm {
    pub amount: String,
    pub from: Currency,
    pub to: Currency,
}

impl Default for ConverterForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            from: Currency::Usd,
            to: Currency::Inr,
        }
    }
}

impl ConverterForm {
    /// `None` until the amount parses.
    pub fn result(&self) -> Option<f64> {
        let amount: f64 = self.amount.trim().parse().ok()?;
        Some(Currency::convert(amount, self.from, self.to))
    }
}

#[derive(Default)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn is_valid(&self) -> bool {
        !self.old_password.is_empty()
            && !self.new_password.is_empty()
            && self.new_password == self.confirm_password
    }
}

/// Group-creation dialog state.
#[derive(Default)]
pub struct GroupForm {
    pub open: bool,
    pub name: String,
    pub selected: Vec<u64>,
}

// ─── Checkout wizard ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Details,
    Guests,
    Payment,
}

pub enum CheckoutTarget {
    Hotel(Hotel),
    Flight(Flight),
    Train(Train),
}

/// Pricing add-ons for hotel stays (per night, per room).
pub const BREAKFAST_PER_NIGHT: f64 = 12.0;
pub const LATE_CHECKOUT_FLAT: f64 = 20.0;

/// Multi-step booking wizard. One is open at a time; closing it
/// discards all entered data.
pub struct CheckoutState {
    pub target: CheckoutTarget,
    pub step: CheckoutStep,
    pub check_in: String,
    pub check_out: String,
    pub nights: u32,
    pub rooms: u32,
    pub guests: Vec<Guest>,
    pub passenger_count: u32,
    pub include_breakfast: bool,
    pub include_late_checkout: bool,
    pub payment_method: String,
    /// True while the booking + checkout-session round trip is in
    /// flight. A failure clears it and leaves the wizard on the
    /// payment step.
    pub processing: bool,
}

impl CheckoutState {
    pub fn for_hotel(hotel: Hotel) -> Self {
        Self::new(CheckoutTarget::Hotel(hotel))
    }

    pub fn for_flight(flight: Flight) -> Self {
        Self::new(CheckoutTarget::Flight(flight))
    }

    pub fn for_train(train: Train) -> Self {
        Self::new(CheckoutTarget::Train(train))
    }

    fn new(target: CheckoutTarget) -> Self {
        Self {
            target,
            step: CheckoutStep::Details,
            check_in: String::new(),
            check_out: String::new(),
            nights: 1,
            rooms: 1,
            guests: vec![Guest::default()],
            passenger_count: 1,
            include_breakfast: false,
            include_late_checkout: false,
            payment_method: String::new(),
            processing: false,
        }
    }

    pub fn title(&self) -> &str {
        match &self.target {
            CheckoutTarget::Hotel(h) => &h.name,
            CheckoutTarget::Flight(f) => &f.airline,
            CheckoutTarget::Train(t) => &t.train_name,
        }
    }

    pub fn total(&self) -> f64 {
        match &self.target {
            CheckoutTarget::Hotel(h) => {
                let nights = self.nights.max(1) as f64;
                let rooms = self.rooms.max(1) as f64;
                let mut total = h.price * nights * rooms;
                if self.include_breakfast {
                    total += BREAKFAST_PER_NIGHT * nights * rooms;
                }
                if self.include_late_checkout {
                    total += LATE_CHECKOUT_FLAT;
                }
                total
            }
            CheckoutTarget::Flight(f) => f.price * self.passenger_count.max(1) as f64,
            CheckoutTarget::Train(t) => t.price * self.passenger_count.max(1) as f64,
        }
    }

    /// Whether the current step's inputs allow advancing.
    pub fn step_complete(&self) -> bool {
        match (self.step, &self.target) {
            (CheckoutStep::Details, CheckoutTarget::Hotel(_)) => {
                !self.check_in.trim().is_empty()
                    && !self.check_out.trim().is_empty()
                    && self.nights >= 1
                    && self.rooms >= 1
            }
            (CheckoutStep::Details, _) => self.passenger_count >= 1,
            (CheckoutStep::Guests, CheckoutTarget::Flight(_)) => true,
            (CheckoutStep::Guests, _) => {
                !self.guests.is_empty() && self.guests.iter().all(Guest::is_complete)
            }
            (CheckoutStep::Payment, _) => !self.payment_method.is_empty(),
        }
    }

    /// Build the booking payload. `None` until every step validates.
    pub fn draft(&self, user_id: u64) -> Option<trip_types::travel::BookingDraft> {
        use trip_types::travel::BookingDraft;
        if !self.step_complete() || self.step != CheckoutStep::Payment {
            return None;
        }
        match &self.target {
            CheckoutTarget::Hotel(h) => {
                if self.check_in.trim().is_empty()
                    || self.check_out.trim().is_empty()
                    || !self.guests.iter().all(Guest::is_complete)
                {
                    return None;
                }
                Some(BookingDraft::Hotel {
                    user_id,
                    hotel_id: h.id,
                    check_in: self.check_in.clone(),
                    check_out: self.check_out.clone(),
                    nights: self.nights,
                    rooms: self.rooms,
                    guests: self.guests.clone(),
                    include_breakfast: self.include_breakfast,
                    include_late_checkout: self.include_late_checkout,
                    price: self.total(),
                    payment_method: self.payment_method.clone(),
                })
            }
            CheckoutTarget::Flight(f) => Some(BookingDraft::Flight {
                user_id,
                name: f.airline.clone(),
                from_location: f.departure_city.clone(),
                to_location: f.arrival_city.clone(),
                passenger_count: self.passenger_count,
                price: self.total(),
                payment_method: self.payment_method.clone(),
            }),
            CheckoutTarget::Train(t) => {
                if !self.guests.iter().all(Guest::is_complete) {
                    return None;
                }
                Some(BookingDraft::Train {
                    user_id,
                    name: t.train_name.clone(),
                    from_location: t.departure_city.clone(),
                    to_location: t.arrival_city.clone(),
                    passenger_count: self.guests.len() as u32,
                    guests: self.guests.clone(),
                    price: self.total(),
                    payment_method: self.payment_method.clone(),
                })
            }
        }
    }
}

// ─── Root state ──────────────────────────────────────────

pub struct UiState {
    pub view: View,
    pub theme: Theme,
    pub toasts: Vec<Toast>,
    pub chat_status: ChatStatus,

    // Projections filled by the app layer after fetches.
    pub current_user: Option<User>,
    pub hotels: Vec<Hotel>,
    pub selected_hotel: Option<Hotel>,
    pub reviews: Vec<Review>,
    pub flights: Vec<Flight>,
    pub trains: Vec<Train>,
    pub wishlist: Vec<WishlistItem>,
    pub itinerary: Vec<Activity>,
    pub bookings: Vec<Booking>,
    pub conversations: Vec<Conversation>,
    pub users: Vec<User>,
    pub messages: Vec<ChatMessage>,
    pub active_conversation: Option<String>,
    /// True between opening a conversation and its history arriving.
    pub history_loading: bool,
    pub payment_methods: Vec<PaymentMethod>,

    // Form state owned by panels.
    pub login: LoginForm,
    pub search: SearchForm,
    pub chat_filter: ChatFilter,
    pub chat_search: String,
    pub composer: String,
    pub converter: ConverterForm,
    pub review_form: ReviewForm,
    pub activity_form: ActivityForm,
    pub profile_form: ProfileForm,
    pub password_form: PasswordForm,
    pub group_form: GroupForm,
    pub new_card_number: String,
    pub new_upi_id: String,
    pub checkout: Option<CheckoutState>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            view: View::Login,
            theme: Theme::default(),
            toasts: Vec::new(),
            chat_status: ChatStatus::Disconnected,
            current_user: None,
            hotels: Vec::new(),
            selected_hotel: None,
            reviews: Vec::new(),
            flights: Vec::new(),
            trains: Vec::new(),
            wishlist: Vec::new(),
            itinerary: Vec::new(),
            bookings: Vec::new(),
            conversations: Vec::new(),
            users: Vec::new(),
            messages: Vec::new(),
            active_conversation: None,
            history_loading: false,
            payment_methods: Vec::new(),
            login: LoginForm::default(),
            search: SearchForm::default(),
            chat_filter: ChatFilter::All,
            chat_search: String::new(),
            composer: String::new(),
            converter: ConverterForm::default(),
            review_form: ReviewForm::default(),
            activity_form: ActivityForm::default(),
            profile_form: ProfileForm::default(),
            password_form: PasswordForm::default(),
            group_form: GroupForm::default(),
            new_card_number: String::new(),
            new_upi_id: String::new(),
            checkout: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_wishlisted(&self, hotel_id: u64) -> bool {
        self.wishlist.iter().any(|item| item.hotel.id == hotel_id)
    }

    pub fn is_favourite(&self, conversation_id: &str) -> bool {
        self.conversations
            .iter()
            .any(|c| c.id == conversation_id && c.is_favorite)
    }

    /// Clear the composer once a send went through, unless the user
    /// has already replaced the text with something new.
    pub fn clear_composer_after_send(&mut self, sent: &str) {
        if self.composer.trim() == sent {
            self.composer.clear();
        }
    }

    /// Client-local star; never synced with the backend.
    pub fn toggle_favourite(&mut self, conversation_id: &str) {
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.is_favorite = !conversation.is_favorite;
        }
    }

    /// Drain the event bus into UI updates.
    pub fn process_events(&mut self, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::ChatConnected => self.chat_status = ChatStatus::Connected,
                AppEvent::ChatDisconnected => self.chat_status = ChatStatus::Disconnected,
                AppEvent::ChatOffline => self.chat_status = ChatStatus::Offline,
                AppEvent::HistoryLoaded { .. } => {}
                AppEvent::MessageReceived {
                    conversation_id,
                    message,
                } => {
                    // Mirror the core's list; frames for other
                    // conversations were already filtered there.
                    if self.active_conversation.as_deref() == Some(conversation_id.as_str()) {
                        self.messages.push(message);
                    }
                }
                AppEvent::SessionExpired => {
                    self.reset_session_data();
                    self.toast("Session expired, please log in again", false);
                }
                AppEvent::Toast { message, success } => self.toast(&message, success),
            }
        }
    }

    pub fn toast(&mut self, message: &str, success: bool) {
        self.toasts.push(Toast {
            message: message.to_string(),
            success,
            ttl_frames: TOAST_TTL_FRAMES,
        });
    }

    /// Called once per frame to expire toasts.
    pub fn tick(&mut self) {
        for toast in &mut self.toasts {
            toast.ttl_frames = toast.ttl_frames.saturating_sub(1);
        }
        self.toasts.retain(|t| t.ttl_frames > 0);
    }

    /// Wipe everything bound to the signed-in user and return to the
    /// login view. Theme and payment methods are device-local and
    /// survive.
    pub fn reset_session_data(&mut self) {
        self.view = View::Login;
        self.current_user = None;
        self.selected_hotel = None;
        self.reviews.clear();
        self.wishlist.clear();
        self.itinerary.clear();
        self.bookings.clear();
        self.conversations.clear();
        self.users.clear();
        self.messages.clear();
        self.active_conversation = None;
        self.history_loading = false;
        self.chat_filter = ChatFilter::All;
        self.chat_search.clear();
        self.composer.clear();
        self.checkout = None;
        self.chat_status = ChatStatus::Disconnected;
        self.login = LoginForm::default();
        self.profile_form = ProfileForm::default();
        self.password_form = PasswordForm::default();
        self.group_form = GroupForm::default();
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
