//! Main egui application — composes the panels and drives the services.
//!
//! Panels are pure render functions returning action enums; this file is
//! the only place that spawns async work. Every spawned task requests a
//! repaint when it resolves so results show without user input.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, TopBottomPanel, Vec2};
use wasm_bindgen_futures::spawn_local;

use trip_core::chat::service::ChatService;
use trip_core::event_bus::EventBus;
use trip_core::ports::{AuthApi, ChatApi, StoragePort, TravelApi};
use trip_core::session::SessionManager;
use trip_platform::{auto_detect_storage, RestBackend, StompSocket};
use trip_types::config::{keys, AppConfig, Theme};
use trip_types::event::AppEvent;
use trip_types::travel::{BookingDraft, NewActivity, PaymentMethod};
use trip_ui::panels::{
    checkout_sheet, community_panel, details_panel, explore_panel, itinerary_panel, login_panel,
    payments_panel, profile_panel, trips_panel, wishlist_panel, CheckoutAction, CommunityAction,
    DetailsAction, ExploreAction, ItineraryAction, LoginAction, PaymentsAction, ProfileAction,
    WishlistAction,
};
use trip_ui::state::{CheckoutState, UiState, View};
use trip_ui::theme;

/// One collected panel action per frame.
enum Action {
    Navigate(View),
    Login(LoginAction),
    Explore(ExploreAction),
    Details(DetailsAction),
    Community(CommunityAction),
    Wishlist(WishlistAction),
    Itinerary(ItineraryAction),
    Profile(ProfileAction),
    Payments(PaymentsAction),
    Checkout(CheckoutAction),
}

/// The main application state
pub struct TripApp {
    state: Rc<RefCell<UiState>>,
    bus: EventBus,
    session: Rc<SessionManager>,
    api: Rc<RestBackend>,
    chat: Rc<ChatService>,
    storage: Rc<dyn StoragePort>,
    applied_theme: Option<Theme>,
}

impl TripApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let bus = EventBus::new();

        let storage: Rc<dyn StoragePort> = auto_detect_storage();
        log::info!("storage backend: {}", storage.backend_name());

        let session = Rc::new(SessionManager::new(storage.clone()));
        let api = Rc::new(RestBackend::new(config.api_base.clone()));
        let transport = Rc::new(StompSocket::new(config.ws_url.clone(), bus.clone()));
        let chat = Rc::new(ChatService::new(api.clone(), transport, bus.clone()));

        let app = Self {
            state: Rc::new(RefCell::new(UiState::new())),
            bus,
            session,
            api,
            chat,
            storage,
            applied_theme: None,
        };

        app.bootstrap(cc.egui_ctx.clone());
        app
    }

    /// Startup: read device-local preferences, then try to restore the
    /// cached session and go straight to Explore if it is still there.
    fn bootstrap(&self, ctx: egui::Context) {
        let state = self.state.clone();
        let storage = self.storage.clone();
        let session_mgr = self.session.clone();
        let api = self.api.clone();
        let chat = self.chat.clone();
        spawn_local(async move {
            if let Ok(Some(saved)) = storage.get(keys::THEME).await {
                if let Ok(theme) = saved.parse::<Theme>() {
                    state.borrow_mut().theme = theme;
                }
            }
            if let Ok(Some(raw)) = storage.get(keys::PAYMENT_METHODS).await {
                match serde_json::from_str::<Vec<PaymentMethod>>(&raw) {
                    Ok(methods) => state.borrow_mut().payment_methods = methods,
                    Err(e) => log::warn!("stored payment methods are unreadable: {}", e),
                }
            }

            if let Some(session) = session_mgr.restore().await {
                api.set_token(Some(session.token.clone()));
                {
                    let mut st = state.borrow_mut();
                    st.current_user = Some(session.user.clone());
                    st.profile_form.name = session.user.name.clone();
                    st.profile_form.email = session.user.email.clone();
                    st.view = View::Explore;
                }
                chat.start(&session);

                // Returning from the hosted checkout page.
                if let Some(session_id) = payment_session_from_url() {
                    match api.confirm_booking(&session_id).await {
                        Ok(()) => state.borrow_mut().toast("Payment confirmed", true),
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Payment confirmation failed: {}", e), false),
                    }
                }

                load_initial(&api, &state).await;
            }
            ctx.request_repaint();
        });
    }

    fn repainting<F>(&self, ctx: &egui::Context, fut: F)
    where
        F: std::future::Future<Output = ()> + 'static,
    {
        let ctx = ctx.clone();
        spawn_local(async move {
            fut.await;
            ctx.request_repaint();
        });
    }

    fn persist_theme(&self, theme: Theme) {
        let storage = self.storage.clone();
        spawn_local(async move {
            if let Err(e) = storage.set(keys::THEME, theme.label()).await {
                log::warn!("failed to persist theme: {}", e);
            }
        });
    }

    fn persist_payment_methods(&self) {
        let json = match serde_json::to_string(&self.state.borrow().payment_methods) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to encode payment methods: {}", e);
                return;
            }
        };
        let storage = self.storage.clone();
        spawn_local(async move {
            if let Err(e) = storage.set(keys::PAYMENT_METHODS, &json).await {
                log::warn!("failed to persist payment methods: {}", e);
            }
        });
    }

    /// App-side half of logout and credential rejection.
    fn teardown_session(&self) {
        self.chat.stop();
        self.api.set_token(None);
        let session = self.session.clone();
        spawn_local(async move {
            session.clear().await;
        });
    }

    // ─── Action handlers ─────────────────────────────────

    fn handle(&self, ctx: &egui::Context, action: Action) {
        match action {
            Action::Navigate(view) => self.navigate(ctx, view),
            Action::Login(a) => self.handle_login(ctx, a),
            Action::Explore(a) => self.handle_explore(ctx, a),
            Action::Details(a) => self.handle_details(ctx, a),
            Action::Community(a) => self.handle_community(ctx, a),
            Action::Wishlist(a) => self.handle_wishlist(ctx, a),
            Action::Itinerary(a) => self.handle_itinerary(ctx, a),
            Action::Profile(a) => self.handle_profile(ctx, a),
            Action::Payments(a) => self.handle_payments(ctx, a),
            Action::Checkout(a) => self.handle_checkout(ctx, a),
        }
    }

    fn navigate(&self, ctx: &egui::Context, view: View) {
        self.state.borrow_mut().view = view;
        // Both views render bookings; refresh on entry.
        if view == View::Trips || view == View::Payments {
            let user_id = match self.state.borrow().current_user.as_ref() {
                Some(user) => user.id,
                None => return,
            };
            let (api, state) = (self.api.clone(), self.state.clone());
            self.repainting(ctx, async move {
                match api.bookings_for_user(user_id).await {
                    Ok(bookings) => state.borrow_mut().bookings = bookings,
                    Err(e) => log::warn!("booking fetch failed: {}", e),
                }
            });
        }
    }

    fn handle_login(&self, ctx: &egui::Context, action: LoginAction) {
        match action {
            LoginAction::SignIn { email, password } => {
                self.state.borrow_mut().login.busy = true;
                let state = self.state.clone();
                let api = self.api.clone();
                let session_mgr = self.session.clone();
                let chat = self.chat.clone();
                self.repainting(ctx, async move {
                    match api.login(&email, &password).await {
                        Ok(session) => {
                            api.set_token(Some(session.token.clone()));
                            if let Err(e) = session_mgr.establish(session.clone()).await {
                                log::warn!("failed to persist session: {}", e);
                            }
                            {
                                let mut st = state.borrow_mut();
                                st.current_user = Some(session.user.clone());
                                st.profile_form.name = session.user.name.clone();
                                st.profile_form.email = session.user.email.clone();
                                st.login = Default::default();
                                st.view = View::Explore;
                            }
                            chat.start(&session);
                            load_initial(&api, &state).await;
                        }
                        Err(e) => {
                            let mut st = state.borrow_mut();
                            st.login.busy = false;
                            st.toast(&format!("Sign-in failed: {}", e), false);
                        }
                    }
                });
            }
            LoginAction::SignUp {
                name,
                email,
                password,
            } => {
                self.state.borrow_mut().login.busy = true;
                let state = self.state.clone();
                let api = self.api.clone();
                self.repainting(ctx, async move {
                    match api.register(&name, &email, &password).await {
                        Ok(()) => {
                            let mut st = state.borrow_mut();
                            st.login = Default::default();
                            st.toast("Account created. Please sign in.", true);
                        }
                        Err(e) => {
                            let mut st = state.borrow_mut();
                            st.login.busy = false;
                            st.toast(&format!("Sign-up failed: {}", e), false);
                        }
                    }
                });
            }
        }
    }

    fn open_hotel_details(&self, ctx: &egui::Context, hotel_id: u64) {
        let (api, state) = (self.api.clone(), self.state.clone());
        self.repainting(ctx, async move {
            match api.hotel(hotel_id).await {
                Ok(hotel) => {
                    let reviews = api.reviews(hotel_id).await.unwrap_or_default();
                    let mut st = state.borrow_mut();
                    st.selected_hotel = Some(hotel);
                    st.reviews = reviews;
                    st.review_form = Default::default();
                    st.view = View::Details;
                }
                Err(e) => state
                    .borrow_mut()
                    .toast(&format!("Could not load hotel: {}", e), false),
            }
        });
    }

    fn toggle_wishlist(&self, ctx: &egui::Context, hotel_id: u64) {
        let wishlisted = self.state.borrow().is_wishlisted(hotel_id);
        let (api, state) = (self.api.clone(), self.state.clone());
        self.repainting(ctx, async move {
            let result = if wishlisted {
                api.remove_from_wishlist(hotel_id).await
            } else {
                api.add_to_wishlist(hotel_id).await
            };
            if let Err(e) = result {
                state
                    .borrow_mut()
                    .toast(&format!("Wishlist update failed: {}", e), false);
                return;
            }
            refresh_wishlist(&api, &state).await;
        });
    }

    fn handle_explore(&self, ctx: &egui::Context, action: ExploreAction) {
        match action {
            ExploreAction::OpenDetails(hotel_id) => self.open_hotel_details(ctx, hotel_id),
            ExploreAction::ToggleWishlist(hotel_id) => self.toggle_wishlist(ctx, hotel_id),
            ExploreAction::SearchFlights { from, to } => {
                self.state.borrow_mut().search.busy = true;
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    let result = api.search_flights(&from, &to).await;
                    let mut st = state.borrow_mut();
                    st.search.busy = false;
                    match result {
                        Ok(flights) => st.flights = flights,
                        Err(e) => st.toast(&format!("Flight search failed: {}", e), false),
                    }
                });
            }
            ExploreAction::SearchTrains { from, to } => {
                self.state.borrow_mut().search.busy = true;
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    let result = api.search_trains(&from, &to).await;
                    let mut st = state.borrow_mut();
                    st.search.busy = false;
                    match result {
                        Ok(trains) => st.trains = trains,
                        Err(e) => st.toast(&format!("Train search failed: {}", e), false),
                    }
                });
            }
            ExploreAction::BookFlight(flight) => {
                self.state.borrow_mut().checkout = Some(CheckoutState::for_flight(flight));
            }
            ExploreAction::BookTrain(train) => {
                self.state.borrow_mut().checkout = Some(CheckoutState::for_train(train));
            }
        }
    }

    fn handle_details(&self, ctx: &egui::Context, action: DetailsAction) {
        match action {
            DetailsAction::Back => self.state.borrow_mut().view = View::Explore,
            DetailsAction::ToggleWishlist(hotel_id) => self.toggle_wishlist(ctx, hotel_id),
            DetailsAction::StartCheckout => {
                let mut st = self.state.borrow_mut();
                if let Some(hotel) = st.selected_hotel.clone() {
                    st.checkout = Some(CheckoutState::for_hotel(hotel));
                }
            }
            DetailsAction::SubmitReview {
                hotel_id,
                rating,
                comment,
            } => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.add_review(hotel_id, rating, &comment).await {
                        Ok(_) => {
                            let reviews = api.reviews(hotel_id).await.unwrap_or_default();
                            let mut st = state.borrow_mut();
                            st.reviews = reviews;
                            st.review_form = Default::default();
                            st.toast("Review posted", true);
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not post review: {}", e), false),
                    }
                });
            }
            DetailsAction::DeleteReview(review_id) => {
                let hotel_id = match self.state.borrow().selected_hotel.as_ref() {
                    Some(hotel) => hotel.id,
                    None => return,
                };
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.delete_review(review_id).await {
                        Ok(()) => {
                            let reviews = api.reviews(hotel_id).await.unwrap_or_default();
                            state.borrow_mut().reviews = reviews;
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not delete review: {}", e), false),
                    }
                });
            }
        }
    }

    fn open_conversation(&self, ctx: &egui::Context, conversation_id: String) {
        {
            let mut st = self.state.borrow_mut();
            st.active_conversation = Some(conversation_id.clone());
            st.messages.clear();
            st.history_loading = true;
            for conversation in &mut st.conversations {
                conversation.is_subscribed = conversation.id == conversation_id;
            }
        }
        let chat = self.chat.clone();
        self.repainting(ctx, async move {
            chat.open_conversation(&conversation_id).await;
        });
    }

    fn handle_community(&self, ctx: &egui::Context, action: CommunityAction) {
        match action {
            CommunityAction::OpenConversation(conversation_id) => {
                self.open_conversation(ctx, conversation_id);
            }
            CommunityAction::Send {
                conversation_id,
                content,
            } => {
                // The panel leaves the composer untouched; it clears
                // only once the POST went through.
                let (chat, state) = (self.chat.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    if chat.send(&conversation_id, &content).await.is_ok() {
                        state.borrow_mut().clear_composer_after_send(&content);
                    }
                });
            }
            CommunityAction::OpenDm(user_id) => {
                let (api, chat, state) = (self.api.clone(), self.chat.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.open_dm(user_id).await {
                        Ok(conversation) => {
                            let id = conversation.id.clone();
                            refresh_conversations(&api, &state).await;
                            {
                                let mut st = state.borrow_mut();
                                st.active_conversation = Some(id.clone());
                                st.messages.clear();
                                st.history_loading = true;
                            }
                            chat.open_conversation(&id).await;
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not open chat: {}", e), false),
                    }
                });
            }
            CommunityAction::CreateGroup { name, member_ids } => {
                let (api, chat, state) = (self.api.clone(), self.chat.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.create_group(&name, &member_ids).await {
                        Ok(conversation) => {
                            let id = conversation.id.clone();
                            refresh_conversations(&api, &state).await;
                            {
                                let mut st = state.borrow_mut();
                                st.group_form = Default::default();
                                st.active_conversation = Some(id.clone());
                                st.messages.clear();
                                st.history_loading = true;
                                st.toast("Group created", true);
                            }
                            chat.open_conversation(&id).await;
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not create group: {}", e), false),
                    }
                });
            }
            CommunityAction::ToggleFavourite(conversation_id) => {
                self.state.borrow_mut().toggle_favourite(&conversation_id);
            }
            CommunityAction::AddMember {
                conversation_id,
                user_id,
            } => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.add_members(&conversation_id, &[user_id]).await {
                        Ok(()) => refresh_conversations(&api, &state).await,
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not add member: {}", e), false),
                    }
                });
            }
            CommunityAction::RemoveMember {
                conversation_id,
                user_id,
            } => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.remove_member(&conversation_id, user_id).await {
                        Ok(()) => refresh_conversations(&api, &state).await,
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not remove member: {}", e), false),
                    }
                });
            }
            CommunityAction::DeleteGroup(conversation_id) => {
                let (api, chat, state) = (self.api.clone(), self.chat.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.delete_group(&conversation_id).await {
                        Ok(()) => {
                            let was_active = state.borrow().active_conversation.as_deref()
                                == Some(conversation_id.as_str());
                            if was_active {
                                chat.close_conversation();
                                let mut st = state.borrow_mut();
                                st.active_conversation = None;
                                st.messages.clear();
                                st.history_loading = false;
                            }
                            refresh_conversations(&api, &state).await;
                            state.borrow_mut().toast("Group deleted", true);
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not delete group: {}", e), false),
                    }
                });
            }
        }
    }

    fn handle_wishlist(&self, ctx: &egui::Context, action: WishlistAction) {
        match action {
            WishlistAction::OpenDetails(hotel_id) => self.open_hotel_details(ctx, hotel_id),
            WishlistAction::Remove(hotel_id) => self.toggle_wishlist(ctx, hotel_id),
        }
    }

    fn handle_itinerary(&self, ctx: &egui::Context, action: ItineraryAction) {
        match action {
            ItineraryAction::Add(activity) => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match add_activity_and_refresh(&api, &activity).await {
                        Ok(itinerary) => {
                            let mut st = state.borrow_mut();
                            st.itinerary = itinerary;
                            st.activity_form = Default::default();
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not add activity: {}", e), false),
                    }
                });
            }
            ItineraryAction::Delete(activity_id) => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.delete_activity(activity_id).await {
                        Ok(()) => match api.itinerary().await {
                            Ok(itinerary) => state.borrow_mut().itinerary = itinerary,
                            Err(e) => log::warn!("itinerary refresh failed: {}", e),
                        },
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not delete activity: {}", e), false),
                    }
                });
            }
        }
    }

    fn handle_profile(&self, ctx: &egui::Context, action: ProfileAction) {
        match action {
            ProfileAction::SaveProfile { name, email } => {
                let (api, session_mgr, state) =
                    (self.api.clone(), self.session.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.update_profile(&name, &email).await {
                        Ok(()) => match api.me().await {
                            Ok(user) => {
                                if let Err(e) = session_mgr.update_user(user.clone()).await {
                                    log::warn!("failed to persist profile update: {}", e);
                                }
                                let mut st = state.borrow_mut();
                                st.current_user = Some(user);
                                st.toast("Profile saved", true);
                            }
                            Err(e) => log::warn!("profile refetch failed: {}", e),
                        },
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not save profile: {}", e), false),
                    }
                });
            }
            ProfileAction::UploadAvatar(avatar_data) => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.upload_avatar(&avatar_data).await {
                        Ok(()) => {
                            if let Ok(user) = api.me().await {
                                state.borrow_mut().current_user = Some(user);
                            }
                            state.borrow_mut().toast("Avatar updated", true);
                        }
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not upload avatar: {}", e), false),
                    }
                });
            }
            ProfileAction::ChangePassword {
                old_password,
                new_password,
            } => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.update_password(&old_password, &new_password).await {
                        Ok(()) => state.borrow_mut().toast("Password changed", true),
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not change password: {}", e), false),
                    }
                });
            }
            ProfileAction::ToggleTheme => {
                let theme = {
                    let mut st = self.state.borrow_mut();
                    st.theme = st.theme.toggled();
                    st.theme
                };
                self.persist_theme(theme);
            }
            ProfileAction::Logout => {
                self.teardown_session();
                self.state.borrow_mut().reset_session_data();
            }
        }
    }

    fn handle_payments(&self, ctx: &egui::Context, action: PaymentsAction) {
        match action {
            PaymentsAction::Add(method) => {
                self.state.borrow_mut().payment_methods.push(method);
                self.persist_payment_methods();
            }
            PaymentsAction::Remove(id) => {
                self.state
                    .borrow_mut()
                    .payment_methods
                    .retain(|m| m.id() != id);
                self.persist_payment_methods();
            }
            PaymentsAction::PayBooking { booking_id, amount } => {
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match api.create_checkout_session(booking_id, amount).await {
                        Ok(session) => redirect(&session.url),
                        Err(e) => state
                            .borrow_mut()
                            .toast(&format!("Could not start payment: {}", e), false),
                    }
                });
            }
        }
    }

    fn handle_checkout(&self, ctx: &egui::Context, action: CheckoutAction) {
        match action {
            CheckoutAction::Close => self.state.borrow_mut().checkout = None,
            CheckoutAction::Confirm(draft) => {
                if let Some(checkout) = self.state.borrow_mut().checkout.as_mut() {
                    checkout.processing = true;
                }
                let (api, state) = (self.api.clone(), self.state.clone());
                self.repainting(ctx, async move {
                    match start_payment(&api, &draft).await {
                        Ok(url) => {
                            state.borrow_mut().toast("Redirecting to payment…", true);
                            redirect(&url);
                        }
                        Err(e) => {
                            // Wizard stays open on the payment step.
                            let mut st = state.borrow_mut();
                            if let Some(checkout) = st.checkout.as_mut() {
                                checkout.processing = false;
                            }
                            st.toast(&format!("Booking failed: {}", e), false);
                        }
                    }
                });
            }
        }
    }

    // ─── Rendering ───────────────────────────────────────

    fn nav_bar(&self, ctx: &egui::Context) -> Option<Action> {
        let mut action = None;
        let state = self.state.borrow();
        let p = theme::palette(state.theme);

        TopBottomPanel::top("nav")
            .frame(egui::Frame::default().fill(p.bg_secondary).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Roam").color(p.accent).strong().size(18.0));
                    ui.add_space(12.0);
                    for (label, view) in [
                        ("Explore", View::Explore),
                        ("Community", View::Community),
                        ("Wishlist", View::Wishlist),
                        ("Itinerary", View::Itinerary),
                        ("Trips", View::Trips),
                        ("Payments", View::Payments),
                        ("Profile", View::Profile),
                    ] {
                        let color = if state.view == view {
                            p.accent
                        } else {
                            p.text_secondary
                        };
                        if ui
                            .add(egui::Button::new(RichText::new(label).color(color)).frame(false))
                            .clicked()
                        {
                            action = Some(Action::Navigate(view));
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(user) = &state.current_user {
                            ui.label(RichText::new(&user.name).color(p.text_secondary).small());
                        }
                    });
                });
            });
        action
    }

    fn toast_overlay(&self, ctx: &egui::Context) {
        let state = self.state.borrow();
        if state.toasts.is_empty() {
            return;
        }
        let p = theme::palette(state.theme);
        egui::Area::new(egui::Id::new("toast_overlay"))
            .anchor(egui::Align2::RIGHT_BOTTOM, Vec2::new(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in &state.toasts {
                    let color = if toast.success { p.success } else { p.error };
                    egui::Frame::default()
                        .fill(p.bg_surface)
                        .corner_radius(theme::PANEL_ROUNDING)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(&toast.message).color(color));
                        });
                    ui.add_space(4.0);
                }
            });
    }
}

impl eframe::App for TripApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_theme = self.state.borrow().theme;
        if self.applied_theme != Some(current_theme) {
            theme::apply_theme(ctx, current_theme);
            self.applied_theme = Some(current_theme);
        }

        let events = self.bus.drain();
        for event in &events {
            match event {
                AppEvent::SessionExpired => self.teardown_session(),
                AppEvent::HistoryLoaded { conversation_id } => {
                    let mut st = self.state.borrow_mut();
                    if st.active_conversation.as_deref() == Some(conversation_id.as_str()) {
                        st.messages = self.chat.messages();
                        st.history_loading = false;
                    }
                }
                _ => {}
            }
        }
        {
            let mut st = self.state.borrow_mut();
            st.process_events(events);
            st.tick();
            if !st.toasts.is_empty() {
                ctx.request_repaint();
            }
        }

        let mut action = None;
        let authenticated = self.state.borrow().is_authenticated();
        if authenticated {
            action = self.nav_bar(ctx);
        }

        CentralPanel::default().show(ctx, |ui| {
            let mut st = self.state.borrow_mut();
            let panel_action = match st.view {
                View::Login => login_panel(ui, &mut st).map(Action::Login),
                View::Explore => explore_panel(ui, &mut st).map(Action::Explore),
                View::Details => details_panel(ui, &mut st).map(Action::Details),
                View::Community => community_panel(ui, &mut st).map(Action::Community),
                View::Wishlist => wishlist_panel(ui, &mut st).map(Action::Wishlist),
                View::Itinerary => itinerary_panel(ui, &mut st).map(Action::Itinerary),
                View::Trips => {
                    trips_panel(ui, &st);
                    None
                }
                View::Profile => profile_panel(ui, &mut st).map(Action::Profile),
                View::Payments => payments_panel(ui, &mut st).map(Action::Payments),
            };
            if panel_action.is_some() {
                action = panel_action;
            }
        });

        let has_checkout = self.state.borrow().checkout.is_some();
        if has_checkout {
            let mut st = self.state.borrow_mut();
            if let Some(checkout_action) = checkout_sheet(ctx, &mut st) {
                action = Some(Action::Checkout(checkout_action));
            }
        }

        self.toast_overlay(ctx);

        if let Some(action) = action {
            self.handle(ctx, action);
        }

        if self.bus.has_pending() {
            ctx.request_repaint();
        }
    }
}

// ─── Async helpers ───────────────────────────────────────

/// Everything the signed-in views need, fetched concurrently.
async fn load_initial(api: &Rc<RestBackend>, state: &Rc<RefCell<UiState>>) {
    let (hotels, wishlist, itinerary, conversations, users) = futures::join!(
        api.hotels(),
        api.wishlist(),
        api.itinerary(),
        api.conversations(),
        api.list_users(),
    );

    let mut st = state.borrow_mut();
    match hotels {
        Ok(hotels) => st.hotels = hotels,
        Err(e) => {
            log::warn!("hotel fetch failed: {}", e);
            st.toast("Could not load hotels", false);
        }
    }
    match wishlist {
        Ok(wishlist) => st.wishlist = wishlist,
        Err(e) => log::warn!("wishlist fetch failed: {}", e),
    }
    match itinerary {
        Ok(itinerary) => st.itinerary = itinerary,
        Err(e) => log::warn!("itinerary fetch failed: {}", e),
    }
    match conversations {
        Ok(conversations) => st.conversations = conversations,
        Err(e) => log::warn!("conversation fetch failed: {}", e),
    }
    match users {
        Ok(users) => st.users = users,
        Err(e) => log::warn!("user list fetch failed: {}", e),
    }
}

async fn refresh_wishlist(api: &Rc<RestBackend>, state: &Rc<RefCell<UiState>>) {
    match api.wishlist().await {
        Ok(wishlist) => state.borrow_mut().wishlist = wishlist,
        Err(e) => log::warn!("wishlist refresh failed: {}", e),
    }
}

/// Refetch the conversation list, carrying the client-local flags
/// (favourite star, attached topic) over onto the fresh records.
async fn refresh_conversations(api: &Rc<RestBackend>, state: &Rc<RefCell<UiState>>) {
    match api.conversations().await {
        Ok(mut conversations) => {
            let mut st = state.borrow_mut();
            for conversation in &mut conversations {
                conversation.is_favorite = st.is_favourite(&conversation.id);
                conversation.is_subscribed =
                    st.active_conversation.as_deref() == Some(conversation.id.as_str());
            }
            st.conversations = conversations;
        }
        Err(e) => log::warn!("conversation refresh failed: {}", e),
    }
}

async fn add_activity_and_refresh(
    api: &Rc<RestBackend>,
    activity: &NewActivity,
) -> trip_types::Result<Vec<trip_types::travel::Activity>> {
    api.add_activity(activity).await?;
    api.itinerary().await
}

/// Create the pending booking, then ask the backend for a hosted
/// checkout URL for it.
async fn start_payment(api: &Rc<RestBackend>, draft: &BookingDraft) -> trip_types::Result<String> {
    let pending = api.init_booking(draft).await?;
    let session = api.create_checkout_session(pending.id, draft.price()).await?;
    Ok(session.url)
}

/// The `session_id` query parameter the hosted checkout page appends
/// when it sends the user back.
fn payment_session_from_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    search
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix("session_id="))
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// Full-page navigation to the hosted checkout.
fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("redirect failed: {:?}", e);
        }
    }
}
