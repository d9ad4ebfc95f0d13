//! View panels. One module per top-level view, plus the checkout
//! wizard sheet that overlays Explore/Details.

pub mod checkout;
pub mod community;
pub mod details;
pub mod explore;
pub mod itinerary;
pub mod login;
pub mod payments;
pub mod profile;
pub mod trips;
pub mod wishlist;

pub use checkout::{checkout_sheet, CheckoutAction};
pub use community::{community_panel, CommunityAction};
pub use details::{details_panel, DetailsAction};
pub use explore::{explore_panel, ExploreAction};
pub use itinerary::{itinerary_panel, ItineraryAction};
pub use login::{login_panel, LoginAction};
pub use payments::{payments_panel, PaymentsAction};
pub use profile::{profile_panel, ProfileAction};
pub use trips::trips_panel;
pub use wishlist::{wishlist_panel, WishlistAction};
