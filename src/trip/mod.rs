//! Trip drafts, itineraries, and submitted plans.

pub mod draft;
pub mod itinerary;
pub mod template;

pub use draft::{TripDraft, TripPlan, TripStatus, MAX_TRIP_DAYS};
pub use itinerary::{days_between, Activity, ActivityCategory, ActivityDraft, TripDay};
pub use template::TripTemplate;
