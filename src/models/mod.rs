pub mod itinerary;
pub mod place;
pub mod session;
pub mod weather;
