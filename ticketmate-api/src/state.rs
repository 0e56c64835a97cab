use std::sync::Arc;
use ticketmate_booking::BookingManager;
use ticketmate_catalog::TripInventory;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<BookingManager>,
    pub inventory: Arc<TripInventory>,
}
