pub mod grievance;
pub mod manager;
pub mod models;
pub mod notify;
pub mod pnr;
pub mod prediction;
pub mod waitlist;

pub use manager::{BookingManager, BookingStats};
pub use models::{Booking, BookingStatus};

use ticketmate_catalog::InventoryError;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidState { from: String, to: String },

    #[error("Trip inventory unavailable: {0}")]
    InventoryUnavailable(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<InventoryError> for BookingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => BookingError::InventoryUnavailable(id),
            InventoryError::InvariantViolation { .. } => {
                BookingError::InvariantViolation(err.to_string())
            }
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
