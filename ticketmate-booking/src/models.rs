use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ticketmate_shared::{Passenger, TransportKind};
use uuid::Uuid;

/// Booking status in the lifecycle. Cancelled and refunded are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Waiting,
    Cancelled,
    Refunded,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Waiting => write!(f, "waiting"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// The single source of truth for a reservation. Never deleted;
/// cancellation is a status change, so notifications and grievances can
/// keep referencing the booking id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub pnr: String,
    pub user_id: String,
    pub trip_id: Uuid,
    pub trip_kind: TransportKind,
    pub passengers: Vec<Passenger>,
    pub status: BookingStatus,
    /// 1-based rank within the trip's waitlist; present iff waiting.
    pub waiting_position: Option<u32>,
    /// Confirmation likelihood in [0, 100]; present iff waiting.
    pub prediction_percentage: Option<f64>,
    pub route: String,
    pub journey_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Update status and bump the modification timestamp.
    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Whether the booking can still be cancelled.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            BookingStatus::Confirmed | BookingStatus::Waiting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&BookingStatus::Waiting).unwrap();
        assert_eq!(json, "\"waiting\"");
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
    }
}
