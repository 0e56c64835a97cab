use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketmate_shared::TransportKind;
use uuid::Uuid;

/// A sellable trip. Created by the catalog seeding path; only the seat
/// counter held by the inventory is mutated after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub kind: TransportKind,
    pub name: String,
    pub number: String,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub capacity: i32,
}

impl Trip {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TransportKind,
        name: impl Into<String>,
        number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
        capacity: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            number: number.into(),
            origin: origin.into(),
            destination: destination.into(),
            departure,
            arrival,
            capacity,
        }
    }

    /// Human-facing route string, e.g. "Delhi → Mumbai"
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_string() {
        let now = Utc::now();
        let trip = Trip::new(
            TransportKind::Train,
            "Rajdhani Express",
            "12345",
            "Delhi",
            "Mumbai",
            now,
            now,
            10,
        );
        assert_eq!(trip.route(), "Delhi → Mumbai");
    }
}
