use crate::trip::Trip;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-trip seat counters plus the registered trip records.
///
/// Each counter is an independent atomic reached through a shared read
/// lock, so allocations on one trip are linearizable while different
/// trips never block each other. The write lock is taken only when a
/// new trip is registered.
pub struct TripInventory {
    records: RwLock<HashMap<Uuid, Record>>,
}

struct Record {
    trip: Trip,
    seats: AtomicI32,
}

impl TripInventory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Register a trip with a full seat counter.
    pub async fn register(&self, trip: Trip) {
        let mut records = self.records.write().await;
        let seats = AtomicI32::new(trip.capacity);
        records.insert(trip.id, Record { trip, seats });
    }

    /// Get a snapshot of a registered trip.
    pub async fn get(&self, trip_id: &Uuid) -> Option<Trip> {
        let records = self.records.read().await;
        records.get(trip_id).map(|r| r.trip.clone())
    }

    /// Current free-seat count for a trip.
    pub async fn seats_available(&self, trip_id: &Uuid) -> Option<i32> {
        let records = self.records.read().await;
        records.get(trip_id).map(|r| r.seats.load(Ordering::Acquire))
    }

    /// Atomically check-and-decrement the seat counter.
    ///
    /// Returns `Ok(false)` without mutation when no seat is free; a
    /// full waitlist outcome, not an error.
    pub async fn try_allocate(&self, trip_id: &Uuid) -> Result<bool, InventoryError> {
        let records = self.records.read().await;
        let record = records
            .get(trip_id)
            .ok_or_else(|| InventoryError::NotFound(trip_id.to_string()))?;

        let mut current = record.seats.load(Ordering::Acquire);
        loop {
            if current <= 0 {
                return Ok(false);
            }
            match record.seats.compare_exchange(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(true),
                Err(observed) => current = observed,
            }
        }
    }

    /// Return a seat to the counter, capped at capacity.
    pub async fn release(&self, trip_id: &Uuid) -> Result<(), InventoryError> {
        let records = self.records.read().await;
        let record = records
            .get(trip_id)
            .ok_or_else(|| InventoryError::NotFound(trip_id.to_string()))?;

        let mut current = record.seats.load(Ordering::Acquire);
        loop {
            if current >= record.trip.capacity {
                return Err(InventoryError::InvariantViolation {
                    trip_id: trip_id.to_string(),
                    capacity: record.trip.capacity,
                });
            }
            match record.seats.compare_exchange(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }

    /// All registered trips (admin view).
    pub async fn list(&self) -> Vec<Trip> {
        let records = self.records.read().await;
        records.values().map(|r| r.trip.clone()).collect()
    }
}

impl Default for TripInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Trip not found: {0}")]
    NotFound(String),

    #[error("Seat release on trip {trip_id} would exceed capacity {capacity}")]
    InvariantViolation { trip_id: String, capacity: i32 },
}
