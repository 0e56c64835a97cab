use crate::grievance::{Grievance, GrievanceLedger, GrievanceStatus};
use crate::models::{Booking, BookingStatus};
use crate::notify::{Notification, NotificationEmitter, NotificationKind};
use crate::pnr::PnrGenerator;
use crate::prediction::{days_to_departure, PredictionScorer};
use crate::waitlist::Waitlist;
use crate::{BookingError, BookingResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use ticketmate_catalog::{Trip, TripInventory};
use ticketmate_shared::Passenger;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// Aggregate booking counts, recomputed on demand.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    pub confirmed: usize,
    pub waiting: usize,
    pub cancelled: usize,
}

/// Orchestrates the booking state machine. The only component that
/// mutates trip inventory and waitlists.
///
/// Each trip has one `Mutex` guarding its waitlist and its inventory
/// mutations; tokio mutexes queue waiters FIFO, so same-trip requests
/// serialize without starvation while different trips run in parallel.
/// Lock order is always trip mutex first, then the bookings map.
pub struct BookingManager {
    inventory: Arc<TripInventory>,
    scorer: PredictionScorer,
    pnr: PnrGenerator,
    notifier: NotificationEmitter,
    grievances: GrievanceLedger,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    trip_slots: RwLock<HashMap<Uuid, Arc<Mutex<Waitlist>>>>,
}

impl BookingManager {
    pub fn new(inventory: Arc<TripInventory>, scorer: PredictionScorer) -> Self {
        Self {
            inventory,
            scorer,
            pnr: PnrGenerator::new(),
            notifier: NotificationEmitter::new(),
            grievances: GrievanceLedger::new(),
            bookings: RwLock::new(HashMap::new()),
            trip_slots: RwLock::new(HashMap::new()),
        }
    }

    /// Create a booking. Confirms immediately when a seat is free and
    /// the caller did not force the waitlist; otherwise the booking
    /// joins the trip's waitlist with a position and a prediction.
    pub async fn create_booking(
        &self,
        user_id: &str,
        trip_id: Uuid,
        passengers: Vec<Passenger>,
        force_waiting: bool,
    ) -> BookingResult<Booking> {
        validate_passengers(&passengers)?;

        let trip = self
            .inventory
            .get(&trip_id)
            .await
            .ok_or_else(|| BookingError::InventoryUnavailable(trip_id.to_string()))?;
        let slot = self.trip_slot(trip_id).await?;
        let mut waitlist = slot.lock().await;

        let booking_id = Uuid::new_v4();
        let created_at = Utc::now();

        // One seat per booking, independent of passenger count; a
        // product decision, not a bug (see DESIGN.md).
        let seat_taken = !force_waiting && self.inventory.try_allocate(&trip_id).await?;

        let (status, waiting_position, prediction_percentage) = if seat_taken {
            (BookingStatus::Confirmed, None, None)
        } else {
            let position = waitlist.enqueue(booking_id, created_at);
            let days = days_to_departure(trip.departure, created_at);
            let prediction = self.scorer.score(position, days, trip.kind);
            (BookingStatus::Waiting, Some(position), Some(prediction))
        };

        let pnr = self.pnr.generate().await;
        let booking = Booking {
            id: booking_id,
            pnr: pnr.clone(),
            user_id: user_id.to_string(),
            trip_id,
            trip_kind: trip.kind,
            passengers,
            status,
            waiting_position,
            prediction_percentage,
            route: trip.route(),
            journey_date: trip.departure.date_naive(),
            created_at,
            updated_at: created_at,
        };

        let mut bookings = self.bookings.write().await;
        bookings.insert(booking_id, booking.clone());
        drop(bookings);

        info!(%booking_id, %pnr, %status, "booking created");
        self.notifier
            .emit(
                user_id,
                NotificationKind::Booking,
                format!("Booking {} created ({})", pnr, status),
            )
            .await;

        Ok(booking)
    }

    /// Cancel a confirmed or waiting booking. Cancelling a confirmed
    /// booking frees its seat and promotes the earliest waitlisted
    /// booking inside the same critical section; cancelling a waiting
    /// booking renumbers everyone behind it.
    pub async fn cancel_booking(&self, booking_id: &Uuid) -> BookingResult<Booking> {
        let trip_id = {
            let bookings = self.bookings.read().await;
            bookings
                .get(booking_id)
                .map(|b| b.trip_id)
                .ok_or_else(|| BookingError::NotFound(format!("booking {}", booking_id)))?
        };
        let trip = self
            .inventory
            .get(&trip_id)
            .await
            .ok_or_else(|| BookingError::InventoryUnavailable(trip_id.to_string()))?;
        let slot = self.trip_slot(trip_id).await?;
        let mut waitlist = slot.lock().await;
        let mut bookings = self.bookings.write().await;

        // Status may have changed while we waited on the trip lock
        let booking = bookings
            .get_mut(booking_id)
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", booking_id)))?;

        match booking.status {
            BookingStatus::Confirmed => {
                self.inventory.release(&trip_id).await?;
                booking.update_status(BookingStatus::Cancelled);
                let (user_id, pnr) = (booking.user_id.clone(), booking.pnr.clone());
                info!(%booking_id, %pnr, "confirmed booking cancelled");
                self.notifier
                    .emit(
                        &user_id,
                        NotificationKind::Cancellation,
                        format!("Booking {} cancelled", pnr),
                    )
                    .await;
                self.promote(&trip, &mut waitlist, &mut bookings).await?;
            }
            BookingStatus::Waiting => {
                let trailing = waitlist.remove(booking_id).unwrap_or_default();
                booking.update_status(BookingStatus::Cancelled);
                booking.waiting_position = None;
                booking.prediction_percentage = None;
                let (user_id, pnr) = (booking.user_id.clone(), booking.pnr.clone());
                self.shift_forward(&trip, &mut bookings, &trailing);
                info!(%booking_id, %pnr, "waiting booking cancelled");
                self.notifier
                    .emit(
                        &user_id,
                        NotificationKind::Cancellation,
                        format!("Booking {} cancelled", pnr),
                    )
                    .await;
            }
            status => {
                return Err(BookingError::InvalidState {
                    from: status.to_string(),
                    to: BookingStatus::Cancelled.to_string(),
                });
            }
        }

        let cancelled = bookings
            .get(booking_id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", booking_id)))?;
        Ok(cancelled)
    }

    /// Move the earliest waitlisted booking into the seat just freed.
    /// Runs inside the cancelling call's critical section so concurrent
    /// creates on the trip observe either pre-cancellation or fully
    /// post-promotion state.
    async fn promote(
        &self,
        trip: &Trip,
        waitlist: &mut Waitlist,
        bookings: &mut HashMap<Uuid, Booking>,
    ) -> BookingResult<()> {
        if waitlist.is_empty() {
            return Ok(());
        }

        // Claim the seat before popping the queue, so a failed claim
        // leaves the waitlist and every booking untouched. It cannot
        // fail: allocation only ever happens under this trip's lock,
        // which we hold.
        if !self.inventory.try_allocate(&trip.id).await? {
            return Err(BookingError::InvariantViolation(format!(
                "freed seat missing during promotion on trip {}",
                trip.id
            )));
        }
        let Some(entry) = waitlist.dequeue() else {
            // Unreachable, the queue was non-empty under this lock
            self.inventory.release(&trip.id).await?;
            return Ok(());
        };

        let promoted = match bookings.get_mut(&entry.booking_id) {
            Some(booking) => booking,
            None => {
                self.inventory.release(&trip.id).await?;
                return Err(BookingError::InvariantViolation(format!(
                    "waitlisted booking {} has no record",
                    entry.booking_id
                )));
            }
        };
        promoted.update_status(BookingStatus::Confirmed);
        promoted.waiting_position = None;
        promoted.prediction_percentage = None;
        let (user_id, pnr) = (promoted.user_id.clone(), promoted.pnr.clone());

        let remaining: Vec<Uuid> = waitlist.iter().map(|e| e.booking_id).collect();
        self.shift_forward(trip, bookings, &remaining);

        info!(booking_id = %entry.booking_id, %pnr, "booking promoted from waitlist");
        self.notifier
            .emit(
                &user_id,
                NotificationKind::Update,
                format!("Booking {} confirmed from waitlist", pnr),
            )
            .await;
        Ok(())
    }

    /// Pull the given waiting bookings one position forward and rescore
    /// them. Touches only the ids handed in.
    fn shift_forward(&self, trip: &Trip, bookings: &mut HashMap<Uuid, Booking>, ids: &[Uuid]) {
        let now = Utc::now();
        let days = days_to_departure(trip.departure, now);
        for id in ids {
            if let Some(booking) = bookings.get_mut(id) {
                if let Some(position) = booking.waiting_position {
                    let new_position = position.saturating_sub(1).max(1);
                    booking.waiting_position = Some(new_position);
                    booking.prediction_percentage =
                        Some(self.scorer.score(new_position, days, trip.kind));
                    booking.updated_at = now;
                }
            }
        }
    }

    /// Refund a cancelled booking. Triggered by grievance resolution;
    /// inventory was already released at cancellation time.
    pub async fn refund_booking(&self, booking_id: &Uuid) -> BookingResult<Booking> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(booking_id)
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", booking_id)))?;

        if booking.status != BookingStatus::Cancelled {
            return Err(BookingError::InvalidState {
                from: booking.status.to_string(),
                to: BookingStatus::Refunded.to_string(),
            });
        }

        booking.update_status(BookingStatus::Refunded);
        let (user_id, pnr) = (booking.user_id.clone(), booking.pnr.clone());
        let refunded = booking.clone();
        drop(bookings);

        info!(%booking_id, %pnr, "booking refunded");
        self.notifier
            .emit(
                &user_id,
                NotificationKind::Refund,
                format!("Booking {} refunded", pnr),
            )
            .await;
        Ok(refunded)
    }

    pub async fn get_booking(&self, booking_id: &Uuid) -> BookingResult<Booking> {
        let bookings = self.bookings.read().await;
        bookings
            .get(booking_id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", booking_id)))
    }

    /// A user's view of one booking; ids owned by someone else read as
    /// missing.
    pub async fn get_booking_for_user(
        &self,
        user_id: &str,
        booking_id: &Uuid,
    ) -> BookingResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.user_id != user_id {
            return Err(BookingError::NotFound(format!("booking {}", booking_id)));
        }
        Ok(booking)
    }

    pub async fn list_bookings(&self, user_id: &str) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        let mut out: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }

    /// Waiting bookings for a user, each carrying its current position
    /// and prediction, ordered by position.
    pub async fn waiting_list(&self, user_id: &str) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        let mut out: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id && b.status == BookingStatus::Waiting)
            .cloned()
            .collect();
        out.sort_by_key(|b| b.waiting_position);
        out
    }

    pub async fn all_bookings(&self) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        let mut out: Vec<Booking> = bookings.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }

    pub async fn stats(&self) -> BookingStats {
        let bookings = self.bookings.read().await;
        BookingStats {
            total_bookings: bookings.len(),
            confirmed: bookings
                .values()
                .filter(|b| b.status == BookingStatus::Confirmed)
                .count(),
            waiting: bookings
                .values()
                .filter(|b| b.status == BookingStatus::Waiting)
                .count(),
            cancelled: bookings
                .values()
                .filter(|b| b.status == BookingStatus::Cancelled)
                .count(),
        }
    }

    pub async fn list_notifications(&self, user_id: &str) -> Vec<Notification> {
        self.notifier.list_for_user(user_id).await
    }

    pub async fn mark_notification_read(&self, user_id: &str, id: &Uuid) -> BookingResult<()> {
        self.notifier.mark_read(user_id, id).await
    }

    /// File a grievance against an existing booking.
    pub async fn submit_grievance(
        &self,
        user_id: &str,
        booking_id: Uuid,
        category: String,
        description: String,
    ) -> BookingResult<Grievance> {
        {
            let bookings = self.bookings.read().await;
            if !bookings.contains_key(&booking_id) {
                return Err(BookingError::NotFound(format!("booking {}", booking_id)));
            }
        }
        Ok(self
            .grievances
            .submit(user_id, booking_id, category, description)
            .await)
    }

    pub async fn list_grievances(&self, user_id: &str) -> Vec<Grievance> {
        self.grievances.list_for_user(user_id).await
    }

    pub async fn all_grievances(&self) -> Vec<Grievance> {
        self.grievances.list_all().await
    }

    /// Close a grievance. Approving a refund-category grievance on a
    /// cancelled booking triggers the refund transition first; if the
    /// booking is in the wrong state the grievance stays pending.
    pub async fn resolve_grievance(&self, id: &Uuid, approve: bool) -> BookingResult<Grievance> {
        if !approve {
            return self.grievances.close(id, GrievanceStatus::Rejected).await;
        }
        let grievance = self.grievances.get(id).await?;
        if grievance.category.eq_ignore_ascii_case("refund") {
            self.refund_booking(&grievance.booking_id).await?;
        }
        self.grievances.close(id, GrievanceStatus::Resolved).await
    }

    /// Lazily created per-trip lock + waitlist. The waitlist for a
    /// registered trip always reaches callers through this mutex.
    async fn trip_slot(&self, trip_id: Uuid) -> BookingResult<Arc<Mutex<Waitlist>>> {
        {
            let slots = self.trip_slots.read().await;
            if let Some(slot) = slots.get(&trip_id) {
                return Ok(slot.clone());
            }
        }
        let mut slots = self.trip_slots.write().await;
        Ok(slots
            .entry(trip_id)
            .or_insert_with(|| Arc::new(Mutex::new(Waitlist::new())))
            .clone())
    }
}

pub(crate) fn validate_passengers(passengers: &[Passenger]) -> BookingResult<()> {
    if passengers.is_empty() {
        return Err(BookingError::Validation(
            "at least one passenger is required".to_string(),
        ));
    }
    for passenger in passengers {
        if passenger.name.trim().is_empty() {
            return Err(BookingError::Validation(
                "passenger name must not be empty".to_string(),
            ));
        }
        if passenger.age < 1 {
            return Err(BookingError::Validation(format!(
                "passenger age must be positive, got {}",
                passenger.age
            )));
        }
    }
    Ok(())
}
