use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One waitlisted booking on a trip.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub booking_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Per-trip waitlist, kept ordered by `(created_at, booking_id)`
/// ascending so the earliest request is always at position 1. Booking
/// id breaks the (not normally reachable) equal-timestamp tie.
#[derive(Debug, Default)]
pub struct Waitlist {
    entries: Vec<WaitlistEntry>,
}

impl Waitlist {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry at its ordered slot and return its 1-based
    /// position. Under a monotonic clock this is an append, making the
    /// position `len + 1`.
    pub fn enqueue(&mut self, booking_id: Uuid, created_at: DateTime<Utc>) -> u32 {
        let idx = self
            .entries
            .partition_point(|e| (e.created_at, e.booking_id) <= (created_at, booking_id));
        self.entries.insert(
            idx,
            WaitlistEntry {
                booking_id,
                created_at,
            },
        );
        (idx + 1) as u32
    }

    /// Pop the earliest-created entry, if any.
    pub fn dequeue(&mut self) -> Option<WaitlistEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// 1-based position of a booking, if waitlisted here.
    pub fn position_of(&self, booking_id: &Uuid) -> Option<u32> {
        self.entries
            .iter()
            .position(|e| e.booking_id == *booking_id)
            .map(|idx| (idx + 1) as u32)
    }

    /// Remove a booking and return the ids that sat behind it; only
    /// those need renumbering.
    pub fn remove(&mut self, booking_id: &Uuid) -> Option<Vec<Uuid>> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.booking_id == *booking_id)?;
        self.entries.remove(idx);
        Some(self.entries[idx..].iter().map(|e| e.booking_id).collect())
    }

    /// Entries in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &WaitlistEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_enqueue_assigns_dense_positions() {
        let mut waitlist = Waitlist::new();
        let t0 = Utc::now();

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert_eq!(waitlist.enqueue(a, t0), 1);
        assert_eq!(waitlist.enqueue(b, t0 + Duration::seconds(1)), 2);
        assert_eq!(waitlist.enqueue(c, t0 + Duration::seconds(2)), 3);

        assert_eq!(waitlist.position_of(&b), Some(2));
        assert_eq!(waitlist.len(), 3);
    }

    #[test]
    fn test_dequeue_pops_earliest() {
        let mut waitlist = Waitlist::new();
        let t0 = Utc::now();

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        waitlist.enqueue(b, t0 + Duration::seconds(5));
        waitlist.enqueue(a, t0);

        assert_eq!(waitlist.dequeue().map(|e| e.booking_id), Some(a));
        assert_eq!(waitlist.position_of(&b), Some(1));
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let mut waitlist = Waitlist::new();
        let t0 = Utc::now();

        let mut ids = [Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();

        waitlist.enqueue(ids[1], t0);
        waitlist.enqueue(ids[0], t0);

        assert_eq!(waitlist.position_of(&ids[0]), Some(1));
        assert_eq!(waitlist.position_of(&ids[1]), Some(2));
    }

    #[test]
    fn test_remove_returns_only_trailing_ids() {
        let mut waitlist = Waitlist::new();
        let t0 = Utc::now();

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        waitlist.enqueue(a, t0);
        waitlist.enqueue(b, t0 + Duration::seconds(1));
        waitlist.enqueue(c, t0 + Duration::seconds(2));

        let trailing = waitlist.remove(&b).unwrap();
        assert_eq!(trailing, vec![c]);
        assert_eq!(waitlist.position_of(&a), Some(1));
        assert_eq!(waitlist.position_of(&c), Some(2));
        assert!(waitlist.remove(&b).is_none());
    }
}
