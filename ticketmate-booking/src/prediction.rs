use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketmate_shared::TransportKind;

/// Tunable policy knobs for the confirmation-likelihood curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionWeights {
    /// Historical cancellation-rate proxy for trains.
    pub train_base: f64,
    /// Flights see more churn, so a higher base rate.
    pub flight_base: f64,
    /// Penalty per waitlist position.
    pub position_weight: f64,
    /// Bonus per day left until departure.
    pub days_weight: f64,
}

impl Default for PredictionWeights {
    fn default() -> Self {
        Self {
            train_base: 50.0,
            flight_base: 60.0,
            position_weight: 4.0,
            days_weight: 0.5,
        }
    }
}

/// Deterministic confirmation-likelihood scorer for waitlisted
/// bookings. Pure: same inputs always give the same percentage, so the
/// value shown to clients stays consistent with the current position.
#[derive(Debug, Clone, Default)]
pub struct PredictionScorer {
    weights: PredictionWeights,
}

impl PredictionScorer {
    pub fn new(weights: PredictionWeights) -> Self {
        Self { weights }
    }

    /// Likelihood in [0, 100] that a booking at `position` confirms
    /// before departure. Drops as the queue gets deeper, rises with
    /// time left for ahead-of-queue cancellations to happen.
    pub fn score(&self, position: u32, days_to_departure: i64, kind: TransportKind) -> f64 {
        let base = match kind {
            TransportKind::Train => self.weights.train_base,
            TransportKind::Flight => self.weights.flight_base,
        };
        let raw = base - self.weights.position_weight * f64::from(position)
            + self.weights.days_weight * days_to_departure.max(0) as f64;
        raw.clamp(0.0, 100.0)
    }
}

/// Whole days between now and departure, floored at zero for trips
/// already past their departure time.
pub fn days_to_departure(departure: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (departure - now).num_days().max(0)
}
