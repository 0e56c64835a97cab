use serde::{Deserialize, Serialize};

/// Transport kinds sold through the engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Train,
    Flight,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Train => write!(f, "train"),
            TransportKind::Flight => write!(f, "flight"),
        }
    }
}

/// A traveller on a booking. Passengers share a single inventory unit;
/// the per-booking seat semantics live in the lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl Passenger {
    pub fn new(name: impl Into<String>, age: i32, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            gender: gender.into(),
        }
    }
}
