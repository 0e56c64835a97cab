use crate::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GrievanceStatus {
    Pending,
    Resolved,
    Rejected,
}

/// A customer complaint referencing a booking by id. Independent of the
/// booking lifecycle except for that reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grievance {
    pub id: Uuid,
    pub user_id: String,
    pub booking_id: Uuid,
    pub category: String,
    pub description: String,
    pub status: GrievanceStatus,
    pub created_at: DateTime<Utc>,
}

/// In-memory grievance store. Booking existence is checked by the
/// lifecycle manager before a grievance lands here.
pub struct GrievanceLedger {
    items: RwLock<HashMap<Uuid, Grievance>>,
}

impl GrievanceLedger {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub async fn submit(
        &self,
        user_id: &str,
        booking_id: Uuid,
        category: String,
        description: String,
    ) -> Grievance {
        let grievance = Grievance {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            booking_id,
            category,
            description,
            status: GrievanceStatus::Pending,
            created_at: Utc::now(),
        };
        let mut items = self.items.write().await;
        items.insert(grievance.id, grievance.clone());
        grievance
    }

    pub async fn get(&self, id: &Uuid) -> Result<Grievance, BookingError> {
        let items = self.items.read().await;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("grievance {}", id)))
    }

    pub async fn list_for_user(&self, user_id: &str) -> Vec<Grievance> {
        let items = self.items.read().await;
        let mut out: Vec<Grievance> = items
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }

    pub async fn list_all(&self) -> Vec<Grievance> {
        let items = self.items.read().await;
        let mut out: Vec<Grievance> = items.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }

    /// Close a pending grievance as resolved or rejected.
    pub async fn close(&self, id: &Uuid, status: GrievanceStatus) -> Result<Grievance, BookingError> {
        let mut items = self.items.write().await;
        let grievance = items
            .get_mut(id)
            .ok_or_else(|| BookingError::NotFound(format!("grievance {}", id)))?;
        if grievance.status != GrievanceStatus::Pending {
            return Err(BookingError::InvalidState {
                from: format!("{:?}", grievance.status),
                to: format!("{:?}", status),
            });
        }
        grievance.status = status;
        Ok(grievance.clone())
    }
}

impl Default for GrievanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
