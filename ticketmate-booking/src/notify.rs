use crate::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Booking,
    Update,
    Cancellation,
    Refund,
}

/// A user-visible event produced by a lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only notification sink. Emission is best-effort and runs
/// after the triggering state change has committed: a delivery problem
/// is a log line, never an error back to the lifecycle manager.
pub struct NotificationEmitter {
    entries: RwLock<Vec<Notification>>,
}

impl NotificationEmitter {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn emit(&self, user_id: &str, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        };
        tracing::debug!(user_id, ?kind, "notification emitted");
        self.entries.write().await.push(notification);
    }

    /// Notifications for one user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Vec<Notification> {
        let entries = self.entries.read().await;
        let mut out: Vec<Notification> = entries
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Flip the read flag; the only mutation notifications ever see.
    /// Scoped to the owning user, so foreign ids read as missing.
    pub async fn mark_read(&self, user_id: &str, id: &Uuid) -> Result<(), BookingError> {
        let mut entries = self.entries.write().await;
        let notification = entries
            .iter_mut()
            .find(|n| n.id == *id && n.user_id == user_id)
            .ok_or_else(|| BookingError::NotFound(format!("notification {}", id)))?;
        notification.read = true;
        Ok(())
    }
}

impl Default for NotificationEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_list() {
        let emitter = NotificationEmitter::new();
        emitter
            .emit("user-1", NotificationKind::Booking, "Booking PNR123456 created (confirmed)")
            .await;
        emitter
            .emit("user-2", NotificationKind::Cancellation, "Booking PNR654321 cancelled")
            .await;

        let mine = emitter.list_for_user("user-1").await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].kind, NotificationKind::Booking);
        assert!(!mine[0].read);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let emitter = NotificationEmitter::new();
        emitter
            .emit("user-1", NotificationKind::Update, "Booking PNR111111 confirmed from waitlist")
            .await;
        let id = emitter.list_for_user("user-1").await[0].id;

        emitter.mark_read("user-1", &id).await.unwrap();
        assert!(emitter.list_for_user("user-1").await[0].read);

        let missing = emitter.mark_read("user-1", &Uuid::new_v4()).await;
        assert!(matches!(missing, Err(BookingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_read_is_scoped_to_the_owner() {
        let emitter = NotificationEmitter::new();
        emitter
            .emit("user-1", NotificationKind::Booking, "Booking PNR222222 created (waiting)")
            .await;
        let id = emitter.list_for_user("user-1").await[0].id;

        let foreign = emitter.mark_read("user-2", &id).await;
        assert!(matches!(foreign, Err(BookingError::NotFound(_))));
        assert!(!emitter.list_for_user("user-1").await[0].read);
    }
}
