use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::bookings::UserQuery;
use crate::error::AppError;
use crate::state::AppState;
use ticketmate_booking::notify::Notification;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/{id}/read", put(mark_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<Notification>> {
    Json(state.manager.list_notifications(&query.user_id).await)
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    state
        .manager
        .mark_notification_read(&query.user_id, &id)
        .await?;
    Ok(Json(json!({ "detail": "marked" })))
}
