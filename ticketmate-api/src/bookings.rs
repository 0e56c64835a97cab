use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use ticketmate_shared::{Passenger, TransportKind};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use ticketmate_booking::Booking;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: String,
    pub trip_id: Uuid,
    /// Checked against the registered trip when present.
    pub trip_type: Option<TransportKind>,
    pub passengers: Vec<Passenger>,
    /// "waiting" forces the waitlist even when seats are free.
    pub booking_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", put(cancel_booking))
        .route("/v1/waiting-list", get(waiting_list))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    if let Some(claimed) = req.trip_type {
        let registered = state
            .inventory
            .get(&req.trip_id)
            .await
            .map(|t| t.kind);
        if registered.is_some_and(|kind| kind != claimed) {
            return Err(AppError::BadRequest(format!(
                "trip_type {} does not match the requested trip",
                claimed
            )));
        }
    }
    let force_waiting = req.booking_type.as_deref() == Some("waiting");
    let booking = state
        .manager
        .create_booking(&req.user_id, req.trip_id, req.passengers, force_waiting)
        .await?;
    Ok(Json(booking))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<Booking>> {
    Json(state.manager.list_bookings(&query.user_id).await)
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(
        state.manager.get_booking_for_user(&query.user_id, &id).await?,
    ))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.manager.cancel_booking(&id).await?;
    Ok(Json(json!({ "detail": "cancelled" })))
}

async fn waiting_list(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Value> {
    let bookings = state.manager.waiting_list(&query.user_id).await;
    Json(json!({ "bookings": bookings }))
}
