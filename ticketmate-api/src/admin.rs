use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ticketmate_shared::TransportKind;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use ticketmate_booking::grievance::Grievance;
use ticketmate_booking::{Booking, BookingStats};
use ticketmate_catalog::Trip;

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub kind: TransportKind,
    pub name: String,
    pub number: String,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResolveGrievanceRequest {
    pub approve: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/stats", get(stats))
        .route("/v1/admin/bookings", get(all_bookings))
        .route("/v1/admin/grievances", get(all_grievances))
        .route("/v1/admin/grievances/{id}/resolve", post(resolve_grievance))
        .route("/v1/admin/trips", post(create_trip).get(list_trips))
}

async fn stats(State(state): State<AppState>) -> Json<BookingStats> {
    Json(state.manager.stats().await)
}

async fn all_bookings(State(state): State<AppState>) -> Json<Vec<Booking>> {
    Json(state.manager.all_bookings().await)
}

async fn all_grievances(State(state): State<AppState>) -> Json<Vec<Grievance>> {
    Json(state.manager.all_grievances().await)
}

async fn resolve_grievance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveGrievanceRequest>,
) -> Result<Json<Grievance>, AppError> {
    let grievance = state.manager.resolve_grievance(&id, req.approve).await?;
    Ok(Json(grievance))
}

/// Registration path standing in for the out-of-scope catalog process.
async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<Json<Trip>, AppError> {
    if req.capacity < 0 {
        return Err(AppError::BadRequest(
            "trip capacity must not be negative".to_string(),
        ));
    }
    let trip = Trip::new(
        req.kind,
        req.name,
        req.number,
        req.origin,
        req.destination,
        req.departure,
        req.arrival,
        req.capacity,
    );
    state.inventory.register(trip.clone()).await;
    Ok(Json(trip))
}

async fn list_trips(State(state): State<AppState>) -> Json<Vec<Trip>> {
    Json(state.inventory.list().await)
}
