use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::bookings::UserQuery;
use crate::error::AppError;
use crate::state::AppState;
use ticketmate_booking::grievance::Grievance;

#[derive(Debug, Deserialize)]
pub struct SubmitGrievanceRequest {
    pub user_id: String,
    pub booking_id: Uuid,
    pub category: String,
    pub description: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/grievances", post(submit_grievance).get(list_grievances))
}

async fn submit_grievance(
    State(state): State<AppState>,
    Json(req): Json<SubmitGrievanceRequest>,
) -> Result<Json<Grievance>, AppError> {
    let grievance = state
        .manager
        .submit_grievance(&req.user_id, req.booking_id, req.category, req.description)
        .await?;
    Ok(Json(grievance))
}

async fn list_grievances(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<Grievance>> {
    Json(state.manager.list_grievances(&query.user_id).await)
}
