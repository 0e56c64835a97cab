use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use ticketmate_api::{app, AppState};
use ticketmate_booking::prediction::PredictionScorer;
use ticketmate_booking::BookingManager;
use ticketmate_catalog::TripInventory;
use tower::ServiceExt;

fn test_app() -> Router {
    let inventory = Arc::new(TripInventory::new());
    let manager = Arc::new(BookingManager::new(
        inventory.clone(),
        PredictionScorer::default(),
    ));
    app(AppState { manager, inventory })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_trip(app: &Router, capacity: i32) -> String {
    let departure = Utc::now() + Duration::days(7);
    let (status, trip) = send(
        app,
        Method::POST,
        "/v1/admin/trips",
        Some(json!({
            "kind": "train",
            "name": "Rajdhani Express",
            "number": "12345",
            "origin": "Delhi",
            "destination": "Mumbai",
            "departure": departure.to_rfc3339(),
            "arrival": (departure + Duration::hours(6)).to_rfc3339(),
            "capacity": capacity,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    trip["id"].as_str().unwrap().to_string()
}

fn booking_body(user_id: &str, trip_id: &str) -> Value {
    json!({
        "user_id": user_id,
        "trip_id": trip_id,
        "passengers": [{"name": "Asha Rao", "age": 34, "gender": "female"}],
    })
}

#[tokio::test]
async fn test_booking_waitlist_and_promotion_flow() {
    let app = test_app();
    let trip_id = create_trip(&app, 1).await;

    let (status, first) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(booking_body("user-1", &trip_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "confirmed");
    assert!(first["pnr"].as_str().unwrap().starts_with("PNR"));

    let (status, second) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(booking_body("user-2", &trip_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "waiting");
    assert_eq!(second["waiting_position"], 1);
    assert!(second["prediction_percentage"].as_f64().is_some());

    let (status, waiting) = send(
        &app,
        Method::GET,
        "/v1/waiting-list?user_id=user-2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(waiting["bookings"].as_array().unwrap().len(), 1);

    // Cancelling the confirmed booking promotes the waitlisted one
    let cancel_uri = format!("/v1/bookings/{}/cancel", first["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::PUT, &cancel_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "cancelled");

    let get_uri = format!(
        "/v1/bookings/{}?user_id=user-2",
        second["id"].as_str().unwrap()
    );
    let (status, promoted) = send(&app, Method::GET, &get_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["status"], "confirmed");
    assert_eq!(promoted["waiting_position"], Value::Null);

    // Another user's booking reads as missing
    let foreign_uri = format!(
        "/v1/bookings/{}?user_id=user-1",
        second["id"].as_str().unwrap()
    );
    let (status, _) = send(&app, Method::GET, &foreign_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Cancelled is terminal
    let (status, _) = send(&app, Method::PUT, &cancel_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, stats) = send(&app, Method::GET, "/v1/admin/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_bookings"], 2);
    assert_eq!(stats["confirmed"], 1);
    assert_eq!(stats["waiting"], 0);
    assert_eq!(stats["cancelled"], 1);

    let (status, notifications) = send(
        &app,
        Method::GET,
        "/v1/notifications?user_id=user-2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"update"));

    let notification_id = notifications[0]["id"].as_str().unwrap();

    // Only the owner can mark a notification read
    let foreign_read = format!("/v1/notifications/{}/read?user_id=user-1", notification_id);
    let (status, _) = send(&app, Method::PUT, &foreign_read, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let read_uri = format!("/v1/notifications/{}/read?user_id=user-2", notification_id);
    let (status, body) = send(&app, Method::PUT, &read_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "marked");
}

#[tokio::test]
async fn test_validation_and_missing_trip_errors() {
    let app = test_app();
    let trip_id = create_trip(&app, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(json!({
            "user_id": "user-1",
            "trip_id": trip_id,
            "passengers": [{"name": "", "age": 34, "gender": "female"}],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(booking_body(
            "user-1",
            "00000000-0000-0000-0000-000000000000",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_grievance_refund_flow() {
    let app = test_app();
    let trip_id = create_trip(&app, 2).await;

    let (_, booking) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(booking_body("user-1", &trip_id)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/v1/bookings/{}/cancel", booking_id);
    send(&app, Method::PUT, &cancel_uri, None).await;

    let (status, grievance) = send(
        &app,
        Method::POST,
        "/v1/grievances",
        Some(json!({
            "user_id": "user-1",
            "booking_id": booking_id,
            "category": "refund",
            "description": "cancelled ticket, expecting my money back",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grievance["status"], "pending");

    let resolve_uri = format!(
        "/v1/admin/grievances/{}/resolve",
        grievance["id"].as_str().unwrap()
    );
    let (status, resolved) = send(
        &app,
        Method::POST,
        &resolve_uri,
        Some(json!({ "approve": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "resolved");

    let get_uri = format!("/v1/bookings/{}?user_id=user-1", booking_id);
    let (_, refunded) = send(&app, Method::GET, &get_uri, None).await;
    assert_eq!(refunded["status"], "refunded");
}
