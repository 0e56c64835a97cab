use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use ticketmate_api::{app, config::Config, AppState};
use ticketmate_booking::prediction::PredictionScorer;
use ticketmate_booking::BookingManager;
use ticketmate_catalog::{Trip, TripInventory};
use ticketmate_shared::TransportKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketmate_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting TicketMate API on port {}", config.server.port);

    let inventory = Arc::new(TripInventory::new());
    if config.seed_demo_trips {
        seed_demo_trips(&inventory).await;
    }

    let manager = Arc::new(BookingManager::new(
        inventory.clone(),
        PredictionScorer::new(config.prediction.clone()),
    ));

    let state = AppState { manager, inventory };
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Demo inventory matching the trips the original product shipped with.
async fn seed_demo_trips(inventory: &TripInventory) {
    let departure = Utc::now() + Duration::days(7);
    let train = Trip::new(
        TransportKind::Train,
        "Rajdhani Express",
        "12345",
        "Delhi",
        "Mumbai",
        departure,
        departure + Duration::hours(6),
        10,
    );
    tracing::info!(trip_id = %train.id, "seeded demo train");
    inventory.register(train).await;

    let departure = Utc::now() + Duration::days(3);
    let flight = Trip::new(
        TransportKind::Flight,
        "IndiGo",
        "IG101",
        "Delhi",
        "Mumbai",
        departure,
        departure + Duration::hours(2),
        6,
    );
    tracing::info!(trip_id = %flight.id, "seeded demo flight");
    inventory.register(flight).await;
}
