//! Parkwise Server - Smart Parking Reservation System
//!
//! REST API server for slot booking, sensor reconciliation and billing.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parkwise_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{clock::SystemClock, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("parkwise_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Parkwise Server v{}", env!("CARGO_PKG_VERSION"));

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new();
    let services = Services::new(
        repository,
        config.billing.clone(),
        config.payment.clone(),
        Arc::new(SystemClock),
    );

    // Provision the configured slot set
    let created = services
        .slots
        .provision(&config.slots)
        .await
        .expect("Failed to provision slots");
    tracing::info!("Slot provisioning complete ({} created)", created);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Slots
        .route("/slots", get(api::slots::list_slots))
        .route("/slots/available", get(api::slots::list_available_slots))
        // Sensor ingestion
        .route("/sensor-data", post(api::sensors::sensor_event))
        // Bookings
        .route("/bookings", post(api::bookings::create_booking))
        .route("/bookings", get(api::bookings::booking_history))
        .route("/bookings/active", get(api::bookings::active_bookings))
        .route("/bookings/search", get(api::bookings::search_bookings))
        .route("/bookings/:bill_number", get(api::bookings::get_booking))
        .route("/bookings/:bill_number/payment", get(api::bookings::get_payment))
        .route("/bookings/:bill_number/cancel", post(api::bookings::cancel_booking))
        .route("/bookings/:bill_number/extend", post(api::bookings::extend_booking))
        .route(
            "/bookings/:bill_number/confirm-payment",
            post(api::bookings::confirm_payment),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
