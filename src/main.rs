//! Smart Hanger API - Main Application Entry Point
//!
//! A REST API serving two sub-services over one MongoDB store:
//! the device/customer registry (registration, hanger pairing, status
//! updates, sensor-log ingestion) and the delivery tracker (deliveries
//! gated by a 16-character security key advancing pending → on route →
//! delivered).
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: MongoDB via the official driver
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables (missing `MONGO_URI`
//!    is fatal)
//! 2. Connect to the store and verify it with a ping; if that fails the
//!    server still starts, but every endpoint answers with the fixed
//!    store-unavailable error
//! 3. Build HTTP router and start serving

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod validate;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::db::{AppState, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; a missing MONGO_URI aborts startup here
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect to the store. An unreachable cluster degrades the service
    // instead of killing it, matching the deployed behavior.
    let store = match Store::connect(&config.mongo_uri, &config.database_name).await {
        Ok(store) => {
            tracing::info!(database = %config.database_name, "Connected to MongoDB");
            Some(store)
        }
        Err(err) => {
            tracing::error!(error = %err, "Database connection failed; serving degraded");
            None
        }
    };

    let server_port = config.server_port;
    let state = AppState::new(store, config);

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Registry endpoints
        .route(
            "/create_customer",
            post(handlers::customers::create_customer),
        )
        .route("/assign_hanger", post(handlers::hangers::assign_hanger))
        .route("/log_temp", post(handlers::sensor_logs::log_reading))
        // One path, two services: PUT updates a hanger, POST advances a delivery
        .route(
            "/update_status",
            put(handlers::hangers::update_status).post(handlers::deliveries::advance_delivery),
        )
        // Delivery tracker endpoints
        .route(
            "/customers",
            post(handlers::deliveries::create_customer).get(handlers::deliveries::list_customers),
        )
        .route(
            "/create_delivery",
            post(handlers::deliveries::create_delivery),
        )
        .route(
            "/verify_delivery",
            post(handlers::deliveries::verify_delivery),
        )
        .route("/deliveries", get(handlers::deliveries::list_deliveries))
        // App and hardware clients call from other origins
        .layer(CorsLayer::permissive())
        // Per-request tracing for observability
        .layer(TraceLayer::new_for_http())
        // Share the store handle with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}
