//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::AppState;

/// Health check response.
///
/// Returns service status and store connectivity.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Store connection status
    pub store: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Checks
///
/// - Store connectivity (ping command)
///
/// Always answers 200: an unreachable store is reported in the body as a
/// degraded service, since the process itself is still serving.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "store": "connected",
///   "timestamp": "2026-08-25T10:00:00Z"
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = match state.store() {
        Ok(store) => match store.ping().await {
            Ok(()) => "connected",
            Err(err) => {
                tracing::warn!(error = %err, "health ping failed");
                "unreachable"
            }
        },
        // Startup connection never succeeded
        Err(_) => "unavailable",
    };

    let status = if store == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: store.to_string(),
        timestamp: Utc::now(),
    })
}
