//! Sensor-log ingestion handler.
//!
//! - POST /log_temp - Ingest one hardware reading

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    db::AppState,
    error::AppError,
    models::sensor_log::{LogReadingRequest, LogReadingResponse},
    services::registry_service,
    validate::{self, AppJson},
};

/// Ingest one temperature/humidity reading from the hardware.
///
/// # Endpoint
///
/// `POST /log_temp`
///
/// # Request Body
///
/// ```json
/// {
///   "hanger_id": 1024,
///   "temp": 45.5,
///   "hum": 22.0
/// }
/// ```
///
/// The hardware sends no user id and no clock: the owner is resolved by
/// reverse lookup and the timestamp is assigned at insert time.
///
/// # Response
///
/// - **Success (201 Created)**: `{"message": ..., "id": "<log id>"}`
/// - **Error (400)**: bad hanger id, or readings outside plausible bounds
/// - **Error (404)**: the hanger is not paired to any customer; the reading
///   is rejected, never buffered
pub async fn log_reading(
    State(state): State<AppState>,
    AppJson(request): AppJson<LogReadingRequest>,
) -> Result<(StatusCode, Json<LogReadingResponse>), AppError> {
    let store = state.store()?;
    let hanger_id = validate::hanger_id(request.hanger_id)?;
    validate::sensor_reading(request.temp, request.hum)?;

    let id = registry_service::record_reading(store, hanger_id, request.temp, request.hum).await?;

    Ok((
        StatusCode::CREATED,
        Json(LogReadingResponse {
            message: "Log entry created".to_string(),
            id,
        }),
    ))
}
