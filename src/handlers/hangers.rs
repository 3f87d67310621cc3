//! Hanger pairing and status-update handlers.
//!
//! - POST /assign_hanger - Pair a hanger to a customer
//! - PUT /update_status - Update one paired hanger's status

use axum::{Json, extract::State};

use crate::{
    db::AppState,
    error::AppError,
    models::customer::{
        AssignHangerRequest, AssignHangerResponse, UpdateHangerStatusRequest,
        UpdateHangerStatusResponse,
    },
    services::registry_service::{self, PairOutcome},
    validate::{self, AppJson},
};

/// Pair a hanger to a customer.
///
/// # Endpoint
///
/// `POST /assign_hanger`
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": 4711,
///   "hanger_id": 1024
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: paired, or already paired (idempotent no-op)
/// - **Error (400)**: hanger id not an integer in 1-65535
/// - **Error (404)**: no customer with this `user_id`
///
/// Repeating the call for the same pair is safe: uniqueness is keyed on
/// `hanger_id` alone, so the second call reports `already_paired` instead
/// of growing the set.
pub async fn assign_hanger(
    State(state): State<AppState>,
    AppJson(request): AppJson<AssignHangerRequest>,
) -> Result<Json<AssignHangerResponse>, AppError> {
    let store = state.store()?;
    let hanger_id = validate::hanger_id(request.hanger_id)?;

    let outcome = registry_service::pair_hanger(store, request.user_id, hanger_id).await?;

    let response = match outcome {
        PairOutcome::Paired => AssignHangerResponse {
            message: format!("Hanger {hanger_id} paired to user {}", request.user_id),
            already_paired: false,
        },
        PairOutcome::AlreadyPaired => AssignHangerResponse {
            message: "Hanger was already paired".to_string(),
            already_paired: true,
        },
    };
    Ok(Json(response))
}

/// Update the status of one paired hanger.
///
/// # Endpoint
///
/// `PUT /update_status`
///
/// (The delivery tracker owns `POST /update_status` on the same path.)
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": 4711,
///   "hanger_id": 1024,
///   "status": "drying"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: status and `last_updated` set atomically on the
///   matched sub-record
/// - **Error (400)**: status outside the configured allow-list, bad hanger id
/// - **Error (404)**: no customer matching both `user_id` and `hanger_id`
pub async fn update_status(
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateHangerStatusRequest>,
) -> Result<Json<UpdateHangerStatusResponse>, AppError> {
    let store = state.store()?;
    let hanger_id = validate::hanger_id(request.hanger_id)?;
    let status = validate::hanger_status(&request.status, state.allowed_hanger_statuses())?;

    registry_service::set_hanger_status(store, request.user_id, hanger_id, &status).await?;

    Ok(Json(UpdateHangerStatusResponse {
        message: format!("Status updated to {status}"),
        status,
    }))
}
