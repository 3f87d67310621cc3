//! Registry customer registration handler.
//!
//! - POST /create_customer - Register a new customer

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    db::AppState,
    error::AppError,
    models::customer::{CreateCustomerRequest, CreateCustomerResponse},
    services::registry_service,
    validate::{self, AppJson},
};

/// Register a new customer.
///
/// # Endpoint
///
/// `POST /create_customer`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "Ann",
///   "last_name": "Example",
///   "email": "ann@x.com"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{"message": "Customer created", "user_id": 4711}`
/// - **Error (400)**: missing or empty fields
/// - **Error (500)**: store unavailable or operation failed
pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CreateCustomerResponse>), AppError> {
    let store = state.store()?;

    validate::non_empty(&request.first_name, "first_name")?;
    validate::non_empty(&request.last_name, "last_name")?;
    validate::non_empty(&request.email, "email")?;

    let user_id = registry_service::create_customer(
        store,
        request.first_name,
        request.last_name,
        request.email,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCustomerResponse {
            message: "Customer created".to_string(),
            user_id,
        }),
    ))
}
