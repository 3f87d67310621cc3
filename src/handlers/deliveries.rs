//! Delivery tracker handlers.
//!
//! - POST /customers - Create a delivery-tracker customer
//! - GET /customers - List delivery-tracker customers
//! - POST /create_delivery - Create a delivery for a customer
//! - POST /update_status - Advance a delivery (security-key gated)
//! - POST /verify_delivery - Verify a delivery is completed
//! - GET /deliveries - List deliveries

use axum::{Json, extract::State, http::StatusCode};
use bson::doc;
use futures::TryStreamExt;

use crate::{
    db::AppState,
    error::AppError,
    models::delivery::{
        AdvanceDeliveryResponse, CreateDeliveryCustomerRequest, CreateDeliveryCustomerResponse,
        CreateDeliveryRequest, CreateDeliveryResponse, DeliveryCustomerResponse, DeliveryResponse,
        SecurityKeyRequest, VerifyDeliveryResponse,
    },
    services::delivery_service,
    validate::{self, AppJson},
};

/// Create a delivery-tracker customer.
///
/// # Endpoint
///
/// `POST /customers`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ann",
///   "email": "ann@x.com",
///   "address": "1 Example Street"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{"message": ..., "customer_id": "<hex id>"}`
/// - **Error (400)**: missing or empty fields
/// - **Error (409)**: a customer with this name already exists
pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDeliveryCustomerRequest>,
) -> Result<(StatusCode, Json<CreateDeliveryCustomerResponse>), AppError> {
    let store = state.store()?;

    validate::non_empty(&request.name, "name")?;
    validate::non_empty(&request.email, "email")?;
    validate::non_empty(&request.address, "address")?;

    let customer_id =
        delivery_service::create_customer(store, request.name, request.email, request.address)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateDeliveryCustomerResponse {
            message: "Customer created".to_string(),
            customer_id,
        }),
    ))
}

/// List all delivery-tracker customers.
///
/// # Endpoint
///
/// `GET /customers`
///
/// Full-table read; store ids are stringified for transport.
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryCustomerResponse>>, AppError> {
    let store = state.store()?;

    let customers: Vec<_> = store
        .delivery_customers()
        .find(doc! {})
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(DeliveryCustomerResponse::from)
        .collect();

    Ok(Json(customers))
}

/// Create a delivery for an existing customer.
///
/// # Endpoint
///
/// `POST /create_delivery`
///
/// # Request Body
///
/// ```json
/// { "customer": "Ann" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"delivery_id": "<hex id>", "security_key": "<16 chars>"}`
/// - **Error (400)**: unknown customer name
///
/// The security key is the only way to reference this delivery later.
pub async fn create_delivery(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDeliveryRequest>,
) -> Result<Json<CreateDeliveryResponse>, AppError> {
    let store = state.store()?;
    validate::non_empty(&request.customer, "customer")?;

    let (delivery_id, security_key) =
        delivery_service::create_delivery(store, &request.customer).await?;

    Ok(Json(CreateDeliveryResponse {
        delivery_id,
        security_key,
    }))
}

/// Advance a delivery to its next status.
///
/// # Endpoint
///
/// `POST /update_status`
///
/// (The registry owns `PUT /update_status` on the same path.)
///
/// # Request Body
///
/// ```json
/// { "security_key": "aB3xY9kL2mNpQ7rS" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"message": ..., "status": "on route"}`
/// - **Error (400)**: unknown key, or the delivery is already delivered
pub async fn advance_delivery(
    State(state): State<AppState>,
    AppJson(request): AppJson<SecurityKeyRequest>,
) -> Result<Json<AdvanceDeliveryResponse>, AppError> {
    let store = state.store()?;

    let status = delivery_service::advance(store, &request.security_key).await?;

    Ok(Json(AdvanceDeliveryResponse {
        message: format!("Status updated: {}", status.as_str()),
        status,
    }))
}

/// Verify that a delivery has been completed.
///
/// # Endpoint
///
/// `POST /verify_delivery`
///
/// # Response
///
/// - **Success (200 OK)**: status is exactly `delivered`
/// - **Error (400)**: unknown key, or the delivery is not completed yet
pub async fn verify_delivery(
    State(state): State<AppState>,
    AppJson(request): AppJson<SecurityKeyRequest>,
) -> Result<Json<VerifyDeliveryResponse>, AppError> {
    let store = state.store()?;

    delivery_service::verify(store, &request.security_key).await?;

    Ok(Json(VerifyDeliveryResponse {
        message: "Delivery successfully completed".to_string(),
        verified: true,
    }))
}

/// List all deliveries.
///
/// # Endpoint
///
/// `GET /deliveries`
///
/// Full-table read; `_id` and `customer_id` are stringified for transport.
pub async fn list_deliveries(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryResponse>>, AppError> {
    let store = state.store()?;

    let deliveries: Vec<_> = store
        .deliveries()
        .find(doc! {})
        .await?
        .try_collect::<Vec<_>>()
        .await?
        .into_iter()
        .map(DeliveryResponse::from)
        .collect();

    Ok(Json(deliveries))
}
