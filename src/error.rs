//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Store errors**: the MongoDB connection was never established, or an
///   operation against it failed
/// - **Validation errors**: malformed, missing or out-of-range request data
/// - **Resource errors**: referenced customer / hanger / delivery absent
/// - **Business logic errors**: duplicate names, terminal deliveries,
///   incomplete deliveries
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A store operation failed after the connection was established.
    ///
    /// Wraps any driver error via `#[from]`. Details are logged but hidden
    /// from the client.
    #[error("Store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// A document could not be encoded to BSON before being sent to the store.
    #[error("Document encoding error: {0}")]
    Encode(#[from] bson::ser::Error),

    /// No store connection was established at startup.
    ///
    /// Every handler checks for this before touching a collection, so an
    /// unreachable database degrades the service to a fixed 500 response
    /// instead of crashing it.
    #[error("No database connection")]
    StoreUnavailable,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request. The String describes what was invalid.
    #[error("{0}")]
    Validation(String),

    /// Referenced entity (customer, hanger owner) does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0} not found")]
    NotFound(String),

    /// A unique key (delivery-tracker customer name) already exists.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// A delivery was requested for a customer that does not exist.
    ///
    /// The delivery tracker historically reports this as 400, not 404.
    #[error("Customer '{0}' not found")]
    UnknownCustomer(String),

    /// No delivery matches the presented security key.
    ///
    /// Returns HTTP 400 Bad Request; the key is the sole credential, so an
    /// unknown key and a missing delivery are indistinguishable by design.
    #[error("Invalid key or delivery not found")]
    InvalidKey,

    /// The delivery is already in its terminal state; no further advance.
    #[error("Delivery already delivered")]
    AlreadyDelivered,

    /// Verification was requested before the delivery reached `delivered`.
    #[error("Delivery not yet completed")]
    NotCompleted,
}

/// JSON body rejections (missing fields, wrong types, malformed JSON) are
/// reported as one uniform validation error instead of axum's default
/// plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::UnknownCustomer(_) => {
                (StatusCode::BAD_REQUEST, "unknown_customer", self.to_string())
            }
            AppError::InvalidKey => (StatusCode::BAD_REQUEST, "invalid_key", self.to_string()),
            AppError::AlreadyDelivered => (
                StatusCode::BAD_REQUEST,
                "already_delivered",
                self.to_string(),
            ),
            AppError::NotCompleted => {
                (StatusCode::BAD_REQUEST, "not_completed", self.to_string())
            }
            AppError::StoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
                self.to_string(),
            ),
            AppError::Store(ref err) => {
                // Log the driver error, hide details from the client
                tracing::error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Encode(ref err) => {
                tracing::error!(error = %err, "document encoding failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let response = AppError::Validation("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_entities_map_to_404() {
        let response = AppError::NotFound("User 42".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_names_map_to_409() {
        let response = AppError::Conflict("duplicate".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn delivery_key_failures_map_to_400() {
        // The tracker historically reports every key problem as a 400
        for err in [
            AppError::InvalidKey,
            AppError::AlreadyDelivered,
            AppError::NotCompleted,
            AppError::UnknownCustomer("Ann".into()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unavailable_store_maps_to_500() {
        let response = AppError::StoreUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
