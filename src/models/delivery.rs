//! Delivery tracker documents, request/response types, and the delivery
//! status state machine.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Delivery status, a fixed linear sequence.
///
/// `pending → on route → delivered`. Every non-terminal state has exactly
/// one successor; `delivered` is terminal. The wire (and stored) encoding
/// of the middle state is `"on route"` with a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    #[serde(rename = "on route")]
    OnRoute,
    Delivered,
}

impl DeliveryStatus {
    /// The unique successor state, or `None` from the terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::OnRoute),
            Self::OnRoute => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Delivered
    }

    /// Stored / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnRoute => "on route",
            Self::Delivered => "delivered",
        }
    }
}

/// A delivery document, gated by its security key.
///
/// # Collection
///
/// Lives in `deliveries`. The `security_key` is the sole credential for
/// reading or advancing the status; whoever holds it is authorized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Stringified id of the delivery-tracker customer
    pub customer_id: String,

    /// Destination, copied from the customer at creation time
    pub address: String,

    /// 16-char alphanumeric bearer token (62-symbol alphabet, ~95 bits)
    pub security_key: String,

    pub status: DeliveryStatus,
}

/// A delivery-tracker customer, unique by name.
///
/// This is the tracker's own customer shape, distinct from the registry's
/// [`crate::models::customer::Customer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryCustomer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,
    pub email: String,
    pub address: String,
}

/// Request body for `POST /customers`.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryCustomerRequest {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Response body for `POST /customers` (201 Created).
#[derive(Debug, Serialize)]
pub struct CreateDeliveryCustomerResponse {
    pub message: String,
    pub customer_id: String,
}

/// Customer entry in the `GET /customers` listing.
#[derive(Debug, Serialize)]
pub struct DeliveryCustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
}

impl From<DeliveryCustomer> for DeliveryCustomerResponse {
    fn from(customer: DeliveryCustomer) -> Self {
        Self {
            id: customer.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: customer.name,
            email: customer.email,
            address: customer.address,
        }
    }
}

/// Request body for `POST /create_delivery`.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    /// Name of an existing delivery-tracker customer
    pub customer: String,
}

/// Response body for `POST /create_delivery` (200 OK).
///
/// The security key is returned exactly once here; losing it means losing
/// access to the delivery.
#[derive(Debug, Serialize)]
pub struct CreateDeliveryResponse {
    pub delivery_id: String,
    pub security_key: String,
}

/// Request body for the key-gated endpoints
/// (`POST /update_status`, `POST /verify_delivery`).
#[derive(Debug, Deserialize)]
pub struct SecurityKeyRequest {
    pub security_key: String,
}

/// Response body for `POST /update_status` (delivery variant, 200 OK).
#[derive(Debug, Serialize)]
pub struct AdvanceDeliveryResponse {
    pub message: String,
    pub status: DeliveryStatus,
}

/// Response body for `POST /verify_delivery` (200 OK).
#[derive(Debug, Serialize)]
pub struct VerifyDeliveryResponse {
    pub message: String,
    pub verified: bool,
}

/// Delivery entry in the `GET /deliveries` listing.
#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub id: String,
    pub customer_id: String,
    pub address: String,
    pub security_key: String,
    pub status: DeliveryStatus,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        Self {
            id: delivery.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            customer_id: delivery.customer_id,
            address: delivery.address,
            security_key: delivery.security_key,
            status: delivery.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_sequence_is_linear_and_total() {
        assert_eq!(DeliveryStatus::Pending.next(), Some(DeliveryStatus::OnRoute));
        assert_eq!(
            DeliveryStatus::OnRoute.next(),
            Some(DeliveryStatus::Delivered)
        );
        assert_eq!(DeliveryStatus::Delivered.next(), None);
    }

    #[test]
    fn only_delivered_is_terminal() {
        assert!(!DeliveryStatus::Pending.is_terminal());
        assert!(!DeliveryStatus::OnRoute.is_terminal());
        assert!(DeliveryStatus::Delivered.is_terminal());
    }

    #[test]
    fn advancing_from_pending_reaches_the_terminal_in_two_steps() {
        let mut status = DeliveryStatus::Pending;
        let mut steps = 0;
        while let Some(next) = status.next() {
            status = next;
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(status, DeliveryStatus::Delivered);
    }

    #[test]
    fn wire_encoding_uses_on_route_with_a_space() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::OnRoute).unwrap(),
            "\"on route\""
        );
        assert_eq!(
            serde_json::from_str::<DeliveryStatus>("\"on route\"").unwrap(),
            DeliveryStatus::OnRoute
        );
        assert_eq!(
            serde_json::from_str::<DeliveryStatus>("\"pending\"").unwrap(),
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn as_str_matches_the_serde_encoding() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::OnRoute,
            DeliveryStatus::Delivered,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
