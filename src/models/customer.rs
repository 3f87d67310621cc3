//! Registry customer documents and API request/response types.
//!
//! This module defines:
//! - `Customer`: store document owning the embedded hanger set
//! - `Hanger`: embedded sub-document for one paired device
//! - request/response types for registration, pairing and status updates

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registry customer document.
///
/// # Collection
///
/// Lives in `customers`. Each customer:
/// - Carries a random, unique 16-bit `user_id` assigned at registration
/// - Embeds its paired devices in `hangers` (a set keyed by `hanger_id`)
///
/// # Identifier Note
///
/// `user_id` is the public identifier used by the app and hardware;
/// the store-native `_id` never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Store-native identifier (absent until inserted)
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Public 16-bit customer identifier (1-65535), unique per customer
    pub user_id: u16,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Timestamp assigned server-side at registration
    pub registration_date: bson::DateTime,

    /// Paired devices, unique by `hanger_id`
    ///
    /// Mutated only through filtered atomic updates; the service never
    /// rewrites the whole array.
    pub hangers: Vec<Hanger>,
}

/// One paired device, embedded in its owning [`Customer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hanger {
    /// 16-bit device identifier (1-65535)
    pub hanger_id: u16,

    /// Current device status; always within the configured allow-list.
    /// Stored as a string because the list is configuration, not code.
    pub status: String,

    pub paired_at: bson::DateTime,

    /// Set on the first status update, absent before that
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<bson::DateTime>,
}

impl Hanger {
    /// A freshly paired hanger: status `off`, paired now, never updated.
    pub fn paired_now(hanger_id: u16) -> Self {
        Self {
            hanger_id,
            status: "off".to_string(),
            paired_at: bson::DateTime::now(),
            last_updated: None,
        }
    }
}

/// Request body for `POST /create_customer`.
///
/// # JSON Example
///
/// ```json
/// {
///   "first_name": "Ann",
///   "last_name": "Example",
///   "email": "ann@x.com"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Response body for `POST /create_customer` (201 Created).
#[derive(Debug, Serialize)]
pub struct CreateCustomerResponse {
    pub message: String,

    /// The freshly assigned public identifier
    pub user_id: u16,
}

/// Request body for `POST /assign_hanger`.
///
/// Both ids arrive as plain JSON numbers; the hanger id is range-checked
/// by the handler before anything touches the store.
#[derive(Debug, Deserialize)]
pub struct AssignHangerRequest {
    pub user_id: i64,
    pub hanger_id: i64,
}

/// Response body for `POST /assign_hanger` (200 OK).
///
/// Pairing an already-paired hanger is an idempotent no-op; the flag lets
/// clients distinguish the two without parsing the message.
#[derive(Debug, Serialize)]
pub struct AssignHangerResponse {
    pub message: String,
    pub already_paired: bool,
}

/// Request body for `PUT /update_status` (hanger variant).
#[derive(Debug, Deserialize)]
pub struct UpdateHangerStatusRequest {
    pub user_id: i64,
    pub hanger_id: i64,
    pub status: String,
}

/// Response body for `PUT /update_status` (200 OK).
#[derive(Debug, Serialize)]
pub struct UpdateHangerStatusResponse {
    pub message: String,

    /// The normalized (lowercase) status that was persisted
    pub status: String,
}
