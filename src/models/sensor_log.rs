//! Sensor log documents and the ingestion request/response types.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One hardware reading, resolved to its owning customer at ingestion time.
///
/// # Collection
///
/// Lives in `sensor_logs`. Documents are append-only: inserted once by the
/// ingestion endpoint and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner at the time of ingestion, resolved by reverse lookup
    pub user_id: u16,

    pub hanger_id: u16,

    /// Temperature in °C
    pub temp: f64,

    /// Relative humidity in %
    pub hum: f64,

    /// Assigned server-side at insert time; the hardware sends no clock
    pub timestamp: bson::DateTime,
}

/// Request body for `POST /log_temp`.
///
/// The hardware only knows its own hanger id; the service resolves the
/// owning customer.
#[derive(Debug, Deserialize)]
pub struct LogReadingRequest {
    pub hanger_id: i64,
    pub temp: f64,
    pub hum: f64,
}

/// Response body for `POST /log_temp` (201 Created).
#[derive(Debug, Serialize)]
pub struct LogReadingResponse {
    pub message: String,

    /// Stringified store id of the inserted log document
    pub id: String,
}
