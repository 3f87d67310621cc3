//! Data models representing store documents.
//!
//! This module contains all data structures that map to MongoDB collections,
//! plus the request/response types exchanged at the JSON boundary.

/// Registry customer with embedded hanger set
pub mod customer;
/// Delivery, delivery-tracker customer and the status state machine
pub mod delivery;
/// Append-only hardware sensor readings
pub mod sensor_log;
