//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Validates input and delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Registry customer registration
pub mod customers;
/// Delivery tracker endpoints
pub mod deliveries;
/// Hanger pairing and status updates
pub mod hangers;
/// Service health / store liveness
pub mod health;
/// Hardware sensor-log ingestion
pub mod sensor_logs;
