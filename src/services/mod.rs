//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the store operations, the pairing invariants and the delivery
//! state machine transitions.

pub mod delivery_service;
pub mod registry_service;
