//! Delivery service - key generation, delivery creation and the
//! security-key-gated status state machine.
//!
//! The security key is the sole credential: every read or transition starts
//! with an exact key match, and an unknown key is indistinguishable from a
//! missing delivery.
//!
//! The advance filter and its outcome decisions are plain functions so the
//! forward-only transition invariants are testable without a running store.

use bson::{Document, doc};
use rand::{Rng, distr::Alphanumeric};

use crate::{
    db::Store,
    error::AppError,
    models::delivery::{Delivery, DeliveryCustomer, DeliveryStatus},
};

/// Length of a delivery security key.
pub const SECURITY_KEY_LEN: usize = 16;

/// Generate a random 16-character alphanumeric security key.
///
/// 62-symbol alphabet over 16 positions gives ~95 bits, enough that the key
/// can serve as the only credential for a delivery.
pub fn generate_security_key() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SECURITY_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Create a delivery-tracker customer.
///
/// Customer names are the tracker's unique key: a duplicate name is a
/// `Conflict`, not a second document.
///
/// # Returns
///
/// The stringified store id of the new customer.
pub async fn create_customer(
    store: &Store,
    name: String,
    email: String,
    address: String,
) -> Result<String, AppError> {
    let customers = store.delivery_customers();

    if customers.find_one(doc! { "name": &name }).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Customer with name '{name}' already exists"
        )));
    }

    let customer = DeliveryCustomer {
        id: None,
        name,
        email,
        address,
    };
    let inserted = customers.insert_one(&customer).await?;

    let id = inserted
        .inserted_id
        .as_object_id()
        .map_or_else(|| inserted.inserted_id.to_string(), |oid| oid.to_hex());
    tracing::info!(customer_id = %id, "delivery customer created");
    Ok(id)
}

/// Create a delivery for an existing customer.
///
/// # Process
///
/// 1. Look up the customer by name (absent → the tracker's historical 400)
/// 2. Generate the security key
/// 3. Insert the delivery in `pending`, copying the customer's address
///
/// # Returns
///
/// `(delivery_id, security_key)` - the key is returned exactly once.
pub async fn create_delivery(
    store: &Store,
    customer_name: &str,
) -> Result<(String, String), AppError> {
    let customer = store
        .delivery_customers()
        .find_one(doc! { "name": customer_name })
        .await?
        .ok_or_else(|| AppError::UnknownCustomer(customer_name.to_string()))?;

    let security_key = generate_security_key();
    let delivery = Delivery {
        id: None,
        customer_id: customer.id.map(|oid| oid.to_hex()).unwrap_or_default(),
        address: customer.address,
        security_key: security_key.clone(),
        status: DeliveryStatus::Pending,
    };
    let inserted = store.deliveries().insert_one(&delivery).await?;

    let delivery_id = inserted
        .inserted_id
        .as_object_id()
        .map_or_else(|| inserted.inserted_id.to_string(), |oid| oid.to_hex());
    tracing::info!(delivery_id = %delivery_id, customer = customer_name, "delivery created");
    Ok((delivery_id, security_key))
}

/// The unique successor of a non-terminal status; advancing a delivered
/// delivery always fails and never changes state.
fn next_status(current: DeliveryStatus) -> Result<DeliveryStatus, AppError> {
    current.next().ok_or(AppError::AlreadyDelivered)
}

/// Filter for the guarded transition: the old status is re-asserted next
/// to the key, so two concurrent advances cannot both apply.
fn advance_filter(security_key: &str, current: DeliveryStatus) -> Document {
    doc! {
        "security_key": security_key,
        "status": current.as_str(),
    }
}

/// Settle the transition after the guarded update: a filter that matched
/// nothing means a racing request advanced the delivery in between.
fn settle_advance(next: DeliveryStatus, update_matched: bool) -> Result<DeliveryStatus, AppError> {
    if update_matched {
        Ok(next)
    } else {
        Err(AppError::Conflict(
            "Delivery status changed concurrently".to_string(),
        ))
    }
}

/// Advance a delivery to the next status in the fixed sequence.
///
/// # Process
///
/// 1. Look up the delivery by exact key match (`InvalidKey` if absent)
/// 2. Refuse if the status is terminal (`AlreadyDelivered`)
/// 3. Persist the unique successor with a filtered update that re-asserts
///    the old status; a lost race surfaces as 409
///
/// # Returns
///
/// The new status.
pub async fn advance(store: &Store, security_key: &str) -> Result<DeliveryStatus, AppError> {
    let deliveries = store.deliveries();

    let delivery = deliveries
        .find_one(doc! { "security_key": security_key })
        .await?
        .ok_or(AppError::InvalidKey)?;

    let next = next_status(delivery.status)?;

    let result = deliveries
        .update_one(
            advance_filter(security_key, delivery.status),
            doc! { "$set": { "status": next.as_str() } },
        )
        .await?;

    let status = settle_advance(next, result.matched_count > 0)?;
    tracing::info!(status = status.as_str(), "delivery advanced");
    Ok(status)
}

/// Verify that a delivery has been completed.
///
/// Read-only: succeeds if and only if the status is exactly `delivered`.
pub async fn verify(store: &Store, security_key: &str) -> Result<(), AppError> {
    let delivery = store
        .deliveries()
        .find_one(doc! { "security_key": security_key })
        .await?
        .ok_or(AppError::InvalidKey)?;

    if !delivery.status.is_terminal() {
        return Err(AppError::NotCompleted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn security_key_has_16_alphanumeric_chars() {
        let key = generate_security_key();
        assert_eq!(key.len(), SECURITY_KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn security_keys_are_not_repeated() {
        // ~95 bits of entropy: any collision here is a broken generator
        let keys: Vec<String> = (0..100).map(|_| generate_security_key()).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn advance_walks_pending_on_route_delivered_then_refuses() {
        let first = next_status(DeliveryStatus::Pending).unwrap();
        assert_eq!(first, DeliveryStatus::OnRoute);

        let second = next_status(first).unwrap();
        assert_eq!(second, DeliveryStatus::Delivered);

        // Terminal: every further advance fails, state untouched
        let err = next_status(second).unwrap_err();
        assert!(matches!(err, AppError::AlreadyDelivered));
    }

    #[test]
    fn advance_filter_reasserts_the_old_status_beside_the_key() {
        assert_eq!(
            advance_filter("aB3xY9kL2mNpQ7rS", DeliveryStatus::Pending),
            doc! { "security_key": "aB3xY9kL2mNpQ7rS", "status": "pending" }
        );
        assert_eq!(
            advance_filter("aB3xY9kL2mNpQ7rS", DeliveryStatus::OnRoute),
            doc! { "security_key": "aB3xY9kL2mNpQ7rS", "status": "on route" }
        );
    }

    #[test]
    fn advance_race_loser_settles_as_409_conflict() {
        assert_eq!(
            settle_advance(DeliveryStatus::OnRoute, true).unwrap(),
            DeliveryStatus::OnRoute
        );

        let err = settle_advance(DeliveryStatus::OnRoute, false).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
