//! Registry service - customer registration, hanger pairing, status updates
//! and sensor-log ingestion.
//!
//! # Concurrency
//!
//! There is no application-level locking. Every mutation is a single
//! filtered `update_one`/`insert_one`, so the store's per-document atomic
//! update is the only serialization mechanism, exactly as deployed.
//!
//! The filter/update documents and the outcome decisions are plain
//! functions so the pairing and ingestion invariants are testable without
//! a running store.

use bson::{Document, doc};
use rand::Rng;

use crate::{
    db::Store,
    error::AppError,
    models::{
        customer::{Customer, Hanger},
        sensor_log::SensorLog,
    },
};

/// Outcome of a pairing attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// The hanger was added to the customer's set
    Paired,
    /// The customer already had this hanger; nothing changed
    AlreadyPaired,
}

/// Register a new customer.
///
/// # Process
///
/// 1. Draw a random 16-bit `user_id` (zero excluded)
/// 2. Probe the store; redraw on collision
/// 3. Insert the customer with an empty hanger set
///
/// The draw-and-probe loop is not atomic, but the id space is checked per
/// draw and collisions merely trigger another round.
///
/// # Returns
///
/// The assigned `user_id`.
pub async fn create_customer(
    store: &Store,
    first_name: String,
    last_name: String,
    email: String,
) -> Result<u16, AppError> {
    let customers = store.customers();

    // Draw until the id is unused
    let user_id = loop {
        let candidate: u16 = rand::rng().random_range(1..=u16::MAX);
        let existing = customers
            .find_one(doc! { "user_id": i32::from(candidate) })
            .await?;
        if existing.is_none() {
            break candidate;
        }
    };

    let customer = Customer {
        id: None,
        user_id,
        first_name,
        last_name,
        email,
        registration_date: bson::DateTime::now(),
        hangers: Vec::new(),
    };
    customers.insert_one(&customer).await?;

    tracing::info!(user_id, "customer registered");
    Ok(user_id)
}

/// Filter for the guarded pairing push: matches the customer only while
/// the hanger id is absent from its set. Uniqueness is keyed on
/// `hanger_id` alone, so a repeat call can never push a second entry even
/// though `paired_at` differs.
fn pair_filter(user_id: i64, hanger_id: u16) -> Document {
    doc! {
        "user_id": user_id,
        "hangers.hanger_id": { "$ne": i32::from(hanger_id) },
    }
}

fn pair_update(hanger: &Hanger) -> Result<Document, AppError> {
    Ok(doc! { "$push": { "hangers": bson::to_bson(hanger)? } })
}

/// Decide the pairing outcome from the guarded push and, when the push
/// matched nothing, the follow-up existence probe.
fn pair_outcome(pushed: bool, user_exists: bool, user_id: i64) -> Result<PairOutcome, AppError> {
    match (pushed, user_exists) {
        (true, _) => Ok(PairOutcome::Paired),
        (false, true) => Ok(PairOutcome::AlreadyPaired),
        (false, false) => Err(AppError::NotFound(format!("User with user_id {user_id}"))),
    }
}

/// Pair a hanger to a customer.
///
/// # Process
///
/// 1. One filtered `$push` guarded by `hangers.hanger_id != id`
/// 2. If nothing matched, probe the customer to tell "already paired"
///    (200 no-op) apart from "no such user" (404)
///
/// Nothing prevents the same `hanger_id` being paired to a second
/// customer; ingestion resolves collisions as first match (known
/// limitation).
pub async fn pair_hanger(
    store: &Store,
    user_id: i64,
    hanger_id: u16,
) -> Result<PairOutcome, AppError> {
    let customers = store.customers();
    let hanger = Hanger::paired_now(hanger_id);

    let result = customers
        .update_one(pair_filter(user_id, hanger_id), pair_update(&hanger)?)
        .await?;

    if result.matched_count > 0 {
        tracing::info!(user_id, hanger_id, "hanger paired");
        return pair_outcome(true, true, user_id);
    }

    // No match: either the hanger is already in the set or the user is absent
    let owner = customers.find_one(doc! { "user_id": user_id }).await?;
    pair_outcome(false, owner.is_some(), user_id)
}

/// Filter matching the customer by `user_id` AND the hanger by id inside
/// the embedded array.
fn status_filter(user_id: i64, hanger_id: u16) -> Document {
    doc! {
        "user_id": user_id,
        "hangers.hanger_id": i32::from(hanger_id),
    }
}

/// Positional `$` update touching only the matched sub-record, setting
/// `status` and `last_updated` together.
fn status_update(status: &str) -> Document {
    doc! {
        "$set": {
            "hangers.$.status": status,
            "hangers.$.last_updated": bson::DateTime::now(),
        }
    }
}

/// Update the status of one specific hanger.
///
/// A missing user and a user without this hanger both surface as the same
/// `NotFound` (the filter cannot tell them apart, and neither could the
/// original service).
pub async fn set_hanger_status(
    store: &Store,
    user_id: i64,
    hanger_id: u16,
    status: &str,
) -> Result<(), AppError> {
    let result = store
        .customers()
        .update_one(status_filter(user_id, hanger_id), status_update(status))
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(format!(
            "User {user_id} or hanger {hanger_id} paired to this user"
        )));
    }

    tracing::info!(user_id, hanger_id, status, "hanger status updated");
    Ok(())
}

/// Resolve the owning customer of a hanger, or reject the reading.
///
/// Runs before anything is inserted: a reading for a never-paired hanger
/// fails here and no log document is ever written.
fn owner_user_id(owner: Option<Customer>, hanger_id: u16) -> Result<u16, AppError> {
    owner
        .map(|customer| customer.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Hanger {hanger_id} paired to any user")))
}

/// Ingest one hardware reading.
///
/// # Process
///
/// 1. Reverse-lookup the owning customer via `hangers.hanger_id`
///    (first match when the id was paired to several customers)
/// 2. Reject with `NotFound` if no owner exists - readings from never-paired
///    devices are never stored
/// 3. Insert the log with a server-side timestamp
///
/// # Returns
///
/// The stringified store id of the inserted log document.
pub async fn record_reading(
    store: &Store,
    hanger_id: u16,
    temp: f64,
    hum: f64,
) -> Result<String, AppError> {
    let owner = store
        .customers()
        .find_one(doc! { "hangers.hanger_id": i32::from(hanger_id) })
        .await?;
    let user_id = owner_user_id(owner, hanger_id)?;

    let log = SensorLog {
        id: None,
        user_id,
        hanger_id,
        temp,
        hum,
        timestamp: bson::DateTime::now(),
    };
    let inserted = store.sensor_logs().insert_one(&log).await?;

    let id = inserted
        .inserted_id
        .as_object_id()
        .map_or_else(|| inserted.inserted_id.to_string(), |oid| oid.to_hex());
    tracing::debug!(hanger_id, user_id, "sensor reading logged");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_with_user_id(user_id: u16) -> Customer {
        Customer {
            id: None,
            user_id,
            first_name: "Ann".to_string(),
            last_name: "Example".to_string(),
            email: "ann@x.com".to_string(),
            registration_date: bson::DateTime::now(),
            hangers: vec![Hanger::paired_now(1024)],
        }
    }

    #[test]
    fn pair_filter_guards_on_hanger_id_alone() {
        // The guard must key on the id, not the full sub-document, or a
        // repeat pairing with a fresh paired_at would slip past it
        assert_eq!(
            pair_filter(42, 1024),
            doc! { "user_id": 42_i64, "hangers.hanger_id": { "$ne": 1024 } }
        );
    }

    #[test]
    fn pair_update_pushes_a_fresh_off_hanger() {
        let hanger = Hanger::paired_now(7);
        let update = pair_update(&hanger).unwrap();
        let pushed = update
            .get_document("$push")
            .unwrap()
            .get_document("hangers")
            .unwrap();
        assert_eq!(pushed.get_i32("hanger_id").unwrap(), 7);
        assert_eq!(pushed.get_str("status").unwrap(), "off");
    }

    #[test]
    fn first_pair_reports_paired() {
        assert_eq!(pair_outcome(true, true, 42).unwrap(), PairOutcome::Paired);
    }

    #[test]
    fn second_pair_reports_already_paired_not_a_duplicate() {
        // The guarded push matched nothing but the user exists: idempotent
        // no-op, never a second entry
        assert_eq!(
            pair_outcome(false, true, 42).unwrap(),
            PairOutcome::AlreadyPaired
        );
    }

    #[test]
    fn pairing_to_a_missing_user_is_not_found() {
        let err = pair_outcome(false, false, 42).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn status_update_targets_only_the_matched_subrecord() {
        assert_eq!(
            status_filter(42, 1024),
            doc! { "user_id": 42_i64, "hangers.hanger_id": 1024 }
        );

        let update = status_update("drying");
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("hangers.$.status").unwrap(), "drying");
        // last_updated rides along in the same atomic $set
        assert!(set.get_datetime("hangers.$.last_updated").is_ok());
    }

    #[test]
    fn reading_for_an_unpaired_hanger_is_rejected_before_any_insert() {
        let err = owner_user_id(None, 1024).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn reading_resolves_the_first_owner() {
        let user_id = owner_user_id(Some(customer_with_user_id(42)), 1024).unwrap();
        assert_eq!(user_id, 42);
    }
}
