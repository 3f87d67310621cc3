//! Store connection and shared application state.
//!
//! The original deployment kept module-level collection globals that were
//! silently `None` when the connection failed. Here the connection is a
//! typed [`Store`] handle injected into every handler through axum state;
//! a failed startup connection becomes [`AppError::StoreUnavailable`] the
//! moment a handler asks for the store.

use bson::doc;
use mongodb::{Client, Collection, Database};

use crate::{
    config::Config,
    error::AppError,
    models::{
        customer::Customer,
        delivery::{Delivery, DeliveryCustomer},
        sensor_log::SensorLog,
    },
};

/// Typed collection handles for everything the service persists.
///
/// `Collection<T>` is a cheap clonable handle; no pooling logic lives here,
/// the driver manages its own connections.
#[derive(Clone)]
pub struct Store {
    db: Database,
    customers: Collection<Customer>,
    sensor_logs: Collection<SensorLog>,
    delivery_customers: Collection<DeliveryCustomer>,
    deliveries: Collection<Delivery>,
}

impl Store {
    /// Connect to MongoDB and select the service collections.
    ///
    /// The connection is verified with a `ping` command so that an
    /// unreachable or misconfigured cluster is detected at startup rather
    /// than on the first request.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the URI is invalid, the cluster is
    /// unreachable, or authentication fails.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database_name);

        // Test the connection via ping
        db.run_command(doc! { "ping": 1 }).await?;

        Ok(Self {
            customers: db.collection("customers"),
            sensor_logs: db.collection("sensor_logs"),
            delivery_customers: db.collection("delivery_customers"),
            deliveries: db.collection("deliveries"),
            db,
        })
    }

    /// Registry customers, each embedding its paired hanger set.
    pub fn customers(&self) -> &Collection<Customer> {
        &self.customers
    }

    /// Append-only hardware sensor readings.
    pub fn sensor_logs(&self) -> &Collection<SensorLog> {
        &self.sensor_logs
    }

    /// Delivery-tracker customers, unique by name.
    pub fn delivery_customers(&self) -> &Collection<DeliveryCustomer> {
        &self.delivery_customers
    }

    /// Deliveries, each gated by its security key.
    pub fn deliveries(&self) -> &Collection<Delivery> {
        &self.deliveries
    }

    /// Round-trip liveness check used by the health endpoint.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Option<Store>,
    config: Config,
}

impl AppState {
    pub fn new(store: Option<Store>, config: Config) -> Self {
        Self { store, config }
    }

    /// Access the store, or fail with the fixed degraded-service error.
    ///
    /// Handlers call this before every operation, matching the defensive
    /// per-request connection check of the original service.
    pub fn store(&self) -> Result<&Store, AppError> {
        self.store.as_ref().ok_or(AppError::StoreUnavailable)
    }

    /// Statuses accepted by the hanger status-update endpoint.
    pub fn allowed_hanger_statuses(&self) -> &[String] {
        &self.config.allowed_hanger_statuses
    }
}
