//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `MONGO_URI` (required): MongoDB connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 5001
/// - `DATABASE_NAME` (optional): database to select, defaults to "smart_hanger"
/// - `ALLOWED_HANGER_STATUSES` (optional): comma-separated status allow-list,
///   defaults to "off,on,heating,drying"
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Hanger status allow-list.
    ///
    /// Deployments that need extra states (e.g. `active`, `inactive`)
    /// extend the list via the environment instead of patching code.
    #[serde(default = "default_hanger_statuses")]
    pub allowed_hanger_statuses: Vec<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    5001
}

fn default_database_name() -> String {
    "smart_hanger".to_string()
}

fn default_hanger_statuses() -> Vec<String> {
    ["off", "on", "heating", "drying"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., MONGO_URI)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: mongo_uri -> MONGO_URI
        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_statuses_cover_the_hardware_states() {
        assert_eq!(default_hanger_statuses(), ["off", "on", "heating", "drying"]);
    }

    #[test]
    fn default_port_matches_the_documented_fallback() {
        assert_eq!(default_port(), 5001);
    }
}
