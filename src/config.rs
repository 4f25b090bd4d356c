//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Accounts are kept in memory when unset.
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `MIN_PASSWORD_LENGTH` (optional): shortest accepted password, defaults to 2
/// - `REQUEST_TIMEOUT_SECS` (optional): how long a client waits for a response, defaults to 10
/// - `MAX_DB_CONNECTIONS` (optional): Postgres pool size, defaults to 5
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_min_password_length() -> usize {
    2
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_db_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// the expected type (e.g. `SERVER_PORT=abc`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: min_password_length -> MIN_PASSWORD_LENGTH
        envy::from_env::<Config>()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            server_port: default_port(),
            min_password_length: default_min_password_length(),
            request_timeout_secs: default_request_timeout_secs(),
            max_db_connections: default_max_db_connections(),
        }
    }
}
