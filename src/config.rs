//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 5000
/// - `USERS_TABLE` (optional): item store table holding users, defaults to "Users"
/// - `TRANSACTIONS_TABLE` (optional): item store table holding transactions, defaults to "Transactions"
/// - `STORE_TIMEOUT_MS` (optional): per-call deadline for store operations, defaults to 2000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_users_table")]
    pub users_table: String,

    #[serde(default = "default_transactions_table")]
    pub transactions_table: String,

    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

fn default_users_table() -> String {
    "Users".to_string()
}

fn default_transactions_table() -> String {
    "Transactions".to_string()
}

fn default_store_timeout_ms() -> u64 {
    2000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types (e.g. a non-numeric SERVER_PORT).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: server_port -> SERVER_PORT
        envy::from_env::<Config>()
    }
}
