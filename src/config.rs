//! Configuration management for both command-line tools.
//!
//! Settings are read from environment variables with the `envy` crate, after an
//! optional `.env` file has been loaded. Nothing about the database is hardcoded,
//! so either tool can be pointed at an isolated instance for testing.

use serde::Deserialize;
use std::time::Duration;

/// Connection settings shared by both binaries.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 10
/// - `DB_MAX_LIFETIME_SECS` (optional): connection lifetime, defaults to 300
/// - `DB_IDLE_TIMEOUT_SECS` (optional): idle connection timeout, defaults to 60
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_max_lifetime_secs")]
    pub db_max_lifetime_secs: u64,

    #[serde(default = "default_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_max_lifetime_secs() -> u64 {
    300
}

fn default_idle_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is applied first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric setting
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.db_max_lifetime_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.db_idle_timeout_secs)
    }
}

/// What the schema verifier looks for.
///
/// # Environment Variables
///
/// - `VERIFY_EXPECTED_TABLES` (optional): comma-separated table names,
///   defaults to `users,categories,expenses`
/// - `VERIFY_INSPECT_TABLE` (optional): table whose columns are listed,
///   defaults to `users`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "default_expected_tables")]
    pub expected_tables: Vec<String>,

    #[serde(default = "default_inspect_table")]
    pub inspect_table: String,
}

fn default_expected_tables() -> Vec<String> {
    ["users", "categories", "expenses"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_inspect_table() -> String {
    "users".to_string()
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            expected_tables: default_expected_tables(),
            inspect_table: default_inspect_table(),
        }
    }
}

impl VerifyConfig {
    /// Load verifier settings from `VERIFY_*` environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("VERIFY_").from_env::<VerifyConfig>()
    }
}
