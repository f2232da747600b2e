//! PostgreSQL account tools.
//!
//! Shared plumbing for two small command-line programs:
//!
//! - `verify-schema` checks that the expected tables exist, reports row counts
//!   and column metadata, and fails when the migration marker is dirty.
//! - `crud-demo` walks through listing, fetching and inserting users and
//!   moving money between them inside a transaction.
//!
//! # Architecture
//!
//! - **Database**: PostgreSQL with sqlx (async queries, pooled connections)
//! - **Money**: `rust_decimal::Decimal`, matching `DECIMAL(10,2)` columns
//! - **Configuration**: environment variables via envy, optional `.env` file
//! - **Logging**: tracing, filtered by `RUST_LOG`

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, Result};

/// Initialize logging with tracing subscriber.
///
/// Reads the `RUST_LOG` environment variable, defaulting to `info`. Log lines
/// go to stderr so they do not interleave with the programs' stdout report.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}
