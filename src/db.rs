//! Database connection pool management.

use crate::{
    config::Config,
    error::{AppError, Result},
};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool and verify it can reach the server.
///
/// # Configuration
///
/// - Maximum connections from `DB_MAX_CONNECTIONS`
/// - Connections are recycled after `DB_MAX_LIFETIME_SECS`
/// - Idle connections are closed after `DB_IDLE_TIMEOUT_SECS`
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(config: &Config) -> Result<DbPool> {
    let pool = pool_options(config)
        .connect(&config.database_url)
        .await
        .map_err(AppError::db("failed to connect to database"))?;

    ping(&pool).await?;
    Ok(pool)
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .max_lifetime(config.max_lifetime())
        .idle_timeout(config.idle_timeout())
}

/// Verify connectivity with a trivial query.
pub async fn ping(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(AppError::db("failed to ping database"))?;
    Ok(())
}

/// Build a pool without opening any connection.
///
/// Used by tests that exercise code paths which must fail before touching the
/// database.
#[cfg(test)]
pub(crate) fn lazy_pool() -> DbPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
        .expect("static connection string parses")
}
