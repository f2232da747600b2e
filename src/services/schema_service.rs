//! Schema verification against the PostgreSQL catalog.
//!
//! `verify` is best-effort: each check that fails is logged and skipped so the
//! remaining checks still run. Only a dirty migration marker is treated as
//! fatal, and that decision is left to `VerificationReport::ensure_clean`.

use crate::{
    config::VerifyConfig,
    db::DbPool,
    error::{AppError, Result},
    models::schema::{ColumnInfo, MigrationState, TableCheck, TableStatus, VerificationReport},
};

/// Check whether `table` exists in the `public` schema.
pub async fn table_exists(pool: &DbPool, table: &str) -> Result<bool> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .map_err(AppError::db("failed to check table"))
}

/// Count the rows of `table`.
pub async fn count_rows(pool: &DbPool, table: &str) -> Result<i64> {
    // Identifiers cannot be bound as parameters
    let query = format!("SELECT COUNT(*) FROM public.{}", quote_ident(table));
    sqlx::query_scalar(&query)
        .fetch_one(pool)
        .await
        .map_err(AppError::db("failed to count rows"))
}

/// List the columns of `table` in their defined order.
pub async fn table_columns(pool: &DbPool, table: &str) -> Result<Vec<ColumnInfo>> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               is_nullable::text AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = 'public'
        AND table_name = $1
        ORDER BY ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(AppError::db("failed to read table columns"))
}

/// Read the migration marker written by the external migration tool.
///
/// `version` is widened to `BIGINT` so any integer column decodes.
pub async fn migration_state(pool: &DbPool) -> Result<MigrationState> {
    sqlx::query_as::<_, MigrationState>(
        "SELECT version::bigint AS version, dirty FROM schema_migrations LIMIT 1",
    )
    .fetch_one(pool)
    .await
    .map_err(AppError::db("failed to read migration version"))
}

/// Run every check and collect the results.
///
/// Never fails: errors from individual checks are logged with `warn!` and the
/// corresponding report field is left empty.
pub async fn verify(pool: &DbPool, config: &VerifyConfig) -> VerificationReport {
    let mut tables = Vec::with_capacity(config.expected_tables.len());

    for table in &config.expected_tables {
        let status = match table_exists(pool, table).await {
            Ok(true) => {
                let row_count = count_rows(pool, table)
                    .await
                    .inspect_err(|err| tracing::warn!(table = %table, error = %err, "Could not count rows"))
                    .ok();
                TableStatus::Present { row_count }
            }
            Ok(false) => TableStatus::Missing,
            Err(err) => {
                tracing::warn!(table = %table, error = %err, "Failed to check table");
                TableStatus::Unknown
            }
        };

        tables.push(TableCheck {
            table: table.clone(),
            status,
        });
    }

    let columns = table_columns(pool, &config.inspect_table)
        .await
        .inspect_err(|err| {
            tracing::warn!(table = %config.inspect_table, error = %err, "Failed to check table structure")
        })
        .ok();

    let migration = migration_state(pool)
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "Could not check migration version"))
        .ok();

    VerificationReport {
        tables,
        inspected_table: config.inspect_table.clone(),
        columns,
        migration,
    }
}

/// Quote a SQL identifier, doubling any embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_identifier() {
        assert_eq!(quote_ident("users"), "\"users\"");
    }

    #[test]
    fn escapes_embedded_quotes() {
        assert_eq!(
            quote_ident("users\"; DROP TABLE users; --"),
            "\"users\"\"; DROP TABLE users; --\""
        );
    }
}
