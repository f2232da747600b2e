//! Integration tests for the schema verifier.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use pg_account_tools::{
    AppError,
    config::VerifyConfig,
    models::schema::{MigrationState, TableStatus},
    services::schema_service::{count_rows, table_columns, table_exists, verify},
};
use sqlx::PgPool;

async fn create_expense_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE users (id SERIAL PRIMARY KEY, email TEXT NOT NULL, nickname TEXT)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE TABLE categories (id SERIAL PRIMARY KEY, name TEXT NOT NULL)")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO users (email) VALUES ('a@example.com'), ('b@example.com')")
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_migration_marker(pool: &PgPool, version: i64, dirty: bool) -> anyhow::Result<()> {
    sqlx::query("CREATE TABLE schema_migrations (version BIGINT NOT NULL PRIMARY KEY, dirty BOOLEAN NOT NULL)")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO schema_migrations (version, dirty) VALUES ($1, $2)")
        .bind(version)
        .bind(dirty)
        .execute(pool)
        .await?;
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn reports_existing_and_missing_tables(pool: PgPool) -> anyhow::Result<()> {
    create_expense_schema(&pool).await?;

    assert!(table_exists(&pool, "users").await?);
    assert!(!table_exists(&pool, "expenses").await?);
    assert_eq!(count_rows(&pool, "users").await?, 2);

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert_eq!(
        report.tables[0].status,
        TableStatus::Present { row_count: Some(2) }
    );
    assert_eq!(
        report.tables[1].status,
        TableStatus::Present { row_count: Some(0) }
    );
    assert_eq!(report.missing_tables().collect::<Vec<_>>(), vec!["expenses"]);
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn lists_columns_in_ordinal_order(pool: PgPool) -> anyhow::Result<()> {
    create_expense_schema(&pool).await?;

    let columns = table_columns(&pool, "users").await?;
    let names: Vec<_> = columns.iter().map(|c| c.column_name.as_str()).collect();

    assert_eq!(names, vec!["id", "email", "nickname"]);
    assert_eq!(columns[0].data_type, "integer");
    assert_eq!(columns[1].is_nullable, "NO");
    assert_eq!(columns[2].is_nullable, "YES");
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn missing_marker_is_skipped(pool: PgPool) -> anyhow::Result<()> {
    create_expense_schema(&pool).await?;

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert!(report.migration.is_none());
    assert!(report.columns.is_some());
    assert!(report.ensure_clean().is_ok());
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn clean_marker_passes(pool: PgPool) -> anyhow::Result<()> {
    create_migration_marker(&pool, 3, false).await?;

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert_eq!(
        report.migration,
        Some(MigrationState {
            version: 3,
            dirty: false
        })
    );
    assert!(report.ensure_clean().is_ok());
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn dirty_marker_fails(pool: PgPool) -> anyhow::Result<()> {
    create_migration_marker(&pool, 7, true).await?;

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert!(matches!(
        report.ensure_clean(),
        Err(AppError::DirtyMigration { version: 7 })
    ));
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn dirty_marker_with_integer_version_fails(pool: PgPool) -> anyhow::Result<()> {
    sqlx::query("CREATE TABLE schema_migrations (version INTEGER NOT NULL PRIMARY KEY, dirty BOOLEAN NOT NULL)")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO schema_migrations (version, dirty) VALUES (5, true)")
        .execute(&pool)
        .await?;

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert_eq!(
        report.migration,
        Some(MigrationState {
            version: 5,
            dirty: true
        })
    );
    assert!(matches!(
        report.ensure_clean(),
        Err(AppError::DirtyMigration { version: 5 })
    ));
    Ok(())
}

#[sqlx::test(migrations = false)]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn failed_row_count_keeps_table_present(pool: PgPool) -> anyhow::Result<()> {
    create_expense_schema(&pool).await?;
    // A view that exists in the catalog but errors when read
    sqlx::query(
        r#"
        CREATE FUNCTION broken_expenses() RETURNS SETOF integer
        LANGUAGE plpgsql AS $$
        BEGIN
            RAISE EXCEPTION 'expenses unavailable';
        END
        $$
        "#,
    )
    .execute(&pool)
    .await?;
    sqlx::query("CREATE VIEW expenses AS SELECT * FROM broken_expenses()")
        .execute(&pool)
        .await?;

    assert!(table_exists(&pool, "expenses").await?);
    assert!(count_rows(&pool, "expenses").await.is_err());

    let report = verify(&pool, &VerifyConfig::default()).await;

    assert_eq!(report.tables[2].table, "expenses");
    assert_eq!(
        report.tables[2].status,
        TableStatus::Present { row_count: None }
    );
    assert_eq!(
        report.tables[0].status,
        TableStatus::Present { row_count: Some(2) }
    );
    assert!(report.columns.is_some());
    assert_eq!(report.missing_tables().count(), 0);
    Ok(())
}
