//! Schema verifier - checks that the expense tracker schema is in place.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool (fatal on failure)
//! 3. Check each expected table and count its rows
//! 4. List the inspected table's columns
//! 5. Read the migration marker; exit with status 1 if it is dirty

use pg_account_tools::{
    config::{Config, VerifyConfig},
    db,
    models::schema::{TableStatus, VerificationReport},
    services::schema_service,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    pg_account_tools::init_tracing();

    let config = Config::from_env()?;
    let verify_config = VerifyConfig::from_env()?;
    tracing::info!(tables = ?verify_config.expected_tables, "Configuration loaded");

    let pool = db::create_pool(&config).await?;
    println!("Successfully connected to database");

    let report = schema_service::verify(&pool, &verify_config).await;
    print_report(&report);

    let missing: Vec<&str> = report.missing_tables().collect();
    if !missing.is_empty() {
        println!("\nMissing tables: {}", missing.join(", "));
    }

    if let Err(err) = report.ensure_clean() {
        println!("{err}");
        return Ok(ExitCode::FAILURE);
    }

    println!("\nAll migrations applied successfully! Database schema is ready.");
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &VerificationReport) {
    for check in &report.tables {
        match &check.status {
            TableStatus::Present { row_count } => {
                println!("Table {} exists", check.table);
                if let Some(count) = row_count {
                    println!("   Rows in {}: {count}", check.table);
                }
            }
            TableStatus::Missing => println!("Table {} does not exist", check.table),
            // Already logged by the verifier
            TableStatus::Unknown => {}
        }
    }

    if let Some(columns) = &report.columns {
        println!("\nChecking {} table structure:", report.inspected_table);
        for column in columns {
            println!("   {column}");
        }
    }

    if let Some(state) = report.migration {
        println!(
            "\nMigration version: {}, dirty: {}",
            state.version, state.dirty
        );
    }
}
