//! CRUD demo - walks through user queries and a balance transfer.
//!
//! # Flow
//!
//! 1. Load configuration and create the connection pool
//! 2. Create and seed the `users` table if it is missing
//! 3. List, fetch and insert users
//! 4. Transfer $100 from Alice (id 1) to Bob (id 2) and print balances
//! 5. Attempt two transfers that are expected to fail

use pg_account_tools::{
    config::Config,
    db::{self, DbPool},
    models::user::NewUser,
    services::user_service,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pg_account_tools::init_tracing();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config).await?;
    println!("Successfully connected to PostgreSQL database");

    if user_service::ensure_users_table(&pool).await? {
        println!("Database schema initialized");
    }

    println!("\n=== DEMO CRUD OPERATIONS ===");

    println!("\n1. GetAllUsers:");
    match user_service::get_all_users(&pool).await {
        Ok(users) => {
            for user in users {
                println!(
                    "   ID: {}, Name: {}, Email: {}, Balance: ${:.2}",
                    user.id, user.name, user.email, user.balance
                );
            }
        }
        Err(err) => tracing::error!(error = %err, "GetAllUsers failed"),
    }

    println!("\n2. GetUserByID (ID: 1):");
    match user_service::get_user_by_id(&pool, 1).await {
        Ok(user) => println!("   User: {}, Balance: ${:.2}", user.name, user.balance),
        Err(err) if err.is_not_found() => println!("   {err}"),
        Err(err) => tracing::error!(error = %err, "GetUserByID failed"),
    }

    println!("\n3. InsertUser:");
    let new_user = NewUser::new("Eve Wilson", "eve@example.com", Decimal::new(30000, 2));
    match user_service::insert_user(&pool, &new_user).await {
        Ok(user) => println!("   New user inserted successfully (ID: {})", user.id),
        Err(err) => tracing::error!(error = %err, "InsertUser failed"),
    }

    println!("\n4. TransferBalance ($100 from Alice to Bob):");
    match user_service::transfer_balance(&pool, 1, 2, Decimal::new(10000, 2)).await {
        Ok(()) => println!("   Transfer completed successfully"),
        Err(err) => tracing::error!(error = %err, "TransferBalance failed"),
    }

    println!("\n5. Final user balances:");
    print_balances(&pool).await;

    println!("\n=== TESTING ERROR CASES ===");

    println!("6. Transfer with insufficient balance:");
    expect_failure(&pool, 1, 2, Decimal::new(500000, 2)).await;

    println!("7. Transfer to non-existent user:");
    expect_failure(&pool, 1, 999, Decimal::new(1000, 2)).await;

    Ok(())
}

async fn print_balances(pool: &DbPool) {
    match user_service::get_all_users(pool).await {
        Ok(users) => {
            for user in users {
                println!("   {}: ${:.2}", user.name, user.balance);
            }
        }
        Err(err) => tracing::error!(error = %err, "GetAllUsers failed"),
    }
}

async fn expect_failure(pool: &DbPool, from_id: i32, to_id: i32, amount: Decimal) {
    match user_service::transfer_balance(pool, from_id, to_id, amount).await {
        Ok(()) => tracing::warn!(from_id, to_id, %amount, "Transfer unexpectedly succeeded"),
        Err(err) => println!("   Expected error: {err}"),
    }
}
