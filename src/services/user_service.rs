//! User service - CRUD operations and balance transfers on the `users` table.
//!
//! # Atomicity Guarantees
//!
//! `transfer_balance` runs inside a single PostgreSQL transaction. Both rows
//! are locked with `FOR UPDATE` before either balance is changed, so two
//! concurrent transfers from the same sender cannot both pass the balance
//! check against a stale value.

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::user::{NewUser, User, seed_users},
};
use rust_decimal::Decimal;

/// Create and seed the `users` table if it does not exist yet.
///
/// The existence check, `CREATE TABLE` and seed inserts run in one transaction,
/// so a failure leaves no half-created table behind.
///
/// # Returns
///
/// `true` when the table was created, `false` when it already existed.
pub async fn ensure_users_table(pool: &DbPool) -> Result<bool> {
    let mut tx = pool
        .begin()
        .await
        .map_err(AppError::db("failed to begin transaction"))?;

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = 'users'
        )
        "#,
    )
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::db("failed to check users table"))?;

    if exists {
        tx.rollback()
            .await
            .map_err(AppError::db("failed to roll back transaction"))?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        CREATE TABLE users (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(100) UNIQUE NOT NULL,
            balance DECIMAL(10,2) DEFAULT 0.00
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(AppError::db("failed to create users table"))?;

    for user in seed_users() {
        sqlx::query("INSERT INTO users (name, email, balance) VALUES ($1, $2, $3)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.balance)
            .execute(&mut *tx)
            .await
            .map_err(AppError::db("failed to seed users table"))?;
    }

    tx.commit()
        .await
        .map_err(AppError::db("failed to commit transaction"))?;

    tracing::info!("Created and seeded users table");
    Ok(true)
}

/// Fetch every user ordered by ascending id.
pub async fn get_all_users(pool: &DbPool) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT id, name, email, balance FROM users ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(AppError::db("failed to get users"))
}

/// Fetch a single user.
///
/// # Errors
///
/// - `UserNotFound`: no row has this id
/// - `Database`: query failed
pub async fn get_user_by_id(pool: &DbPool, id: i32) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT id, name, email, balance FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::db("failed to get user"))?
        .ok_or(AppError::UserNotFound(id))
}

/// Insert a new user and return it with its assigned id.
///
/// # Errors
///
/// - `DuplicateEmail`: another user already has this email
/// - `Database`: any other insert failure
pub async fn insert_user(pool: &DbPool, user: &NewUser) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, balance)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, balance
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.balance)
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateEmail(user.email.clone())
        }
        other => AppError::db("failed to insert user")(other),
    })
}

/// Move `amount` from one user's balance to another's.
///
/// # Process
///
/// 1. Validate amount (no database access)
/// 2. Start database transaction
/// 3. Lock sender row and check balance
/// 4. Lock receiver row
/// 5. Debit sender, credit receiver
/// 6. Commit (or rollback on error)
///
/// # Errors
///
/// - `InvalidAmount`: amount is zero or negative
/// - `SenderNotFound` / `ReceiverNotFound`: id does not exist
/// - `InsufficientBalance`: sender balance is below `amount`
/// - `Database`: any query or the commit failed
pub async fn transfer_balance(pool: &DbPool, from_id: i32, to_id: i32, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(amount));
    }

    // Dropping `tx` on an early `?` return rolls it back
    let mut tx = pool
        .begin()
        .await
        .map_err(AppError::db("failed to begin transaction"))?;

    let from_balance: Option<Decimal> =
        sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
            .bind(from_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::db("failed to read sender balance"))?;

    let Some(from_balance) = from_balance else {
        tx.rollback()
            .await
            .map_err(AppError::db("failed to roll back transaction"))?;
        return Err(AppError::SenderNotFound(from_id));
    };

    if from_balance < amount {
        tx.rollback()
            .await
            .map_err(AppError::db("failed to roll back transaction"))?;
        tracing::debug!(from_id, %from_balance, %amount, "Transfer rejected: insufficient balance");
        return Err(AppError::InsufficientBalance {
            available: from_balance,
            requested: amount,
        });
    }

    let to_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 FOR UPDATE)",
    )
    .bind(to_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::db("failed to check receiver"))?;

    if !to_exists {
        tx.rollback()
            .await
            .map_err(AppError::db("failed to roll back transaction"))?;
        tracing::debug!(to_id, "Transfer rejected: receiver not found");
        return Err(AppError::ReceiverNotFound(to_id));
    }

    sqlx::query("UPDATE users SET balance = balance - $1 WHERE id = $2")
        .bind(amount)
        .bind(from_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::db("failed to deduct from sender"))?;

    sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
        .bind(amount)
        .bind(to_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::db("failed to add to receiver"))?;

    tx.commit()
        .await
        .map_err(AppError::db("failed to commit transaction"))?;

    tracing::info!(from_id, to_id, %amount, "Transfer committed");
    Ok(())
}
