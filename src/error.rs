//! Error types shared by the verifier and the account demo.
//!
//! Every failure carries enough context to be printed directly to the console:
//! database failures name the operation that failed, and domain errors include
//! the offending ids and amounts.

use rust_decimal::Decimal;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: a `sqlx::Error` plus the operation that produced it
/// - **Validation Errors**: rejected before any database call
/// - **Domain Errors**: missing users, insufficient funds, duplicate emails
/// - **Schema Errors**: the migration marker is dirty
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection, query, scan or commit).
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Transfer amount was zero or negative.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("user with ID {0} not found")]
    UserNotFound(i32),

    #[error("sender with ID {0} not found")]
    SenderNotFound(i32),

    #[error("receiver with ID {0} not found")]
    ReceiverNotFound(i32),

    /// Sender balance is lower than the requested amount.
    #[error("insufficient balance: sender has ${available:.2}, tried to send ${requested:.2}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// Email uniqueness constraint rejected an insert.
    #[error("user with email {0} already exists")]
    DuplicateEmail(String),

    /// The last applied migration did not complete.
    #[error("database is in dirty state at migration version {version}; some migration failed")]
    DirtyMigration { version: i64 },
}

impl AppError {
    /// Build a mapper that wraps a `sqlx::Error` with the failed operation.
    ///
    /// ```ignore
    /// sqlx::query("SELECT 1").execute(pool).await.map_err(AppError::db("ping failed"))?;
    /// ```
    pub fn db(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Database { context, source }
    }

    /// True for errors that represent a missing row rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::UserNotFound(_) | AppError::SenderNotFound(_) | AppError::ReceiverNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
