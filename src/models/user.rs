//! User account records.
//!
//! This module defines:
//! - `User`: a row of the `users` table
//! - `NewUser`: the fields supplied when inserting a user

use rust_decimal::Decimal;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Each user:
/// - Has a `SERIAL` id assigned by the database
/// - Has a unique email
/// - Has a `DECIMAL(10,2)` balance, read as an exact `Decimal`
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i32,

    pub name: String,

    /// Unique across all users (enforced by a UNIQUE constraint)
    pub email: String,

    /// Current balance in dollars with two decimal places
    ///
    /// Non-negative by convention; only the transfer check enforces it.
    pub balance: Decimal,
}

/// Fields for inserting a new user. The id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub balance: Decimal,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            balance,
        }
    }
}

/// Rows inserted when the `users` table is first created.
pub fn seed_users() -> Vec<NewUser> {
    vec![
        NewUser::new("Alice Johnson", "alice@example.com", Decimal::new(100000, 2)),
        NewUser::new("Bob Smith", "bob@example.com", Decimal::new(50000, 2)),
        NewUser::new("Charlie Brown", "charlie@example.com", Decimal::new(75000, 2)),
        NewUser::new("Diana Prince", "diana@example.com", Decimal::new(120000, 2)),
    ]
}
