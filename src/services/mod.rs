//! Database operations used by the two binaries.
//!
//! Services own the SQL. Binaries only orchestrate calls and print results.

pub mod schema_service;
pub mod user_service;
