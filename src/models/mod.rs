//! Data models representing database rows.

/// Catalog and migration-marker rows read by the verifier
pub mod schema;
/// User account model
pub mod user;
