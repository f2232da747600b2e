//! Catalog data read by the schema verifier.
//!
//! None of these rows are owned by this crate: `information_schema` belongs to
//! PostgreSQL and `schema_migrations` to the external migration tool.

use std::fmt;

/// One column of an inspected table, in `ordinal_position` order.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    /// `YES` or `NO`, as reported by `information_schema.columns`
    pub is_nullable: String,
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.column_name, self.data_type, self.is_nullable)
    }
}

/// The single row of `schema_migrations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct MigrationState {
    pub version: i64,
    /// Set when the last migration failed part way through
    pub dirty: bool,
}

/// Result of checking one expected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    /// Table exists; `row_count` is `None` when counting failed.
    Present { row_count: Option<i64> },
    Missing,
    /// The existence query itself failed.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCheck {
    pub table: String,
    pub status: TableStatus,
}

/// Everything the verifier collected in one run.
///
/// Fields are `None` when the corresponding check failed and was skipped.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub tables: Vec<TableCheck>,
    pub inspected_table: String,
    pub columns: Option<Vec<ColumnInfo>>,
    pub migration: Option<MigrationState>,
}

impl VerificationReport {
    pub fn missing_tables(&self) -> impl Iterator<Item = &str> {
        self.tables
            .iter()
            .filter(|check| check.status == TableStatus::Missing)
            .map(|check| check.table.as_str())
    }

    /// Fail when the migration marker is dirty.
    ///
    /// An unreadable marker is not a failure; that check was skipped.
    pub fn ensure_clean(&self) -> crate::error::Result<()> {
        match self.migration {
            Some(MigrationState {
                version,
                dirty: true,
            }) => Err(crate::error::AppError::DirtyMigration { version }),
            _ => Ok(()),
        }
    }
}
