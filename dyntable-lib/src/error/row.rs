//! Row lifecycle error types

/// Errors raised by add/copy/delete row operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// No row carries the given primary-key value.
    #[error("Row '{row_id}' not found")]
    NotFound { row_id: String },

    /// The schema has no columns and the rows carry no keys to fall back on.
    #[error("Table '{table}' has no primary key column")]
    NoPrimaryKey { table: String },
}

impl RowError {
    /// Creates a new not-found error.
    pub fn not_found(row_id: impl Into<String>) -> Self {
        Self::NotFound {
            row_id: row_id.into(),
        }
    }
}
