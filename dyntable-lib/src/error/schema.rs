//! Schema validation error types

/// Errors raised when a column add/remove/update/move is rejected.
///
/// Every variant is a validation failure: the schema is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Column name is empty or whitespace.
    #[error("Column name is required")]
    EmptyName,

    /// Column key is empty or whitespace.
    #[error("Column key is required")]
    EmptyKey,

    /// Another column already uses this key.
    #[error("A column with key '{key}' already exists")]
    DuplicateKey { key: String },

    /// A reference column was requested without both a source table and column.
    #[error("Select both a source table and a source column")]
    IncompleteReference,

    /// The referenced table is not registered in the catalog.
    #[error("Source table '{table}' not found")]
    UnknownSourceTable { table: String },

    /// The referenced column does not exist in the source table.
    #[error("Column '{column}' not found in source table '{table}'")]
    UnknownSourceColumn { table: String, column: String },

    /// The primary key column cannot be removed.
    #[error("Cannot remove primary key column '{key}'")]
    PrimaryKeyRemoval { key: String },

    /// The primary key column's key cannot be changed.
    #[error("Cannot change the key of primary key column '{key}'")]
    PrimaryKeyRename { key: String },

    /// The change would make another column the primary key.
    #[error("Column '{candidate}' would replace '{current}' as the primary key")]
    PrimaryKeyConflict { current: String, candidate: String },

    /// No column has the given id.
    #[error("Column '{column_id}' not found")]
    ColumnNotFound { column_id: String },

    /// Insert position past the end of the column list.
    #[error("Insert position {index} out of range for {len} columns")]
    PositionOutOfRange { index: usize, len: usize },
}

impl SchemaError {
    /// Creates a new duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates a new column-not-found error.
    pub fn column_not_found(column_id: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column_id: column_id.into(),
        }
    }
}
