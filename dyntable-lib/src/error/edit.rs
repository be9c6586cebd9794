//! Cell editing error types

use super::PersistError;

/// Errors raised while editing or saving a cell.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The column is read-only, an `Output` column, or the primary key.
    #[error("Column '{column}' is not editable")]
    NotEditable { column: String },

    /// Save or stage was requested with no cell in edit mode.
    #[error("No cell is being edited")]
    NoActiveEdit,

    /// The edited row no longer exists in the current snapshot.
    #[error("Row '{row_id}' not found")]
    RowNotFound { row_id: String },

    /// The edited column no longer exists in the current schema.
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Input on a numeric column did not parse as a number.
    #[error("'{input}' is not a valid number")]
    InvalidNumber { input: String },

    /// Input on a boolean column did not parse as a boolean.
    #[error("'{input}' is not a valid yes/no value")]
    InvalidBoolean { input: String },

    /// A required column was left empty.
    #[error("'{column}' is required")]
    Required { column: String },

    /// Value is not one of the column's select options.
    #[error("'{value}' is not a valid option for '{column}'")]
    InvalidOption { column: String, value: String },

    /// Value does not identify a row of the referenced table.
    #[error("'{value}' does not exist in table '{table}'")]
    UnknownReference { table: String, value: String },

    /// A previous save of the same cell has not resolved yet.
    #[error("A save for '{column}' on row '{row_id}' is still in progress")]
    SaveInFlight { row_id: String, column: String },

    /// The host failed to persist the value; the cell was rolled back.
    #[error("Failed to save cell: {0}")]
    Persist(#[from] PersistError),
}

impl EditError {
    /// Creates a new not-editable error.
    pub fn not_editable(column: impl Into<String>) -> Self {
        Self::NotEditable {
            column: column.into(),
        }
    }

    /// Creates a new invalid number error.
    pub fn invalid_number(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }
}
