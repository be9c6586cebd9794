//! Optimistic save lifecycle.
//!
//! A save moves through `Pending → Committed | RolledBack`. The optimistic
//! value is applied to the row snapshot when the save starts; a failed save
//! restores the previous value.

use crate::model::Value;

/// State of an optimistic cell save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Applied locally, waiting for the host.
    Pending,
    /// The host persisted the value.
    Committed,
    /// The host failed; the previous value was restored unless the cell
    /// changed again meanwhile.
    RolledBack,
}

/// A cell save applied optimistically and awaiting persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub(crate) row_id: String,
    pub(crate) column_key: String,
    pub(crate) previous: Value,
    pub(crate) value: Value,
    pub(crate) state: SaveState,
}

impl PendingSave {
    pub(crate) fn new(row_id: String, column_key: String, previous: Value, value: Value) -> Self {
        Self {
            row_id,
            column_key,
            previous,
            value,
            state: SaveState::Pending,
        }
    }

    /// Returns the primary-key value of the saved row.
    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    /// Returns the key of the saved column.
    pub fn column_key(&self) -> &str {
        &self.column_key
    }

    /// Returns the value the cell held before the save.
    pub fn previous(&self) -> &Value {
        &self.previous
    }

    /// Returns the optimistically applied value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the lifecycle state, updated by
    /// [`DynamicTable::complete_save`](crate::grid::DynamicTable::complete_save).
    pub fn state(&self) -> SaveState {
        self.state
    }
}
