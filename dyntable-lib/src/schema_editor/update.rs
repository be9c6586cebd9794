//! Partial column updates.

use crate::model::ColumnDefinition;
use crate::model::ColumnDirection;
use crate::model::ColumnType;
use crate::model::EditorKind;

/// A partial update merged into an existing [`ColumnDefinition`].
///
/// Unset fields keep their current value. The "no editable `Output`
/// column" invariant is re-applied after merging.
///
/// # Example
///
/// ```
/// use dyntable_lib::model::ColumnDirection;
/// use dyntable_lib::schema_editor::ColumnUpdate;
///
/// let update = ColumnUpdate::new()
///     .name("Monthly payment")
///     .direction(ColumnDirection::Output);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub key: Option<String>,
    pub column_type: Option<ColumnType>,
    pub direction: Option<ColumnDirection>,
    pub is_required: Option<bool>,
    pub sortable: Option<bool>,
    pub editable: Option<bool>,
    pub source_table: Option<Option<String>>,
    pub display_column: Option<Option<String>>,
    pub editor: Option<Option<EditorKind>>,
}

impl ColumnUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn direction(mut self, direction: ColumnDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = Some(is_required);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    /// Sets or clears the foreign-key binding.
    pub fn references(mut self, source_table: Option<String>, display_column: Option<String>) -> Self {
        self.source_table = Some(source_table);
        self.display_column = Some(display_column);
        self
    }

    /// Sets or clears the editor override.
    pub fn editor(mut self, editor: Option<EditorKind>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub(crate) fn apply(self, current: &ColumnDefinition) -> ColumnDefinition {
        let mut column = current.clone();
        if let Some(name) = self.name {
            column.name = name.trim().to_string();
        }
        if let Some(key) = self.key {
            column.key = key.trim().to_string();
        }
        if let Some(column_type) = self.column_type {
            column.column_type = column_type;
        }
        if let Some(direction) = self.direction {
            column.direction = direction;
        }
        if let Some(is_required) = self.is_required {
            column.is_required = is_required;
        }
        if let Some(sortable) = self.sortable {
            column.sortable = sortable;
        }
        if let Some(editable) = self.editable {
            column.editable = editable;
        }
        if let Some(source_table) = self.source_table {
            column.source_table = source_table;
        }
        if let Some(display_column) = self.display_column {
            column.display_column = display_column;
        }
        if let Some(editor) = self.editor {
            column.editor = editor;
        }
        column.normalize();
        column
    }
}
