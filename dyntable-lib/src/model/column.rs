//! Column definition types

use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text.
    #[default]
    String,
    /// Yes/no flag.
    Boolean,
    /// Numeric value.
    Number,
}

impl ColumnType {
    /// Returns the zero value used to fill new rows.
    pub fn zero_value(self) -> Value {
        match self {
            ColumnType::String => Value::String(String::new()),
            ColumnType::Boolean => Value::Bool(false),
            ColumnType::Number => Value::Number(0.0),
        }
    }
}

/// Whether a column holds user-entered data or derived data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnDirection {
    /// Editable data a user enters.
    #[default]
    Input,
    /// Computed/derived data, never directly editable.
    Output,
}

/// One entry of a [`EditorKind::Select`] editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value.
    pub value: Value,
    /// Label shown in the selector.
    pub label: String,
}

impl SelectOption {
    /// Creates a new option.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Which edit control a column uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditorKind {
    /// Free text input (numeric columns coerce on stage).
    Text,
    /// Toggle control.
    Boolean,
    /// Selector over a fixed set of options.
    Select { options: Vec<SelectOption> },
    /// Selector over the rows of another table.
    ForeignKey { source: String },
}

/// Identity and behavior descriptor for one column.
///
/// `editable` is always `false` on [`ColumnDirection::Output`] columns; the
/// constructors, builder methods and deserialization all enforce this.
///
/// # Example
///
/// ```
/// use dyntable_lib::model::{ColumnDefinition, ColumnDirection, ColumnType};
///
/// let column = ColumnDefinition::new("term", "term_months", "Term", ColumnType::Number)
///     .required()
///     .sortable(true);
/// assert!(column.editable);
///
/// let derived = column.clone().direction(ColumnDirection::Output);
/// assert!(!derived.editable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ColumnRepr")]
pub struct ColumnDefinition {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub direction: ColumnDirection,
    pub is_required: bool,
    pub sortable: bool,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorKind>,
}

impl ColumnDefinition {
    /// Creates an editable, sortable `Input` column.
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: name.into(),
            column_type,
            direction: ColumnDirection::Input,
            is_required: false,
            sortable: true,
            editable: true,
            source_table: None,
            display_column: None,
            editor: None,
        }
    }

    /// Sets the direction, dropping editability for `Output` columns.
    pub fn direction(mut self, direction: ColumnDirection) -> Self {
        self.direction = direction;
        self.normalize();
        self
    }

    /// Marks the column as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column is editable. Ignored on `Output` columns.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self.normalize();
        self
    }

    /// Binds the column to another table's rows.
    pub fn references(mut self, source_table: impl Into<String>, display_column: Option<&str>) -> Self {
        self.source_table = Some(source_table.into());
        self.display_column = display_column.map(str::to_string);
        self
    }

    /// Overrides the derived editor kind.
    pub fn editor(mut self, editor: EditorKind) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Returns `true` if the column is a foreign-key reference.
    pub fn is_reference(&self) -> bool {
        self.source_table.is_some()
    }

    /// Returns the editor kind, derived from type and reference when unset.
    pub fn editor_kind(&self) -> EditorKind {
        if let Some(editor) = &self.editor {
            return editor.clone();
        }
        if let Some(source) = &self.source_table {
            return EditorKind::ForeignKey {
                source: source.clone(),
            };
        }
        match self.column_type {
            ColumnType::Boolean => EditorKind::Boolean,
            ColumnType::String | ColumnType::Number => EditorKind::Text,
        }
    }

    pub(crate) fn normalize(&mut self) {
        if self.direction == ColumnDirection::Output {
            self.editable = false;
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnRepr {
    id: String,
    key: String,
    name: String,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
    #[serde(default)]
    direction: ColumnDirection,
    #[serde(default)]
    is_required: bool,
    #[serde(default = "default_true")]
    sortable: bool,
    #[serde(default = "default_true")]
    editable: bool,
    #[serde(default)]
    source_table: Option<String>,
    #[serde(default)]
    display_column: Option<String>,
    #[serde(default)]
    editor: Option<EditorKind>,
}

fn default_true() -> bool {
    true
}

impl From<ColumnRepr> for ColumnDefinition {
    fn from(repr: ColumnRepr) -> Self {
        let mut column = Self {
            id: repr.id,
            key: repr.key,
            name: repr.name,
            column_type: repr.column_type,
            direction: repr.direction,
            is_required: repr.is_required,
            sortable: repr.sortable,
            editable: repr.editable,
            source_table: repr.source_table,
            display_column: repr.display_column,
            editor: repr.editor,
        };
        column.normalize();
        column
    }
}
