//! Edit sessions, edit controls and input staging.

use crate::error::EditError;
use crate::model::ColumnDefinition;
use crate::model::ColumnType;
use crate::model::EditorKind;
use crate::model::SelectOption;
use crate::model::Value;
use crate::reference::TableCatalog;

/// The single cell currently in edit mode, with its staged value.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    row_id: String,
    column_key: String,
    original: Value,
    staged: Value,
}

impl EditSession {
    /// Opens a session on a cell, staging its current value.
    pub fn new(row_id: impl Into<String>, column_key: impl Into<String>, original: Value) -> Self {
        Self {
            row_id: row_id.into(),
            column_key: column_key.into(),
            staged: original.clone(),
            original,
        }
    }

    /// Returns the primary-key value of the edited row.
    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    /// Returns the key of the edited column.
    pub fn column_key(&self) -> &str {
        &self.column_key
    }

    /// Returns the value the cell held when editing started.
    pub fn original(&self) -> &Value {
        &self.original
    }

    /// Returns the staged, uncommitted value.
    pub fn staged(&self) -> &Value {
        &self.staged
    }

    /// Returns `true` if the staged value differs from the original.
    pub fn is_dirty(&self) -> bool {
        self.staged != self.original
    }

    /// Returns `true` if this session edits the given cell.
    pub fn is_cell(&self, row_id: &str, column_key: &str) -> bool {
        self.row_id == row_id && self.column_key == column_key
    }

    pub(crate) fn stage(&mut self, value: Value) {
        self.staged = value;
    }
}

/// The control shown for a cell in edit mode.
#[derive(Debug, Clone, PartialEq)]
pub enum EditControl {
    /// Text input; `numeric` inputs are coerced to numbers on stage.
    TextInput { text: String, numeric: bool },
    /// Yes/no toggle.
    Toggle { checked: bool },
    /// Selector constrained to the listed options.
    Select {
        options: Vec<SelectOption>,
        selected: Value,
    },
}

/// Builds the edit control for the session's cell.
pub fn edit_control(session: &EditSession, column: &ColumnDefinition, catalog: &TableCatalog) -> EditControl {
    let staged = session.staged();
    match column.editor_kind() {
        EditorKind::ForeignKey { source } => EditControl::Select {
            options: catalog.options(&source, column.display_column.as_deref()),
            selected: staged.clone(),
        },
        EditorKind::Select { options } => EditControl::Select {
            options,
            selected: staged.clone(),
        },
        EditorKind::Boolean => EditControl::Toggle {
            checked: staged.as_bool().unwrap_or(false),
        },
        EditorKind::Text => EditControl::TextInput {
            text: staged.key_string(),
            numeric: column.column_type == ColumnType::Number,
        },
    }
}

/// Coerces raw input text to the column's type.
///
/// Empty numeric input stages null. Booleans accept `true/false`,
/// `yes/no` and `1/0`.
pub fn coerce_input(column: &ColumnDefinition, raw: &str) -> Result<Value, EditError> {
    match column.column_type {
        ColumnType::String => Ok(Value::String(raw.to_string())),
        ColumnType::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Number)
                .ok_or_else(|| EditError::invalid_number(raw))
        }
        ColumnType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(EditError::InvalidBoolean {
                input: raw.to_string(),
            }),
        },
    }
}

/// Checks a staged value against the column's editor constraints.
///
/// Required columns reject null and blank text. Select values must be one
/// of the options; foreign-key values must identify an existing row of the
/// referenced table.
pub fn validate_value(column: &ColumnDefinition, value: Value, catalog: &TableCatalog) -> Result<Value, EditError> {
    let value = match (column.column_type, value) {
        (ColumnType::Number, Value::String(s)) => coerce_input(column, &s)?,
        (ColumnType::Boolean, Value::String(s)) => coerce_input(column, &s)?,
        (_, value) => value,
    };

    let blank = match &value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    };
    if column.is_required && blank {
        return Err(EditError::Required {
            column: column.key.clone(),
        });
    }

    match column.editor_kind() {
        EditorKind::Select { options } if !value.is_null() => {
            if !options.iter().any(|o| o.value == value) {
                return Err(EditError::InvalidOption {
                    column: column.key.clone(),
                    value: value.key_string(),
                });
            }
        }
        EditorKind::ForeignKey { source } if !value.is_null() => {
            if !catalog.contains(&source, &value.key_string()) {
                return Err(EditError::UnknownReference {
                    table: source,
                    value: value.key_string(),
                });
            }
        }
        _ => {}
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use crate::model::TableSchema;
    use crate::reference::ReferencedTable;

    fn catalog() -> TableCatalog {
        let catalog = TableCatalog::new();
        catalog.insert(ReferencedTable::new(
            TableSchema::new(
                "lender",
                "Lenders",
                vec![
                    ColumnDefinition::new("l1", "id", "ID", ColumnType::String),
                    ColumnDefinition::new("l2", "name", "Name", ColumnType::String),
                ],
            ),
            vec![
                Row::new().set("id", "L-1").set("name", "Ally Bank"),
                Row::new().set("id", "L-2").set("name", "Chase"),
            ],
        ));
        catalog
    }

    #[test]
    fn test_coerce_number() {
        let column = ColumnDefinition::new("c", "term", "Term", ColumnType::Number);
        assert_eq!(coerce_input(&column, " 36 ").unwrap(), Value::Number(36.0));
        assert_eq!(coerce_input(&column, "").unwrap(), Value::Null);
        assert_eq!(
            coerce_input(&column, "abc"),
            Err(EditError::invalid_number("abc"))
        );
        assert!(coerce_input(&column, "inf").is_err());
    }

    #[test]
    fn test_coerce_boolean() {
        let column = ColumnDefinition::new("c", "ok", "OK", ColumnType::Boolean);
        assert_eq!(coerce_input(&column, "Yes").unwrap(), Value::Bool(true));
        assert_eq!(coerce_input(&column, "0").unwrap(), Value::Bool(false));
        assert!(matches!(
            coerce_input(&column, "maybe"),
            Err(EditError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn test_controls_by_editor_kind() {
        let catalog = catalog();

        let lender = ColumnDefinition::new("c", "lender_id", "Lender", ColumnType::String)
            .references("lender", Some("name"));
        let session = EditSession::new("D1", "lender_id", Value::from("L-2"));
        match edit_control(&session, &lender, &catalog) {
            EditControl::Select { options, selected } => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].label, "Chase");
                assert_eq!(selected, Value::from("L-2"));
            }
            other => panic!("expected select, got {other:?}"),
        }

        let flag = ColumnDefinition::new("c", "ok", "OK", ColumnType::Boolean);
        let session = EditSession::new("D1", "ok", Value::Bool(true));
        assert_eq!(edit_control(&session, &flag, &catalog), EditControl::Toggle { checked: true });

        let term = ColumnDefinition::new("c", "term", "Term", ColumnType::Number);
        let session = EditSession::new("D1", "term", Value::from(48));
        assert_eq!(
            edit_control(&session, &term, &catalog),
            EditControl::TextInput {
                text: "48".into(),
                numeric: true
            }
        );
    }

    #[test]
    fn test_reference_values_must_exist() {
        let catalog = catalog();
        let lender = ColumnDefinition::new("c", "lender_id", "Lender", ColumnType::String)
            .references("lender", Some("name"));
        assert!(validate_value(&lender, Value::from("L-1"), &catalog).is_ok());
        assert_eq!(
            validate_value(&lender, Value::from("L-9"), &catalog),
            Err(EditError::UnknownReference {
                table: "lender".into(),
                value: "L-9".into()
            })
        );
    }

    #[test]
    fn test_select_values_must_be_options() {
        let status = ColumnDefinition::new("c", "status", "Status", ColumnType::String).editor(EditorKind::Select {
            options: vec![SelectOption::new("open", "Open")],
        });
        assert!(validate_value(&status, Value::from("open"), &TableCatalog::new()).is_ok());
        assert!(matches!(
            validate_value(&status, Value::from("void"), &TableCatalog::new()),
            Err(EditError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_required_rejects_empty() {
        let catalog = TableCatalog::new();
        let term = ColumnDefinition::new("c", "term", "Term", ColumnType::Number).required();
        let required = Err(EditError::Required { column: "term".into() });
        assert_eq!(validate_value(&term, coerce_input(&term, "").unwrap(), &catalog), required);
        assert_eq!(validate_value(&term, Value::from(" "), &catalog), required);
        assert_eq!(validate_value(&term, Value::from(0), &catalog), Ok(Value::from(0)));

        let customer = ColumnDefinition::new("c", "customer", "Customer", ColumnType::String).required();
        assert!(matches!(
            validate_value(&customer, Value::from("  "), &catalog),
            Err(EditError::Required { .. })
        ));
        assert!(validate_value(&customer, Value::from("Acme"), &catalog).is_ok());

        let optional = ColumnDefinition::new("c", "note", "Note", ColumnType::String);
        assert_eq!(validate_value(&optional, Value::Null, &catalog), Ok(Value::Null));
    }
}
