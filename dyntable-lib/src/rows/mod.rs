//! Row lifecycle: add, copy and delete.
//!
//! Every operation takes the current snapshot and returns the complete new
//! collection; there is no delta contract.

mod ids;

pub use ids::IdScheme;
pub use ids::copy_id;

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::RowError;
use crate::model::ColumnType;
use crate::model::Row;
use crate::model::TableSchema;
use crate::model::Value;

/// Field holding a row revision, bumped when a row is copied.
pub const VERSION_FIELD: &str = "version";

/// Per-schema defaults for new rows.
///
/// # Example
///
/// ```
/// use dyntable_lib::model::Row;
/// use dyntable_lib::rows::{IdScheme, RowTemplate};
///
/// let template = RowTemplate::new(IdScheme::sequential("FPC"))
///     .with_defaults(Row::new().set("status", "draft"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowTemplate {
    /// Primary-key scheme.
    #[serde(default)]
    pub id_scheme: IdScheme,
    /// Values overriding the per-type zero values.
    #[serde(default)]
    pub defaults: Row,
}

impl RowTemplate {
    /// Creates a template with the given id scheme and no defaults.
    pub fn new(id_scheme: IdScheme) -> Self {
        Self {
            id_scheme,
            defaults: Row::new(),
        }
    }

    /// Sets default values for new rows.
    pub fn with_defaults(mut self, defaults: Row) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Result of deleting a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Deleted {
    /// The collection without the row.
    pub rows: Vec<Row>,
    /// The selection without the row's id.
    pub selection: Vec<String>,
    /// Whether the selection changed.
    pub selection_changed: bool,
}

/// Add/copy/delete operations over one table's rows.
#[derive(Debug, Clone, Copy)]
pub struct RowLifecycle<'a> {
    schema: &'a TableSchema,
    template: Option<&'a RowTemplate>,
}

impl<'a> RowLifecycle<'a> {
    /// Creates a lifecycle manager for a schema.
    pub fn new(schema: &'a TableSchema, template: Option<&'a RowTemplate>) -> Self {
        Self { schema, template }
    }

    /// Appends a new row filled with defaults and a fresh primary key.
    pub fn add_row(&self, rows: &[Row]) -> Result<Vec<Row>, RowError> {
        let pk = self.primary_key(rows)?;
        let existing = existing_ids(rows, &pk);
        let id = self.scheme().next_id(&existing, self.key_type(rows, &pk));

        let mut row = Row::new();
        row.insert(pk.clone(), id.clone());
        for column in self.schema.columns() {
            if column.key == pk {
                continue;
            }
            let value = self
                .template
                .and_then(|t| t.defaults.get(&column.key))
                .cloned()
                .unwrap_or_else(|| column.column_type.zero_value());
            row.insert(column.key.clone(), value);
        }
        let row = self.in_schema_order(row, &pk);

        log::debug!("adding row '{}' to '{}'", id, self.schema.id());
        let mut next = rows.to_vec();
        next.push(row);
        Ok(next)
    }

    /// Duplicates a row under a new primary key, directly after the source.
    pub fn copy_row(&self, rows: &[Row], row_id: &str) -> Result<Vec<Row>, RowError> {
        let pk = self.primary_key(rows)?;
        let index = find_index(rows, &pk, row_id)?;
        let existing = existing_ids(rows, &pk);

        let sequential = self
            .template
            .map(|t| &t.id_scheme)
            .filter(|scheme| matches!(scheme, IdScheme::Sequential { .. }));
        let new_id = if let Some(scheme) = sequential {
            scheme.next_id(&existing, ColumnType::String)
        } else if matches!(rows[index].value(&pk), Value::Number(_)) {
            IdScheme::Timestamp.next_id(&existing, ColumnType::Number)
        } else {
            Value::String(copy_id(row_id, &existing))
        };

        let mut copy = rows[index].clone();
        copy.insert(pk, new_id.clone());
        if self.schema.has_key(VERSION_FIELD) {
            if let Some(version) = copy.get(VERSION_FIELD).and_then(bump_version) {
                copy.insert(VERSION_FIELD, version);
            }
        }

        log::debug!("copying row '{}' as '{}' in '{}'", row_id, new_id, self.schema.id());
        let mut next = rows.to_vec();
        next.insert(index + 1, copy);
        Ok(next)
    }

    /// Removes a row and prunes its id from the selection.
    pub fn delete_row(&self, rows: &[Row], row_id: &str, selection: &[String]) -> Result<Deleted, RowError> {
        let pk = self.primary_key(rows)?;
        let index = find_index(rows, &pk, row_id)?;

        let mut next = rows.to_vec();
        next.remove(index);
        let pruned: Vec<String> = selection.iter().filter(|id| *id != row_id).cloned().collect();
        let selection_changed = pruned.len() != selection.len();

        log::debug!("deleted row '{}' from '{}'", row_id, self.schema.id());
        Ok(Deleted {
            rows: next,
            selection: pruned,
            selection_changed,
        })
    }

    fn primary_key(&self, rows: &[Row]) -> Result<String, RowError> {
        self.schema.primary_key(rows).ok_or_else(|| RowError::NoPrimaryKey {
            table: self.schema.id().to_string(),
        })
    }

    fn scheme(&self) -> IdScheme {
        self.template.map(|t| t.id_scheme.clone()).unwrap_or_default()
    }

    fn key_type(&self, rows: &[Row], pk: &str) -> ColumnType {
        if let Some(column) = self.schema.column(pk) {
            return column.column_type;
        }
        match rows.first().map(|r| r.value(pk)) {
            Some(Value::Number(_)) => ColumnType::Number,
            _ => ColumnType::String,
        }
    }

    fn in_schema_order(&self, row: Row, pk: &str) -> Row {
        if self.schema.has_key(pk) {
            self.schema
                .columns()
                .iter()
                .map(|c| (c.key.clone(), row.value(&c.key).clone()))
                .collect()
        } else {
            row
        }
    }
}

fn existing_ids(rows: &[Row], pk: &str) -> HashSet<String> {
    rows.iter().map(|r| r.id(pk)).collect()
}

fn find_index(rows: &[Row], pk: &str, row_id: &str) -> Result<usize, RowError> {
    rows.iter()
        .position(|r| r.id(pk) == row_id)
        .ok_or_else(|| RowError::not_found(row_id))
}

fn bump_version(version: &Value) -> Option<Value> {
    match version {
        Value::Number(n) => Some(Value::Number(n + 1.0)),
        Value::String(s) => {
            let split = s.len() - s.bytes().rev().take_while(u8::is_ascii_digit).count();
            let (prefix, digits) = s.split_at(split);
            let n: u64 = digits.parse().ok()?;
            Some(Value::String(format!("{prefix}{}", n.checked_add(1)?)))
        }
        Value::Null | Value::Bool(_) => None,
    }
}
