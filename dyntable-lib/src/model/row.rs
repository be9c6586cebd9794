//! Dynamic table row

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// A generic table row: column key to [`Value`], in insertion order.
///
/// Rows are plain data. The grid never mutates a row in place; every
/// operation produces a fresh collection.
///
/// # Example
///
/// ```
/// use dyntable_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", "FPC01")
///     .set("term_months", 36)
///     .set("approved", false);
///
/// assert_eq!(row.id("id"), "FPC01");
/// assert_eq!(row.first_key(), Some("id"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, or [`Value::Null`] when absent.
    pub fn value(&self, field: &str) -> &Value {
        const NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the first key present in this row.
    pub fn first_key(&self) -> Option<&str> {
        self.fields.keys().next().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the row identity under the given primary-key column.
    pub fn id(&self, primary_key: &str) -> String {
        self.value(primary_key).key_string()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value, keeping the position of an existing key.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value, preserving the order of the rest.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    /// Returns a copy of this row with one field replaced.
    pub fn with_value(&self, field: &str, value: Value) -> Self {
        let mut row = self.clone();
        row.insert(field, value);
        row
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
