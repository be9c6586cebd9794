//! Table schema and primary-key resolution

use serde::Deserialize;
use serde::Serialize;

use super::ColumnDefinition;
use super::Row;

/// An ordered set of column definitions describing a table's shape.
///
/// Column order is display order. A schema is a value: the schema editor
/// never mutates one in place, it returns a new schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    id: String,
    name: String,
    columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Creates a new schema, normalizing every column.
    pub fn new(id: impl Into<String>, name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        let mut schema = Self {
            id: id.into(),
            name: name.into(),
            columns: Vec::new(),
        };
        schema.columns = columns
            .into_iter()
            .map(|mut c| {
                c.normalize();
                c
            })
            .collect();
        schema
    }

    /// Returns the table identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in display order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by its key.
    pub fn column(&self, key: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Looks up a column by its id.
    pub fn column_by_id(&self, id: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Returns the display position of a column id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Returns `true` if some column uses this key.
    pub fn has_key(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    /// Returns a copy of this schema with a different column list.
    pub fn with_columns(&self, columns: Vec<ColumnDefinition>) -> Self {
        Self::new(self.id.clone(), self.name.clone(), columns)
    }

    /// Resolves the primary-key column from the column keys alone.
    ///
    /// Priority: a column keyed `id`, then a key ending in `_id`, then a key
    /// containing `id`. Matching ignores ASCII case.
    pub fn primary_key_column(&self) -> Option<&ColumnDefinition> {
        let lower = |c: &&ColumnDefinition| c.key.to_ascii_lowercase();
        self.columns
            .iter()
            .find(|c| lower(c) == "id")
            .or_else(|| self.columns.iter().find(|c| lower(c).ends_with("_id")))
            .or_else(|| self.columns.iter().find(|c| lower(c).contains("id")))
    }

    /// Resolves the primary-key field for a row collection.
    ///
    /// Falls back to the first key of the first row when no column name
    /// identifies a key.
    pub fn primary_key(&self, rows: &[Row]) -> Option<String> {
        self.primary_key_column()
            .map(|c| c.key.clone())
            .or_else(|| rows.first().and_then(Row::first_key).map(str::to_string))
    }

    /// Returns `true` if the column with this key is the primary key.
    pub fn is_primary_key(&self, key: &str, rows: &[Row]) -> bool {
        self.primary_key(rows).as_deref() == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    fn column(key: &str) -> ColumnDefinition {
        ColumnDefinition::new(format!("col-{key}"), key, key, ColumnType::String)
    }

    #[test]
    fn test_primary_key_priority() {
        let schema = TableSchema::new(
            "t",
            "T",
            vec![column("provider"), column("lender_id"), column("id")],
        );
        assert_eq!(schema.primary_key(&[]).as_deref(), Some("id"));

        let schema = TableSchema::new("t", "T", vec![column("provider"), column("lender_id")]);
        assert_eq!(schema.primary_key(&[]).as_deref(), Some("lender_id"));

        let schema = TableSchema::new("t", "T", vec![column("name"), column("provider")]);
        assert_eq!(schema.primary_key(&[]).as_deref(), Some("provider"));
    }

    #[test]
    fn test_primary_key_falls_back_to_row_data() {
        let schema = TableSchema::new("t", "T", vec![column("name"), column("amount")]);
        let rows = vec![Row::new().set("code", "A").set("name", "x")];
        assert_eq!(schema.primary_key(&rows).as_deref(), Some("code"));
        assert_eq!(schema.primary_key(&[]), None);
    }
}
