//! Foreign-key resolution against other tables.
//!
//! A reference column stores the primary-key value of a row in another
//! table. The [`TableCatalog`] holds the snapshots of those tables so the
//! grid can show a readable label and offer a selector while editing.
//!
//! A broken reference (unknown table, deleted row) is expected: every lookup
//! degrades to the raw value instead of failing.

use dashmap::DashMap;

use crate::model::ColumnDefinition;
use crate::model::Row;
use crate::model::SelectOption;
use crate::model::TableSchema;
use crate::model::Value;

/// A snapshot of a table that other tables reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedTable {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl ReferencedTable {
    /// Creates a new referenced table snapshot.
    pub fn new(schema: TableSchema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    fn primary_key(&self) -> Option<String> {
        self.schema.primary_key(&self.rows)
    }

    fn find_row(&self, id: &str) -> Option<&Row> {
        let pk = self.primary_key()?;
        self.rows.iter().find(|row| row.id(&pk) == id)
    }
}

/// Registry of referenced tables, keyed by table id.
///
/// Thread-safe; the host may replace a table snapshot while grids hold a
/// shared reference to the catalog.
///
/// # Example
///
/// ```
/// use dyntable_lib::model::{ColumnDefinition, ColumnType, Row, TableSchema, Value};
/// use dyntable_lib::reference::{ReferencedTable, TableCatalog};
///
/// let lenders = TableSchema::new("lender", "Lenders", vec![
///     ColumnDefinition::new("l1", "id", "ID", ColumnType::String),
///     ColumnDefinition::new("l2", "name", "Name", ColumnType::String),
/// ]);
/// let catalog = TableCatalog::new();
/// catalog.insert(ReferencedTable::new(lenders, vec![
///     Row::new().set("id", "L-1").set("name", "Ally Bank"),
/// ]));
///
/// assert_eq!(catalog.resolve("lender", &Value::from("L-1"), Some("name")), "Ally Bank");
/// assert_eq!(catalog.resolve("lender", &Value::from("L-999"), Some("name")), "L-999");
/// ```
#[derive(Debug, Default)]
pub struct TableCatalog {
    tables: DashMap<String, ReferencedTable>,
}

impl TableCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    /// Registers or replaces a table snapshot.
    pub fn insert(&self, table: ReferencedTable) {
        self.tables.insert(table.schema.id().to_string(), table);
    }

    /// Replaces the rows of a registered table. Returns `false` if unknown.
    pub fn update_rows(&self, table_id: &str, rows: Vec<Row>) -> bool {
        match self.tables.get_mut(table_id) {
            Some(mut table) => {
                table.rows = rows;
                true
            }
            None => false,
        }
    }

    /// Removes a table.
    pub fn remove(&self, table_id: &str) {
        self.tables.remove(table_id);
    }

    /// Returns a copy of a table's schema.
    pub fn schema(&self, table_id: &str) -> Option<TableSchema> {
        self.tables.get(table_id).map(|t| t.schema.clone())
    }

    /// Returns a copy of one column of a registered table.
    pub fn column(&self, table_id: &str, column_key: &str) -> Option<ColumnDefinition> {
        self.tables
            .get(table_id)
            .and_then(|t| t.schema.column(column_key).cloned())
    }

    /// Returns the ids of all registered tables, sorted.
    pub fn table_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.tables.iter().map(|t| t.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Returns `true` if the table has a row with this primary-key value.
    pub fn contains(&self, table_id: &str, id: &str) -> bool {
        self.tables
            .get(table_id)
            .is_some_and(|t| t.find_row(id).is_some())
    }

    /// Resolves a reference value to its display label.
    ///
    /// Returns the raw value when `display_column` is unset, the table is
    /// unknown, the row is missing, or the display field is absent.
    pub fn resolve(&self, table_id: &str, value: &Value, display_column: Option<&str>) -> String {
        let raw = value.key_string();
        let Some(display_column) = display_column else {
            return raw;
        };
        let Some(table) = self.tables.get(table_id) else {
            log::debug!("reference to unknown table '{}'", table_id);
            return raw;
        };
        match table.find_row(&raw).and_then(|row| row.get(display_column)) {
            Some(label) if !label.is_null() => label.key_string(),
            _ => raw,
        }
    }

    /// Lists the rows of a table as selector options, in row order.
    pub fn options(&self, table_id: &str, display_column: Option<&str>) -> Vec<SelectOption> {
        let Some(table) = self.tables.get(table_id) else {
            return Vec::new();
        };
        let Some(pk) = table.primary_key() else {
            return Vec::new();
        };
        table
            .rows
            .iter()
            .map(|row| {
                let value = row.value(&pk).clone();
                let label = display_column
                    .and_then(|c| row.get(c))
                    .filter(|v| !v.is_null())
                    .map(Value::key_string)
                    .unwrap_or_else(|| value.key_string());
                SelectOption { value, label }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    fn catalog() -> TableCatalog {
        let schema = TableSchema::new(
            "lender",
            "Lenders",
            vec![
                ColumnDefinition::new("l1", "lender_id", "ID", ColumnType::String),
                ColumnDefinition::new("l2", "name", "Name", ColumnType::String),
            ],
        );
        let catalog = TableCatalog::new();
        catalog.insert(ReferencedTable::new(
            schema,
            vec![
                Row::new().set("lender_id", "L-1").set("name", "Ally Bank"),
                Row::new().set("lender_id", "L-2").set("name", Value::Null),
            ],
        ));
        catalog
    }

    #[test]
    fn test_resolve_label() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("lender", &Value::from("L-1"), Some("name")), "Ally Bank");
    }

    #[test]
    fn test_resolve_degrades_to_raw_value() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("lender", &Value::from("L-999"), Some("name")), "L-999");
        assert_eq!(catalog.resolve("lender", &Value::from("L-1"), None), "L-1");
        assert_eq!(catalog.resolve("missing", &Value::from("L-1"), Some("name")), "L-1");
        assert_eq!(catalog.resolve("lender", &Value::from("L-2"), Some("name")), "L-2");
        assert_eq!(catalog.resolve("lender", &Value::from("L-1"), Some("nope")), "L-1");
    }

    #[test]
    fn test_options_and_contains() {
        let catalog = catalog();
        let options = catalog.options("lender", Some("name"));
        assert_eq!(
            options,
            vec![SelectOption::new("L-1", "Ally Bank"), SelectOption::new("L-2", "L-2")]
        );
        assert!(catalog.contains("lender", "L-2"));
        assert!(!catalog.contains("lender", "L-3"));
        assert!(catalog.options("missing", None).is_empty());
    }

    #[test]
    fn test_update_rows_breaks_reference_gracefully() {
        let catalog = catalog();
        assert!(catalog.update_rows("lender", Vec::new()));
        assert_eq!(catalog.resolve("lender", &Value::from("L-1"), Some("name")), "L-1");
        assert!(!catalog.update_rows("missing", Vec::new()));
    }
}
