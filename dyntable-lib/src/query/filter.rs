//! Per-column filters.

use serde::Deserialize;
use serde::Serialize;

use crate::config::StringMatch;
use crate::model::ColumnDefinition;
use crate::model::ColumnType;
use crate::model::Row;
use crate::model::TableSchema;
use crate::model::Value;

/// A filter on one column. The operator is implied by the column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Key of the filtered column.
    pub column_key: String,
    /// Value to match.
    pub value: Value,
}

impl FilterSpec {
    /// Creates a new filter.
    pub fn new(column_key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column_key: column_key.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if the row's cell satisfies this filter.
    pub fn matches(&self, row: &Row, column: &ColumnDefinition, string_match: StringMatch) -> bool {
        let cell = row.value(&column.key);
        match column.column_type {
            ColumnType::String => {
                let needle = self.value.key_string();
                let text = cell.key_string();
                match string_match {
                    StringMatch::Contains => text.contains(&needle),
                    StringMatch::Exact => text == needle,
                }
            }
            ColumnType::Number => match (&self.value, cell) {
                (Value::Number(want), Value::Number(have)) => want == have,
                (Value::String(want), Value::Number(have)) => {
                    want.trim().parse::<f64>().is_ok_and(|want| want == *have)
                }
                (want, have) => want == have,
            },
            ColumnType::Boolean => match (&self.value, cell) {
                (Value::Bool(want), Value::Bool(have)) => want == have,
                (Value::String(want), Value::Bool(have)) => want.parse::<bool>().is_ok_and(|want| want == *have),
                (want, have) => want == have,
            },
        }
    }
}

/// The active filters of a grid, at most one per column.
///
/// Iteration follows insertion order. Replacing a filter keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: Vec<FilterSpec>,
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter, replacing any existing filter on the same column.
    pub fn add_filter(&mut self, spec: FilterSpec) {
        match self.filters.iter_mut().find(|f| f.column_key == spec.column_key) {
            Some(existing) => *existing = spec,
            None => self.filters.push(spec),
        }
    }

    /// Removes the filter on a column, returning it.
    pub fn remove_filter(&mut self, column_key: &str) -> Option<FilterSpec> {
        let index = self.filters.iter().position(|f| f.column_key == column_key)?;
        Some(self.filters.remove(index))
    }

    /// Removes every filter.
    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    /// Returns the filter on a column.
    pub fn get_filter(&self, column_key: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.column_key == column_key)
    }

    /// Iterates over filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterSpec> {
        self.filters.iter()
    }

    /// Returns the number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Drops filters on columns the schema no longer has.
    ///
    /// Returns the keys that were dropped.
    pub fn retain_columns(&mut self, schema: &TableSchema) -> Vec<String> {
        let mut dropped = Vec::new();
        self.filters.retain(|f| {
            let keep = schema.has_key(&f.column_key);
            if !keep {
                dropped.push(f.column_key.clone());
            }
            keep
        });
        dropped
    }
}

/// Returns the rows matching every filter, in input order.
///
/// Filters on columns missing from the schema are ignored. With no
/// applicable filter the result equals the input.
pub fn filter_rows(rows: &[Row], filters: &FilterSet, schema: &TableSchema, string_match: StringMatch) -> Vec<Row> {
    let active: Vec<(&FilterSpec, &ColumnDefinition)> = filters
        .iter()
        .filter_map(|f| schema.column(&f.column_key).map(|c| (f, c)))
        .collect();

    rows.iter()
        .filter(|row| active.iter().all(|(f, c)| f.matches(row, c, string_match)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TableSchema {
        TableSchema::new(
            "deals",
            "Deals",
            vec![
                ColumnDefinition::new("c1", "id", "ID", ColumnType::String),
                ColumnDefinition::new("c2", "lender", "Lender", ColumnType::String),
                ColumnDefinition::new("c3", "term", "Term", ColumnType::Number),
                ColumnDefinition::new("c4", "approved", "Approved", ColumnType::Boolean),
            ],
        )
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().set("id", "D1").set("lender", "Ally Bank").set("term", 36).set("approved", true),
            Row::new().set("id", "D2").set("lender", "Chase").set("term", 48).set("approved", false),
            Row::new().set("id", "D3").set("lender", "ally").set("term", 36).set("approved", false),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.id("id")).collect()
    }

    #[test]
    fn test_add_replaces_in_place() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("lender", "Ally"));
        filters.add_filter(FilterSpec::new("term", 36));
        filters.add_filter(FilterSpec::new("lender", "Chase"));

        let keys: Vec<_> = filters.iter().map(|f| f.column_key.as_str()).collect();
        assert_eq!(keys, vec!["lender", "term"]);
        assert_eq!(filters.get_filter("lender").unwrap().value, Value::from("Chase"));
    }

    #[test]
    fn test_string_contains_is_case_sensitive() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("lender", "Ally"));
        let result = filter_rows(&rows(), &filters, &schema(), StringMatch::Contains);
        assert_eq!(ids(&result), vec!["D1"]);
    }

    #[test]
    fn test_string_exact_policy() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("lender", "Ally"));
        assert!(filter_rows(&rows(), &filters, &schema(), StringMatch::Exact).is_empty());

        filters.add_filter(FilterSpec::new("lender", "Chase"));
        let result = filter_rows(&rows(), &filters, &schema(), StringMatch::Exact);
        assert_eq!(ids(&result), vec!["D2"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("term", 36));
        filters.add_filter(FilterSpec::new("approved", false));
        let result = filter_rows(&rows(), &filters, &schema(), StringMatch::Contains);
        assert_eq!(ids(&result), vec!["D3"]);
    }

    #[test]
    fn test_number_filter_accepts_text_value() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("term", "48"));
        let result = filter_rows(&rows(), &filters, &schema(), StringMatch::Contains);
        assert_eq!(ids(&result), vec!["D2"]);

        filters.add_filter(FilterSpec::new("term", "forty"));
        assert!(filter_rows(&rows(), &filters, &schema(), StringMatch::Contains).is_empty());
    }

    #[test]
    fn test_empty_filter_set_is_identity() {
        let result = filter_rows(&rows(), &FilterSet::new(), &schema(), StringMatch::Contains);
        assert_eq!(result, rows());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("term", 36));
        let once = filter_rows(&rows(), &filters, &schema(), StringMatch::Contains);
        let twice = filter_rows(&once, &filters, &schema(), StringMatch::Contains);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_column_is_ignored() {
        let mut filters = FilterSet::new();
        filters.add_filter(FilterSpec::new("removed", "anything"));
        let result = filter_rows(&rows(), &filters, &schema(), StringMatch::Contains);
        assert_eq!(result.len(), 3);

        assert_eq!(filters.retain_columns(&schema()), vec!["removed".to_string()]);
        assert!(filters.is_empty());
    }
}
