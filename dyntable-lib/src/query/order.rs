//! Multi-column sort specification.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::TableSchema;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, no before yes).
    Asc,
    /// Descending order (Z-A, 9-0, yes before no).
    Desc,
}

/// One `(column, direction)` pair of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub column_key: String,
    pub direction: SortDirection,
}

/// Ordered sort entries; the first entry is the primary sort key.
///
/// Toggling cycles a column through `none → asc → desc → none`. A column
/// entering `asc` is appended with the lowest priority.
///
/// # Example
///
/// ```
/// use dyntable_lib::query::{SortDirection, SortSpec};
///
/// let mut sorts = SortSpec::new();
/// sorts.toggle_sort("term");
/// sorts.toggle_sort("rate");
/// sorts.toggle_sort("term");
///
/// assert_eq!(sorts.get_sort("term"), Some((SortDirection::Desc, 0)));
/// assert_eq!(sorts.get_sort("rate"), Some((SortDirection::Asc, 1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    entries: Vec<SortEntry>,
}

impl SortSpec {
    /// Creates an empty sort specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances a column through `none → asc → desc → none`.
    pub fn toggle_sort(&mut self, column_key: &str) {
        match self.entries.iter().position(|e| e.column_key == column_key) {
            None => self.entries.push(SortEntry {
                column_key: column_key.to_string(),
                direction: SortDirection::Asc,
            }),
            Some(index) => match self.entries[index].direction {
                SortDirection::Asc => self.entries[index].direction = SortDirection::Desc,
                SortDirection::Desc => {
                    self.entries.remove(index);
                }
            },
        }
    }

    /// Removes every entry.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Returns the direction and priority (0 = primary) of a column.
    pub fn get_sort(&self, column_key: &str) -> Option<(SortDirection, usize)> {
        self.entries
            .iter()
            .position(|e| e.column_key == column_key)
            .map(|index| (self.entries[index].direction, index))
    }

    /// Returns the entries in priority order.
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Returns `true` if no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries on columns the schema no longer has.
    ///
    /// Returns the keys that were dropped.
    pub fn retain_columns(&mut self, schema: &TableSchema) -> Vec<String> {
        let mut dropped = Vec::new();
        self.entries.retain(|e| {
            let keep = schema.has_key(&e.column_key);
            if !keep {
                dropped.push(e.column_key.clone());
            }
            keep
        });
        dropped
    }
}

/// Sorts rows in place by the entries of `sorts`.
///
/// Entries on unknown or non-sortable columns are skipped. The sort is
/// stable: rows equal on every entry keep their input order.
pub fn sort_rows(rows: &mut [Row], sorts: &SortSpec, schema: &TableSchema) {
    let keys: Vec<(&str, SortDirection)> = sorts
        .entries()
        .iter()
        .filter(|e| schema.column(&e.column_key).is_some_and(|c| c.sortable))
        .map(|e| (e.column_key.as_str(), e.direction))
        .collect();

    if keys.is_empty() {
        return;
    }

    rows.sort_by(|a, b| compare_rows(a, b, &keys));
}

fn compare_rows(a: &Row, b: &Row, keys: &[(&str, SortDirection)]) -> Ordering {
    for (key, direction) in keys {
        let ordering = a.value(key).compare(b.value(key));
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
