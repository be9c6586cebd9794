//! In-memory host backed by concurrent maps

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;

use super::GridHost;
use crate::error::PersistError;
use crate::model::Row;
use crate::model::TableSchema;
use crate::model::Value;

/// A [`GridHost`] that keeps everything in memory.
///
/// Records the latest snapshots it was given and stores saved cells in a
/// concurrent map. Saves can be made to fail, globally or per cell.
///
/// # Example
///
/// ```
/// use dyntable_lib::host::InMemoryHost;
///
/// let host = InMemoryHost::new();
/// host.fail_cell("D1", "term", "locked by underwriting");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryHost {
    cells: DashMap<(String, String), Value>,
    failures: DashMap<(String, String), String>,
    fail_all: Mutex<Option<String>>,
    rows: Mutex<Option<Vec<Row>>>,
    schema: Mutex<Option<TableSchema>>,
    selection: Mutex<Vec<String>>,
    pages: Mutex<Vec<usize>>,
    edit_requests: Mutex<Vec<String>>,
    save_calls: AtomicUsize,
}

impl InMemoryHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every save fail with the given message until cleared.
    pub fn fail_saves(&self, message: impl Into<String>) {
        *lock(&self.fail_all) = Some(message.into());
    }

    /// Makes saves of one cell fail with the given message.
    pub fn fail_cell(&self, row_id: impl Into<String>, column_key: impl Into<String>, message: impl Into<String>) {
        self.failures
            .insert((row_id.into(), column_key.into()), message.into());
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        self.failures.clear();
        *lock(&self.fail_all) = None;
    }

    /// Returns the persisted value of a cell.
    pub fn saved(&self, row_id: &str, column_key: &str) -> Option<Value> {
        self.cells
            .get(&(row_id.to_string(), column_key.to_string()))
            .map(|v| v.value().clone())
    }

    /// Returns the number of save calls, failed ones included.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Returns the last reported row collection.
    pub fn rows(&self) -> Option<Vec<Row>> {
        lock(&self.rows).clone()
    }

    /// Returns the last reported schema.
    pub fn schema(&self) -> Option<TableSchema> {
        lock(&self.schema).clone()
    }

    /// Returns the last reported selection.
    pub fn selection(&self) -> Vec<String> {
        lock(&self.selection).clone()
    }

    /// Returns every requested page, in order.
    pub fn pages(&self) -> Vec<usize> {
        lock(&self.pages).clone()
    }

    /// Returns every row id sent to the row editor, in order.
    pub fn edit_requests(&self) -> Vec<String> {
        lock(&self.edit_requests).clone()
    }
}

/// Locks a recording slot, recovering it if a holder panicked.
fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl GridHost for InMemoryHost {
    fn on_data_change(&self, rows: &[Row]) {
        *lock(&self.rows) = Some(rows.to_vec());
    }

    fn on_schema_change(&self, schema: &TableSchema) {
        *lock(&self.schema) = Some(schema.clone());
    }

    fn on_selection_change(&self, selected: &[String]) {
        *lock(&self.selection) = selected.to_vec();
    }

    async fn save_cell(&self, row_id: &str, column_key: &str, value: &Value) -> Result<(), PersistError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);

        let global = lock(&self.fail_all).clone();
        if let Some(message) = global {
            return Err(PersistError::unavailable(message));
        }
        let cell = (row_id.to_string(), column_key.to_string());
        if let Some(message) = self.failures.get(&cell) {
            return Err(PersistError::rejected(message.value().clone()));
        }

        self.cells.insert(cell, value.clone());
        Ok(())
    }

    fn on_page_change(&self, page: usize) {
        lock(&self.pages).push(page);
    }

    fn on_edit_row(&self, row_id: &str, _row: &Row) {
        lock(&self.edit_requests).push(row_id.to_string());
    }
}
