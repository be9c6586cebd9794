//! Host contract.
//!
//! The grid owns no durable state. Every change is reported to a
//! [`GridHost`], which stores it and supplies the next snapshot.

mod memory;

pub use memory::InMemoryHost;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::model::Row;
use crate::model::TableSchema;
use crate::model::Value;

/// Callbacks a host application supplies to a grid.
///
/// Snapshot callbacks always receive the complete new collection.
///
/// # Example
///
/// ```ignore
/// struct ApiHost { client: LeaseApi }
///
/// #[async_trait]
/// impl GridHost for ApiHost {
///     fn on_data_change(&self, rows: &[Row]) { self.client.queue_rows(rows) }
///     fn on_schema_change(&self, schema: &TableSchema) { self.client.queue_schema(schema) }
///     fn on_selection_change(&self, _selected: &[String]) {}
///     async fn save_cell(&self, row_id: &str, key: &str, value: &Value) -> Result<(), PersistError> {
///         self.client.patch(row_id, key, value).await.map_err(|e| PersistError::rejected(e.to_string()))
///     }
///     fn on_page_change(&self, page: usize) { self.client.load_page(page) }
/// }
/// ```
#[async_trait]
pub trait GridHost: Send + Sync {
    /// Receives the new row collection after any row mutation.
    fn on_data_change(&self, rows: &[Row]);

    /// Receives the new schema after any column mutation.
    fn on_schema_change(&self, schema: &TableSchema);

    /// Receives the new set of selected row ids.
    fn on_selection_change(&self, selected: &[String]);

    /// Persists one cell. Runs to completion; the grid never cancels it.
    async fn save_cell(&self, row_id: &str, column_key: &str, value: &Value) -> Result<(), PersistError>;

    /// Receives a page navigation request.
    fn on_page_change(&self, page: usize);

    /// Receives a request to open a row in a full editor.
    fn on_edit_row(&self, _row_id: &str, _row: &Row) {}
}
