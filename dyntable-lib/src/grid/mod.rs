//! The schema-driven grid.
//!
//! [`DynamicTable`] ties the engines together: it holds the current
//! schema and row snapshot, the filter/sort/selection/edit state, and reports
//! every change to a [`GridHost`] and the [`EventBus`].
//!
//! # Example
//!
//! ```
//! use dyntable_lib::grid::DynamicTable;
//! use dyntable_lib::host::InMemoryHost;
//! use dyntable_lib::model::{ColumnDefinition, ColumnType, Row, TableSchema};
//! use dyntable_lib::query::FilterSpec;
//!
//! # tokio_test_block(async {
//! let schema = TableSchema::new("deals", "Deals", vec![
//!     ColumnDefinition::new("c1", "id", "ID", ColumnType::String),
//!     ColumnDefinition::new("c2", "term", "Term", ColumnType::Number),
//! ]);
//! let rows = vec![
//!     Row::new().set("id", "D1").set("term", 36),
//!     Row::new().set("id", "D2").set("term", 48),
//! ];
//! let host = InMemoryHost::new();
//! let mut grid = DynamicTable::new(schema, rows);
//!
//! grid.add_filter(FilterSpec::new("term", 48));
//! assert_eq!(grid.visible_rows().len(), 1);
//!
//! grid.begin_edit("D2", "term")?;
//! grid.stage_input("60")?;
//! grid.save_edit(&host).await?;
//! assert_eq!(host.saved("D2", "term"), Some(60.into()));
//! # Ok::<(), dyntable_lib::error::EditError>(())
//! # }).unwrap();
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod page;

pub use page::PageInfo;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use crate::cell;
use crate::cell::CellView;
use crate::cell::EditControl;
use crate::cell::EditSession;
use crate::cell::PendingSave;
use crate::cell::SaveState;
use crate::config::GridConfig;
use crate::error::EditError;
use crate::error::PageError;
use crate::error::PersistError;
use crate::error::RowError;
use crate::error::SchemaError;
use crate::events::EventBus;
use crate::events::GridEvent;
use crate::events::NoticeLevel;
use crate::host::GridHost;
use crate::model::ColumnDefinition;
use crate::model::ColumnDirection;
use crate::model::Row;
use crate::model::TableSchema;
use crate::model::Value;
use crate::query;
use crate::query::FilterSet;
use crate::query::FilterSpec;
use crate::query::SortDirection;
use crate::query::SortSpec;
use crate::reference::TableCatalog;
use crate::rows::RowLifecycle;
use crate::rows::RowTemplate;
use crate::schema_editor::ColumnUpdate;
use crate::schema_editor::InsertAt;
use crate::schema_editor::NewColumn;
use crate::schema_editor::SchemaEditor;

type CellKey = (String, String);

/// A live, schema-driven table.
///
/// Removing a column purges filters, sorts and an open edit on that column
/// here, in [`apply_schema`](Self::apply_schema). The pure engines also
/// ignore unknown columns, so a stale entry can never break a render.
pub struct DynamicTable {
    schema: TableSchema,
    rows: Vec<Row>,
    selection: Vec<String>,
    filters: FilterSet,
    sorts: SortSpec,
    edit: Option<EditSession>,
    pending: HashMap<CellKey, PendingSave>,
    page: PageInfo,
    template: Option<RowTemplate>,
    config: GridConfig,
    catalog: Arc<TableCatalog>,
    events: EventBus,
    shared_events: bool,
}

impl DynamicTable {
    /// Creates a grid over a schema and row snapshot with default config.
    pub fn new(schema: TableSchema, rows: Vec<Row>) -> Self {
        let config = GridConfig::default();
        let page = PageInfo::new(rows.len(), config.page_size, 1);
        let events = EventBus::new(config.event_capacity);
        Self {
            schema,
            rows,
            selection: Vec::new(),
            filters: FilterSet::new(),
            sorts: SortSpec::new(),
            edit: None,
            pending: HashMap::new(),
            page,
            template: None,
            config,
            catalog: Arc::new(TableCatalog::new()),
            events,
            shared_events: false,
        }
    }

    /// Replaces the configuration. The owned event bus is resized from it; a
    /// bus set with [`with_event_bus`](Self::with_event_bus) is kept.
    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.page = PageInfo::new(self.page.total_count(), config.page_size, self.page.current_page());
        if !self.shared_events {
            self.events = EventBus::new(config.event_capacity);
        }
        self.config = config;
        self
    }

    /// Shares a catalog of referenced tables.
    pub fn with_catalog(mut self, catalog: Arc<TableCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the new-row template for this schema.
    pub fn with_template(mut self, template: RowTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Shares an application-wide event bus.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self.shared_events = true;
        self
    }

    /// Sets the host-supplied pagination parameters.
    pub fn with_page(mut self, total_count: usize, current_page: usize) -> Self {
        self.page = PageInfo::new(total_count, self.config.page_size, current_page);
        self
    }

    // =========================================================================
    // Snapshot accessors
    // =========================================================================

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sorts(&self) -> &SortSpec {
        &self.sorts
    }

    pub fn page(&self) -> PageInfo {
        self.page
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<TableCatalog> {
        &self.catalog
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the open edit session, if any.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Returns the saves still waiting on the host.
    pub fn pending_saves(&self) -> impl Iterator<Item = &PendingSave> {
        self.pending.values()
    }

    /// Returns the resolved primary-key field.
    pub fn primary_key(&self) -> Option<String> {
        self.schema.primary_key(&self.rows)
    }

    /// Returns the displayed rows: filtered, then sorted.
    pub fn visible_rows(&self) -> Vec<Row> {
        query::view_rows(
            &self.rows,
            &self.schema,
            &self.filters,
            &self.sorts,
            self.config.string_match,
        )
    }

    /// Returns the row with the given primary-key value.
    pub fn row(&self, row_id: &str) -> Option<&Row> {
        let pk = self.primary_key()?;
        self.rows.iter().find(|r| r.id(&pk) == row_id)
    }

    // =========================================================================
    // Host snapshots
    // =========================================================================

    /// Accepts a new row snapshot from the host.
    ///
    /// Selected ids and an open edit whose row disappeared are dropped.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let Some(pk) = self.primary_key() else {
            self.selection.clear();
            self.discard_edit();
            return;
        };
        let ids: std::collections::HashSet<String> = self.rows.iter().map(|r| r.id(&pk)).collect();
        self.selection.retain(|id| ids.contains(id));
        if self.edit.as_ref().is_some_and(|e| !ids.contains(e.row_id())) {
            self.discard_edit();
        }
    }

    /// Accepts a new schema, purging state on columns it no longer has.
    pub fn apply_schema(&mut self, schema: TableSchema) {
        self.schema = schema;
        let dropped_filters = self.filters.retain_columns(&self.schema);
        let dropped_sorts = self.sorts.retain_columns(&self.schema);
        if !dropped_filters.is_empty() || !dropped_sorts.is_empty() {
            log::debug!(
                "purged filters {:?} and sorts {:?} on removed columns of '{}'",
                dropped_filters,
                dropped_sorts,
                self.schema.id()
            );
        }
        if self.edit.as_ref().is_some_and(|e| !self.is_editable(e.column_key())) {
            self.discard_edit();
        }
    }

    /// Updates pagination after the host loaded a page.
    pub fn set_page(&mut self, total_count: usize, current_page: usize) {
        self.page = PageInfo::new(total_count, self.config.page_size, current_page);
    }

    // =========================================================================
    // Filters and sorts
    // =========================================================================

    /// Sets the filter on a column, replacing any existing one.
    pub fn add_filter(&mut self, spec: FilterSpec) {
        self.filters.add_filter(spec);
    }

    /// Removes the filter on a column.
    pub fn remove_filter(&mut self, column_key: &str) -> Option<FilterSpec> {
        self.filters.remove_filter(column_key)
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
    }

    pub fn get_filter(&self, column_key: &str) -> Option<&FilterSpec> {
        self.filters.get_filter(column_key)
    }

    /// Advances a column's sort state. Unknown or unsortable columns are ignored.
    pub fn toggle_sort(&mut self, column_key: &str) {
        if self.schema.column(column_key).is_some_and(|c| c.sortable) {
            self.sorts.toggle_sort(column_key);
        }
    }

    pub fn clear_all_sorts(&mut self) {
        self.sorts.clear_all();
    }

    pub fn get_sort(&self, column_key: &str) -> Option<(SortDirection, usize)> {
        self.sorts.get_sort(column_key)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Replaces the selection. Ids not in the snapshot are dropped.
    pub fn set_selection(&mut self, host: &dyn GridHost, ids: Vec<String>) {
        let Some(pk) = self.primary_key() else {
            return;
        };
        let present: Vec<String> = ids
            .into_iter()
            .filter(|id| self.rows.iter().any(|r| &r.id(&pk) == id))
            .collect();
        self.report_selection(host, present);
    }

    /// Selects or deselects one row.
    pub fn toggle_selection(&mut self, host: &dyn GridHost, row_id: &str) {
        let mut next = self.selection.clone();
        match next.iter().position(|id| id == row_id) {
            Some(index) => {
                next.remove(index);
            }
            None if self.row(row_id).is_some() => next.push(row_id.to_string()),
            None => return,
        }
        self.report_selection(host, next);
    }

    /// Selects every row that passes the filters.
    pub fn select_all_visible(&mut self, host: &dyn GridHost) {
        let Some(pk) = self.primary_key() else {
            return;
        };
        let ids = self.visible_rows().iter().map(|r| r.id(&pk)).collect();
        self.report_selection(host, ids);
    }

    pub fn clear_selection(&mut self, host: &dyn GridHost) {
        self.report_selection(host, Vec::new());
    }

    fn report_selection(&mut self, host: &dyn GridHost, selection: Vec<String>) {
        self.selection = selection;
        host.on_selection_change(&self.selection);
        self.events.publish(GridEvent::SelectionChanged {
            table: self.schema.id().to_string(),
            selected: self.selection.clone(),
        });
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Returns `true` if cells of this column can enter edit mode.
    pub fn is_editable(&self, column_key: &str) -> bool {
        self.schema.column(column_key).is_some_and(|c| {
            c.editable && c.direction == ColumnDirection::Input && !self.schema.is_primary_key(&c.key, &self.rows)
        })
    }

    /// Renders the read view of a cell. Unknown columns render empty.
    pub fn render_cell(&self, row: &Row, column_key: &str) -> CellView {
        match self.schema.column(column_key) {
            Some(column) => cell::render_cell(row, column, &self.catalog, &self.config.number_format),
            None => CellView::Empty,
        }
    }

    /// Opens an edit session, discarding any other open session unsaved.
    pub fn begin_edit(&mut self, row_id: &str, column_key: &str) -> Result<(), EditError> {
        if !self.is_editable(column_key) {
            return Err(EditError::not_editable(column_key));
        }
        let original = self
            .row(row_id)
            .map(|r| r.value(column_key).clone())
            .ok_or_else(|| EditError::RowNotFound {
                row_id: row_id.to_string(),
            })?;

        if self.edit.as_ref().is_some_and(|e| !e.is_cell(row_id, column_key)) {
            self.discard_edit();
        }
        self.edit = Some(EditSession::new(row_id, column_key, original));
        Ok(())
    }

    /// Returns the edit control for the open session.
    pub fn edit_control(&self) -> Option<EditControl> {
        let session = self.edit.as_ref()?;
        let column = self.schema.column(session.column_key())?;
        Some(cell::edit_control(session, column, &self.catalog))
    }

    /// Stages raw text input, coerced to the column type.
    pub fn stage_input(&mut self, raw: &str) -> Result<(), EditError> {
        let column = self.edit_column()?;
        let value = cell::coerce_input(column, raw)?;
        let value = cell::validate_value(column, value, &self.catalog)?;
        self.stage(value)
    }

    /// Stages a value from a toggle or selector.
    pub fn stage_value(&mut self, value: Value) -> Result<(), EditError> {
        let column = self.edit_column()?;
        let value = cell::validate_value(column, value, &self.catalog)?;
        self.stage(value)
    }

    /// Closes the open session without touching the row.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        self.edit.take()
    }

    /// Applies the staged value optimistically and marks the save pending.
    ///
    /// The caller persists the value and finishes with
    /// [`complete_save`](Self::complete_save); other cells stay editable
    /// meanwhile. A second save of the same cell is rejected until then.
    pub fn begin_save(&mut self) -> Result<PendingSave, EditError> {
        let session = self.edit.as_ref().ok_or(EditError::NoActiveEdit)?;
        let key: CellKey = (session.row_id().to_string(), session.column_key().to_string());
        if self.pending.contains_key(&key) {
            return Err(EditError::SaveInFlight {
                row_id: key.0,
                column: key.1,
            });
        }
        let previous = self
            .row(session.row_id())
            .map(|r| r.value(session.column_key()).clone())
            .ok_or_else(|| EditError::RowNotFound {
                row_id: session.row_id().to_string(),
            })?;

        let value = session.staged().clone();
        self.edit = None;
        self.replace_cell(&key.0, &key.1, value.clone());

        let pending = PendingSave::new(key.0.clone(), key.1.clone(), previous, value);
        self.pending.insert(key, pending.clone());
        Ok(pending)
    }

    /// Finishes a pending save with the host's result.
    ///
    /// The outcome is recorded on `save`. On failure the previous value is
    /// restored, unless the cell has been changed again since, and the error
    /// is published as a notice.
    pub fn complete_save(
        &mut self,
        save: &mut PendingSave,
        result: Result<(), PersistError>,
    ) -> Result<SaveState, EditError> {
        let key: CellKey = (save.row_id.clone(), save.column_key.clone());
        self.pending.remove(&key);
        let table = self.schema.id().to_string();

        match result {
            Ok(()) => {
                save.state = SaveState::Committed;
                self.events.publish(GridEvent::CellCommitted {
                    table,
                    row_id: save.row_id.clone(),
                    column_key: save.column_key.clone(),
                    value: save.value.clone(),
                });
                Ok(SaveState::Committed)
            }
            Err(err) => {
                save.state = SaveState::RolledBack;
                let untouched = self
                    .row(&save.row_id)
                    .is_some_and(|r| r.value(&save.column_key) == &save.value);
                if untouched {
                    self.replace_cell(&save.row_id, &save.column_key, save.previous.clone());
                }
                log::warn!(
                    "save of '{}' on row '{}' failed, rolled back: {}",
                    save.column_key,
                    save.row_id,
                    err
                );
                self.events.publish(GridEvent::CellRolledBack {
                    table,
                    row_id: save.row_id.clone(),
                    column_key: save.column_key.clone(),
                    restored: save.previous.clone(),
                });
                self.events.publish(GridEvent::error(err.to_string()));
                Err(EditError::Persist(err))
            }
        }
    }

    /// Saves the open session through the host and waits for the result.
    pub async fn save_edit(&mut self, host: &dyn GridHost) -> Result<SaveState, EditError> {
        let mut save = self.begin_save()?;
        let result = host.save_cell(save.row_id(), save.column_key(), save.value()).await;
        self.complete_save(&mut save, result)
    }

    fn edit_column(&self) -> Result<&ColumnDefinition, EditError> {
        let session = self.edit.as_ref().ok_or(EditError::NoActiveEdit)?;
        self.schema
            .column(session.column_key())
            .ok_or_else(|| EditError::ColumnNotFound {
                column: session.column_key().to_string(),
            })
    }

    fn stage(&mut self, value: Value) -> Result<(), EditError> {
        let session = self.edit.as_mut().ok_or(EditError::NoActiveEdit)?;
        session.stage(value);
        Ok(())
    }

    fn discard_edit(&mut self) {
        if let Some(session) = self.edit.take() {
            log::debug!(
                "discarding unsaved edit of '{}' on row '{}'",
                session.column_key(),
                session.row_id()
            );
            self.events.publish(GridEvent::EditDiscarded {
                table: self.schema.id().to_string(),
                row_id: session.row_id().to_string(),
                column_key: session.column_key().to_string(),
            });
        }
    }

    fn replace_cell(&mut self, row_id: &str, column_key: &str, value: Value) {
        let Some(pk) = self.primary_key() else {
            return;
        };
        self.rows = self
            .rows
            .iter()
            .map(|r| if r.id(&pk) == row_id { r.with_value(column_key, value.clone()) } else { r.clone() })
            .collect();
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Appends a new row and reports the new collection.
    pub fn add_row(&mut self, host: &dyn GridHost) -> Result<(), RowError> {
        let result = self.lifecycle().add_row(&self.rows);
        let rows = self.notify_failure(result)?;
        self.report_rows(host, rows);
        Ok(())
    }

    /// Duplicates a row and reports the new collection.
    pub fn copy_row(&mut self, host: &dyn GridHost, row_id: &str) -> Result<(), RowError> {
        let result = self.lifecycle().copy_row(&self.rows, row_id);
        let rows = self.notify_failure(result)?;
        self.report_rows(host, rows);
        Ok(())
    }

    /// Deletes a row, pruning it from the selection.
    pub fn delete_row(&mut self, host: &dyn GridHost, row_id: &str) -> Result<(), RowError> {
        let result = self.lifecycle().delete_row(&self.rows, row_id, &self.selection);
        let deleted = self.notify_failure(result)?;
        if self.edit.as_ref().is_some_and(|e| e.row_id() == row_id) {
            self.discard_edit();
        }
        self.report_rows(host, deleted.rows);
        if deleted.selection_changed {
            self.report_selection(host, deleted.selection);
        }
        Ok(())
    }

    /// Forwards a row to the host's full row editor.
    pub fn request_row_edit(&self, host: &dyn GridHost, row_id: &str) -> Result<(), RowError> {
        let row = self.row(row_id).ok_or_else(|| RowError::not_found(row_id))?;
        host.on_edit_row(row_id, row);
        Ok(())
    }

    fn lifecycle(&self) -> RowLifecycle<'_> {
        RowLifecycle::new(&self.schema, self.template.as_ref())
    }

    fn report_rows(&mut self, host: &dyn GridHost, rows: Vec<Row>) {
        self.rows = rows;
        host.on_data_change(&self.rows);
        self.events.publish(GridEvent::DataChanged {
            table: self.schema.id().to_string(),
            row_count: self.rows.len(),
        });
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Inserts a column at a divider and reports the new schema.
    pub fn add_column(&mut self, host: &dyn GridHost, column: NewColumn, at: InsertAt) -> Result<(), SchemaError> {
        let result = self.editor().add_column(column, at);
        let schema = self.notify_failure(result)?;
        self.report_schema(host, schema);
        Ok(())
    }

    /// Removes a column and reports the new schema.
    pub fn remove_column(&mut self, host: &dyn GridHost, column_id: &str) -> Result<(), SchemaError> {
        let result = self.editor().remove_column(column_id);
        let schema = self.notify_failure(result)?;
        self.report_schema(host, schema);
        Ok(())
    }

    /// Updates a column and reports the new schema.
    pub fn update_column(
        &mut self,
        host: &dyn GridHost,
        column_id: &str,
        update: ColumnUpdate,
    ) -> Result<(), SchemaError> {
        let result = self.editor().update_column(column_id, update);
        let schema = self.notify_failure(result)?;
        self.report_schema(host, schema);
        Ok(())
    }

    /// Moves a column and reports the new schema.
    pub fn move_column(&mut self, host: &dyn GridHost, column_id: &str, at: InsertAt) -> Result<(), SchemaError> {
        let result = self.editor().move_column(column_id, at);
        let schema = self.notify_failure(result)?;
        self.report_schema(host, schema);
        Ok(())
    }

    fn editor(&self) -> SchemaEditor<'_> {
        SchemaEditor::new(&self.schema, &self.rows, &self.catalog)
    }

    fn report_schema(&mut self, host: &dyn GridHost, schema: TableSchema) {
        self.apply_schema(schema);
        host.on_schema_change(&self.schema);
        self.events.publish(GridEvent::SchemaChanged {
            table: self.schema.id().to_string(),
            column_count: self.schema.len(),
        });
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// Requests another page from the host.
    pub fn change_page(&mut self, host: &dyn GridHost, page: usize) -> Result<(), PageError> {
        let result = self.page.go_to(page);
        self.page = self.notify_failure(result)?;
        host.on_page_change(page);
        Ok(())
    }

    /// Publishes a rejected operation as a user-visible warning.
    fn notify_failure<T, E: Display>(&self, result: Result<T, E>) -> Result<T, E> {
        if let Err(err) = &result {
            self.events.publish(GridEvent::Notice {
                level: NoticeLevel::Warning,
                message: err.to_string(),
            });
        }
        result
    }
}
