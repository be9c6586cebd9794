//! Runtime column management.
//!
//! Every operation validates first and returns a new [`TableSchema`]; a
//! rejected operation leaves the caller's schema untouched. Purging filters
//! and sorts on removed columns is done by
//! [`DynamicTable::apply_schema`](crate::grid::DynamicTable::apply_schema).

mod update;

pub use update::ColumnUpdate;

use uuid::Uuid;

use crate::error::SchemaError;
use crate::model::ColumnDefinition;
use crate::model::ColumnDirection;
use crate::model::Row;
use crate::model::TableSchema;
use crate::reference::TableCatalog;

/// Where a column lands in the display order.
///
/// `After(i)` is the divider between column `i` and column `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// Before the first column.
    Start,
    /// Directly after the column at this index.
    After(usize),
    /// After the last column.
    End,
}

/// A column to add to a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum NewColumn {
    /// A column described in full. An empty `id` is replaced by a fresh one.
    Defined(ColumnDefinition),
    /// A read-only column mirroring a column of another table.
    Reference {
        source_table: Option<String>,
        source_column: Option<String>,
        name: Option<String>,
    },
}

impl NewColumn {
    /// Creates a reference column request.
    pub fn reference(source_table: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self::Reference {
            source_table: Some(source_table.into()),
            source_column: Some(source_column.into()),
            name: None,
        }
    }
}

/// Validating column editor for one schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEditor<'a> {
    schema: &'a TableSchema,
    rows: &'a [Row],
    catalog: &'a TableCatalog,
}

impl<'a> SchemaEditor<'a> {
    /// Creates an editor. `rows` is used to resolve the primary key.
    pub fn new(schema: &'a TableSchema, rows: &'a [Row], catalog: &'a TableCatalog) -> Self {
        Self { schema, rows, catalog }
    }

    /// Inserts a new column at the given divider.
    pub fn add_column(&self, column: NewColumn, at: InsertAt) -> Result<TableSchema, SchemaError> {
        let mut column = match column {
            NewColumn::Defined(column) => column,
            NewColumn::Reference {
                source_table,
                source_column,
                name,
            } => self.reference_column(source_table, source_column, name)?,
        };
        column.name = column.name.trim().to_string();
        column.key = column.key.trim().to_string();
        if column.id.is_empty() {
            column.id = Uuid::new_v4().to_string();
        }
        column.normalize();

        validate_name_and_key(&column)?;
        if self.schema.has_key(&column.key) {
            return Err(SchemaError::duplicate_key(&column.key));
        }

        let index = self.insert_index(at)?;
        let mut columns = self.schema.columns().to_vec();
        log::info!(
            "adding column '{}' to '{}' at position {}",
            column.key,
            self.schema.id(),
            index
        );
        columns.insert(index, column);
        self.keep_primary_key(self.schema.with_columns(columns))
    }

    /// Removes a column. The primary key cannot be removed.
    pub fn remove_column(&self, column_id: &str) -> Result<TableSchema, SchemaError> {
        let column = self.find(column_id)?;
        if self.schema.is_primary_key(&column.key, self.rows) {
            return Err(SchemaError::PrimaryKeyRemoval {
                key: column.key.clone(),
            });
        }

        log::info!("removing column '{}' from '{}'", column.key, self.schema.id());
        let columns = self
            .schema
            .columns()
            .iter()
            .filter(|c| c.id != column_id)
            .cloned()
            .collect();
        Ok(self.schema.with_columns(columns))
    }

    /// Merges a partial update into a column.
    pub fn update_column(&self, column_id: &str, update: ColumnUpdate) -> Result<TableSchema, SchemaError> {
        let current = self.find(column_id)?;
        let updated = update.apply(current);

        validate_name_and_key(&updated)?;
        if updated.key != current.key {
            if self.schema.is_primary_key(&current.key, self.rows) {
                return Err(SchemaError::PrimaryKeyRename {
                    key: current.key.clone(),
                });
            }
            if self.schema.has_key(&updated.key) {
                return Err(SchemaError::duplicate_key(&updated.key));
            }
        }

        let columns = self
            .schema
            .columns()
            .iter()
            .map(|c| if c.id == column_id { updated.clone() } else { c.clone() })
            .collect();
        self.keep_primary_key(self.schema.with_columns(columns))
    }

    /// Moves a column to another divider.
    pub fn move_column(&self, column_id: &str, at: InsertAt) -> Result<TableSchema, SchemaError> {
        let moving = self.find(column_id)?.clone();
        let anchor = match at {
            InsertAt::After(index) => Some(
                self.schema
                    .columns()
                    .get(index)
                    .map(|c| c.id.clone())
                    .ok_or(SchemaError::PositionOutOfRange {
                        index,
                        len: self.schema.len(),
                    })?,
            ),
            InsertAt::Start | InsertAt::End => None,
        };
        if anchor.as_deref() == Some(column_id) {
            return Ok(self.schema.clone());
        }

        let mut columns: Vec<_> = self
            .schema
            .columns()
            .iter()
            .filter(|c| c.id != column_id)
            .cloned()
            .collect();
        let index = match (at, anchor) {
            (InsertAt::Start, _) => 0,
            (InsertAt::End, _) => columns.len(),
            (InsertAt::After(_), Some(anchor)) => columns
                .iter()
                .position(|c| c.id == anchor)
                .map_or(columns.len(), |p| p + 1),
            (InsertAt::After(_), None) => columns.len(),
        };
        columns.insert(index, moving);
        self.keep_primary_key(self.schema.with_columns(columns))
    }

    /// Rejects `next` when it resolves a different primary key.
    fn keep_primary_key(&self, next: TableSchema) -> Result<TableSchema, SchemaError> {
        let Some(current) = self.schema.primary_key(self.rows) else {
            return Ok(next);
        };
        match next.primary_key(self.rows) {
            Some(candidate) if candidate != current => {
                log::warn!(
                    "rejected change to '{}': '{}' would replace '{}' as the primary key",
                    self.schema.id(),
                    candidate,
                    current
                );
                Err(SchemaError::PrimaryKeyConflict { current, candidate })
            }
            _ => Ok(next),
        }
    }

    fn find(&self, column_id: &str) -> Result<&'a ColumnDefinition, SchemaError> {
        self.schema
            .column_by_id(column_id)
            .ok_or_else(|| SchemaError::column_not_found(column_id))
    }

    fn insert_index(&self, at: InsertAt) -> Result<usize, SchemaError> {
        match at {
            InsertAt::Start => Ok(0),
            InsertAt::End => Ok(self.schema.len()),
            InsertAt::After(index) if index < self.schema.len() => Ok(index + 1),
            InsertAt::After(index) => Err(SchemaError::PositionOutOfRange {
                index,
                len: self.schema.len(),
            }),
        }
    }

    fn reference_column(
        &self,
        source_table: Option<String>,
        source_column: Option<String>,
        name: Option<String>,
    ) -> Result<ColumnDefinition, SchemaError> {
        let non_empty = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let (Some(table), Some(column_key)) = (non_empty(source_table), non_empty(source_column)) else {
            return Err(SchemaError::IncompleteReference);
        };

        if self.catalog.schema(&table).is_none() {
            return Err(SchemaError::UnknownSourceTable { table });
        }
        let Some(source) = self.catalog.column(&table, &column_key) else {
            return Err(SchemaError::UnknownSourceColumn {
                table,
                column: column_key,
            });
        };

        let key = format!("{table}_{column_key}");
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| source.name.clone());
        Ok(ColumnDefinition::new("", key, name, source.column_type)
            .direction(ColumnDirection::Output)
            .sortable(source.sortable)
            .references(table, Some(column_key.as_str())))
    }
}

fn validate_name_and_key(column: &ColumnDefinition) -> Result<(), SchemaError> {
    if column.name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if column.key.trim().is_empty() {
        return Err(SchemaError::EmptyKey);
    }
    Ok(())
}
