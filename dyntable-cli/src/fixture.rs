//! JSON fixture loading

use std::path::Path;
use std::sync::Arc;

use dyntable_lib::DynamicTable;
use dyntable_lib::GridConfig;
use dyntable_lib::model::Row;
use dyntable_lib::model::TableSchema;
use dyntable_lib::reference::ReferencedTable;
use dyntable_lib::reference::TableCatalog;
use dyntable_lib::rows::RowTemplate;
use serde::Deserialize;

use crate::error::CliError;

/// A table snapshot plus everything needed to display it.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub schema: TableSchema,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub config: GridConfig,
    #[serde(default)]
    pub template: Option<RowTemplate>,
    #[serde(default)]
    pub references: Vec<ReferenceFixture>,
}

/// A referenced table.
#[derive(Debug, Deserialize)]
pub struct ReferenceFixture {
    pub schema: TableSchema,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a grid over the fixture's table.
    pub fn into_grid(self) -> DynamicTable {
        let catalog = TableCatalog::new();
        for reference in self.references {
            catalog.insert(ReferencedTable::new(reference.schema, reference.rows));
        }
        let total = self.rows.len();

        let grid = DynamicTable::new(self.schema, self.rows)
            .with_config(self.config)
            .with_catalog(Arc::new(catalog))
            .with_page(total, 1);
        match self.template {
            Some(template) => grid.with_template(template),
            None => grid,
        }
    }
}
