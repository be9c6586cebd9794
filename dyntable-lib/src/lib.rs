//! Schema-driven data grid library
//!
//! Renders, filters, sorts and edits tables whose columns are described at
//! runtime by a [`TableSchema`](model::TableSchema). The host application owns
//! persistence and is reached through the [`GridHost`](host::GridHost) trait.

pub mod cell;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod host;
pub mod model;
pub mod query;
pub mod reference;
pub mod rows;
pub mod schema_editor;

pub use config::GridConfig;
pub use error::Error;
pub use grid::DynamicTable;
pub use host::GridHost;
