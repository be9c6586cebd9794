//! Error types

mod edit;
mod page;
mod persist;
mod row;
mod schema;

pub use edit::*;
pub use page::*;
pub use persist::*;
pub use row::*;
pub use schema::*;

/// Any error raised by a grid operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Schema validation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Cell editing failed.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Row lifecycle operation failed.
    #[error(transparent)]
    Row(#[from] RowError),

    /// The host could not persist a change.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Page navigation failed.
    #[error(transparent)]
    Page(#[from] PageError),
}

impl Error {
    /// Returns `true` for errors rejected at the boundary without any mutation.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Persist(_) | Self::Edit(EditError::Persist(_)))
    }
}
