//! CLI error types

use dyntable_lib::error::EditError;
use dyntable_lib::error::PageError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read fixture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Grid(#[from] dyntable_lib::Error),
}

impl From<EditError> for CliError {
    fn from(err: EditError) -> Self {
        Self::Grid(err.into())
    }
}

impl From<PageError> for CliError {
    fn from(err: PageError) -> Self {
        Self::Grid(err.into())
    }
}

impl CliError {
    /// Process exit code: 2 for rejected input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Grid(err) if err.is_validation() => 2,
            _ => 1,
        }
    }
}
