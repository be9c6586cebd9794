//! Persistence error types

/// Errors reported by the host when it fails to persist a change.
///
/// The grid never retries; the message is surfaced to the user who is
/// expected to retry the action manually.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    /// The storage collaborator refused the change.
    #[error("Save rejected: {message}")]
    Rejected { message: String },

    /// The storage collaborator could not be reached.
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl PersistError {
    /// Creates a new rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
