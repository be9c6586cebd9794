//! Pagination error types

/// Errors raised when navigating between display pages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Requested page is outside `1..=total_pages`.
    #[error("Page {page} out of range (1..={total_pages})")]
    OutOfRange { page: usize, total_pages: usize },
}
