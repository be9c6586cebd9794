//! Display-only pagination state.

use crate::error::PageError;

/// Pagination parameters supplied by the host.
///
/// The grid never decides which rows belong to a page; the host loads the
/// page and passes its rows in. This type only validates navigation and
/// describes the window for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    total_count: usize,
    page_size: usize,
    current_page: usize,
}

impl PageInfo {
    /// Creates page info. `current_page` is 1-based and clamped into range.
    pub fn new(total_count: usize, page_size: usize, current_page: usize) -> Self {
        let mut info = Self {
            total_count,
            page_size: page_size.max(1),
            current_page: 1,
        };
        info.current_page = current_page.clamp(1, info.total_pages());
        info
    }

    /// Returns the total number of rows across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the current 1-based page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the number of pages, at least one.
    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Returns the 1-based first and last row numbers shown on this page.
    pub fn window(&self) -> (usize, usize) {
        if self.total_count == 0 {
            return (0, 0);
        }
        let start = (self.current_page - 1) * self.page_size + 1;
        let end = (self.current_page * self.page_size).min(self.total_count);
        (start, end)
    }

    /// Validates a navigation target and returns the page moved to.
    pub fn go_to(&self, page: usize) -> Result<Self, PageError> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(PageError::OutOfRange { page, total_pages });
        }
        Ok(Self {
            current_page: page,
            ..*self
        })
    }
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (start, end) = self.window();
        write!(f, "{}-{} of {}", start, end, self.total_count)
    }
}
