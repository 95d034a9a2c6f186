//! Pagination error types

/// Errors raised by cursor page transitions.
///
/// Every variant leaves the pager untouched: a rejected transition never
/// produces a fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// No cursor is known for the requested page.
    ///
    /// Raised for a forward step before the current page's end cursor was
    /// observed.
    #[error("No cursor available for page {page}")]
    MissingCursor { page: usize },

    /// The requested page skips over pages that were never visited.
    #[error("Cannot jump from page {current} to page {target}")]
    NonAdjacent { current: usize, target: usize },

    /// Rows per page must be at least one.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),
}

impl PaginationError {
    /// Creates a new missing cursor error.
    pub fn missing_cursor(page: usize) -> Self {
        Self::MissingCursor { page }
    }

    /// Creates a new non-adjacent jump error.
    pub fn non_adjacent(current: usize, target: usize) -> Self {
        Self::NonAdjacent { current, target }
    }
}
