//! Forward-cursor pagination.
//!
//! The data source only hands out one "next" cursor per page, so going back
//! is served from cursors remembered on the way forward. A page is reachable
//! only after every page before it was visited since the last reset.

use std::collections::BTreeMap;

use log::debug;

use crate::error::PaginationError;

/// Page index, page size and the page-to-cursor cache.
///
/// Every reset and page change bumps a generation counter. Responses tagged
/// with an older generation belong to a superseded request.
///
/// # Example
///
/// ```
/// use tablestate_lib::state::CursorPager;
///
/// let mut pager = CursorPager::new(10);
/// pager.observe_end_cursor("c1");
/// pager.on_page_change(1).unwrap();
/// assert_eq!(pager.after_cursor(), Some("c1"));
///
/// pager.on_page_change(0).unwrap();
/// assert_eq!(pager.after_cursor(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPager {
    rows_per_page: usize,
    current_page: usize,
    after_cursor: Option<String>,
    /// Page index to the cursor that page is fetched after. Page 0 is never
    /// stored; it always starts without a cursor.
    cursor_cache: BTreeMap<usize, String>,
    /// End cursor of the most recent response for the current page.
    end_cursor: Option<String>,
    generation: u64,
}

impl CursorPager {
    /// Creates a pager on page 0.
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page,
            current_page: 0,
            after_cursor: None,
            cursor_cache: BTreeMap::new(),
            end_cursor: None,
            generation: 0,
        }
    }

    /// Moves to `target`.
    ///
    /// Stepping forward by one uses the end cursor observed for the current
    /// page and remembers it for `target`. Any other move uses the cached
    /// cursor for `target`. A move with no usable cursor is rejected and
    /// leaves the pager unchanged.
    pub fn on_page_change(&mut self, target: usize) -> Result<(), PaginationError> {
        let cursor = self.cursor_for(target)?;

        if target > self.current_page {
            self.cursor_cache
                .extend(cursor.clone().map(|cursor| (target, cursor)));
        }

        debug!(
            "page {} -> {} (after: {:?})",
            self.current_page, target, cursor
        );

        self.current_page = target;
        self.after_cursor = cursor;
        self.end_cursor = None;
        self.generation += 1;
        Ok(())
    }

    fn cursor_for(&self, target: usize) -> Result<Option<String>, PaginationError> {
        if target == 0 {
            return Ok(None);
        }

        if target == self.current_page + 1 && self.end_cursor.is_some() {
            return Ok(self.end_cursor.clone());
        }

        match self.cursor_cache.get(&target) {
            Some(cursor) => Ok(Some(cursor.clone())),
            None if target > self.current_page + 1 => {
                Err(PaginationError::non_adjacent(self.current_page, target))
            }
            None => Err(PaginationError::missing_cursor(target)),
        }
    }

    /// Changes the page size.
    ///
    /// Cursors are only meaningful for the page size they were produced
    /// with, so the cache is dropped and the pager returns to page 0.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> Result<(), PaginationError> {
        if rows_per_page == 0 {
            return Err(PaginationError::InvalidPageSize(rows_per_page));
        }
        self.rows_per_page = rows_per_page;
        self.reset();
        Ok(())
    }

    /// Drops every cached cursor and returns to page 0.
    ///
    /// Called whenever the filters or the sort order change.
    pub fn invalidate(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.current_page = 0;
        self.after_cursor = None;
        self.cursor_cache.clear();
        self.end_cursor = None;
        self.generation += 1;
        debug!(
            "pagination reset (rows per page: {}, generation: {})",
            self.rows_per_page, self.generation
        );
    }

    /// Records the end cursor returned for the current page.
    pub fn observe_end_cursor(&mut self, cursor: impl Into<String>) {
        self.end_cursor = Some(cursor.into());
    }

    /// Forgets the observed end cursor, e.g. when the source reports none.
    pub(crate) fn clear_end_cursor(&mut self) {
        self.end_cursor = None;
    }

    /// Returns `true` if a step to the next page has a cursor to use.
    pub fn can_advance(&self) -> bool {
        self.cursor_for(self.current_page + 1).is_ok()
    }

    /// Returns the page size.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Returns the zero-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the cursor the current page is fetched after.
    pub fn after_cursor(&self) -> Option<&str> {
        self.after_cursor.as_deref()
    }

    /// Returns the cached cursor for `page`.
    pub fn cached_cursor(&self, page: usize) -> Option<&str> {
        self.cursor_cache.get(&page).map(String::as_str)
    }

    /// Returns the number of cached cursors.
    pub fn cached_pages(&self) -> usize {
        self.cursor_cache.len()
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
