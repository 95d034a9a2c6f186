//! Table state controller

use std::fmt;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use log::debug;
use log::warn;
use serde_json::Value;

use crate::ControllerConfig;
use crate::PaginationView;
use crate::error::ConfigError;
use crate::error::Error;
use crate::location;
use crate::location::LocationPort;
use crate::model::ColumnConfig;
use crate::model::FilterEntry;
use crate::model::RangeBound;
use crate::source::Connection;
use crate::source::DataSource;
use crate::source::PageInfo;
use crate::state::CursorPager;
use crate::state::FilterStore;
use crate::state::RowSelection;
use crate::state::SortState;
use crate::state::variables;

/// Message shown when filters leave nothing to display.
pub const NO_DATA_AFTER_FILTERS_TEXT: &str = "Nothing matches the selected filters.";

type FilterListener = Box<dyn FnMut(&FilterStore)>;

/// Variables for one fetch, tagged with the pager generation they were
/// built for.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub variables: Value,
}

#[derive(Debug, Clone)]
struct ResponseSummary {
    page_info: PageInfo,
    total_count: Option<usize>,
    row_count: usize,
}

/// Owns the filter, sort and pagination state of one table.
///
/// Filter and sort state are restored from the location once, at
/// construction. After that, every filter or sort change is one transition:
/// the state changes, cached cursors are dropped, and the location is
/// rewritten.
///
/// # Example
///
/// ```
/// use tablestate_lib::{ControllerConfig, TableController};
/// use tablestate_lib::location::MemoryLocation;
/// use tablestate_lib::model::FilterEntry;
///
/// let location = MemoryLocation::new("https://app.test/users");
/// let mut table = TableController::new(ControllerConfig::default(), vec![], location.clone()).unwrap();
///
/// table.apply_filter(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
///
/// let variables = table.current_variables();
/// assert_eq!(variables["filters"]["status"], "ACTIVE");
/// assert_eq!(variables["first"], 10);
/// assert!(table.change_page(1).is_err());
/// ```
pub struct TableController {
    config: ControllerConfig,
    columns: Vec<ColumnConfig>,
    filters: FilterStore,
    sort: SortState,
    pager: CursorPager,
    selection: RowSelection,
    location: Box<dyn LocationPort>,
    polling_paused: bool,
    last_response: Option<ResponseSummary>,
    filter_listener: Option<FilterListener>,
}

impl TableController {
    /// Creates a controller, restoring filters and sort from `port`.
    pub fn new(
        config: ControllerConfig,
        columns: Vec<ColumnConfig>,
        port: impl LocationPort + 'static,
    ) -> Result<Self, Error> {
        if config.rows_per_page == 0 {
            return Err(ConfigError::ZeroRowsPerPage.into());
        }

        let restored = location::read(&port.current(), &columns);
        let sort = SortState::new(
            restored.sort_key.or_else(|| config.default_sort_key.clone()),
            restored.direction.unwrap_or(config.default_sort_direction),
        );

        debug!(
            "table state restored: {} filter key(s), sort {:?} {}",
            restored.filters.len(),
            sort.sort_key(),
            sort.direction()
        );

        Ok(Self {
            pager: CursorPager::new(config.rows_per_page),
            config,
            columns,
            filters: restored.filters,
            sort,
            selection: RowSelection::new(),
            location: Box::new(port),
            polling_paused: false,
            last_response: None,
            filter_listener: None,
        })
    }

    /// Registers a callback invoked with the filters after every filter
    /// change. It is called once immediately with the restored filters.
    pub fn with_filter_listener(mut self, listener: impl FnMut(&FilterStore) + 'static) -> Self {
        let mut listener: FilterListener = Box::new(listener);
        listener(&self.filters);
        self.filter_listener = Some(listener);
        self
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Applies a filter. See [`FilterStore::apply`].
    pub fn apply_filter(&mut self, entry: FilterEntry, is_single: bool) {
        debug!("apply filter {} = {}", entry.filter_key, entry.filter_value);
        self.filters.apply(entry, is_single);
        self.filters_changed();
    }

    /// Applies the filter for an option picked from `column`'s menu.
    pub fn select_option(&mut self, column: &str, name: &str, value: Option<Value>) -> Result<(), Error> {
        let selection = self.column(column)?.select(name, value)?;
        self.apply_filter(selection.entry, selection.is_single);
        Ok(())
    }

    /// Sets one end of `column`'s date-time range.
    pub fn select_range(&mut self, column: &str, bound: RangeBound, at: DateTime<Utc>) -> Result<(), Error> {
        let entry = self.column(column)?.select_range(bound, at)?;
        self.apply_filter(entry, true);
        Ok(())
    }

    /// Removes a filter. See [`FilterStore::clear`].
    pub fn clear_filter(&mut self, filter_key: &str, filter_value: &Value) {
        debug!("clear filter {} = {}", filter_key, filter_value);
        self.filters.clear(filter_key, filter_value);
        self.filters_changed();
    }

    /// Removes every filter.
    pub fn clear_all_filters(&mut self) {
        debug!("clear all filters");
        self.filters.clear_all();
        self.filters_changed();
    }

    /// Selects a sort key. See [`SortState::toggle`].
    pub fn toggle_sort(&mut self, sort_key: &str) {
        self.sort.toggle(sort_key);
        debug!("sort by {} {}", sort_key, self.sort.direction());
        self.commit();
    }

    /// Moves to `page`. Rejected moves leave the state unchanged.
    pub fn change_page(&mut self, page: usize) -> Result<(), Error> {
        if let Err(e) = self.pager.on_page_change(page) {
            warn!("page change rejected: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Changes the page size and returns to page 0.
    pub fn change_rows_per_page(&mut self, rows_per_page: usize) -> Result<(), Error> {
        self.pager.set_rows_per_page(rows_per_page)?;
        self.last_response = None;
        Ok(())
    }

    /// Suspends polling, e.g. while a filter menu is open.
    pub fn pause_polling(&mut self) {
        self.polling_paused = true;
    }

    /// Resumes polling.
    pub fn resume_polling(&mut self) {
        self.polling_paused = false;
    }

    /// Selects or deselects one row.
    pub fn toggle_row(&mut self, id: impl Into<String>) {
        self.selection.toggle(id);
    }

    /// Select-all checkbox over the displayed row ids. See
    /// [`RowSelection::toggle_all`].
    pub fn toggle_all_rows<I, S>(&mut self, rows: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.toggle_all(rows);
    }

    /// Records a finished bulk action over the selected rows.
    ///
    /// The selection is cleared and the refetch request for the current
    /// state is returned. Filters, sort and paging are left alone.
    pub fn complete_bulk_action(&mut self) -> FetchRequest {
        debug!("bulk action completed over {} row(s)", self.selection.len());
        self.selection.clear();
        self.request()
    }

    fn filters_changed(&mut self) {
        self.commit();
        if let Some(listener) = self.filter_listener.as_mut() {
            listener(&self.filters);
        }
    }

    fn commit(&mut self) {
        self.pager.invalidate();
        self.last_response = None;
        location::write(&mut *self.location, &self.filters, &self.sort);
    }

    fn column(&self, name: &str) -> Result<&ColumnConfig, ConfigError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ConfigError::UnknownColumn(name.to_string()))
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Variables for the next fetch.
    pub fn current_variables(&self) -> Value {
        variables::build(&self.filters, &self.sort, &self.pager, &self.config.base_variables)
    }

    /// Variables for the next fetch, tagged with the current generation.
    ///
    /// Pass the generation back to [`observe_response`](Self::observe_response)
    /// when the fetch completes.
    pub fn request(&self) -> FetchRequest {
        FetchRequest {
            generation: self.pager.generation(),
            variables: self.current_variables(),
        }
    }

    /// Records a completed fetch.
    ///
    /// Responses for a request built before the latest filter, sort, page
    /// or page size change are discarded. Returns `true` if the response was
    /// recorded.
    pub fn observe_response<T>(&mut self, generation: u64, connection: &Connection<T>) -> bool {
        if generation != self.pager.generation() {
            debug!(
                "discarding response for generation {} (current {})",
                generation,
                self.pager.generation()
            );
            return false;
        }

        match &connection.page_info.end_cursor {
            Some(cursor) => self.pager.observe_end_cursor(cursor.clone()),
            None => self.pager.clear_end_cursor(),
        }
        self.last_response = Some(ResponseSummary {
            page_info: connection.page_info.clone(),
            total_count: connection.total_count,
            row_count: connection.rows.len(),
        });
        true
    }

    /// Fetches the current page from `source` and records the response.
    ///
    /// Source errors are returned as-is; nothing is retried.
    pub async fn fetch<S: DataSource>(&mut self, source: &S) -> Result<Connection<S::Row>, Error> {
        let request = self.request();
        let connection = source.fetch(&request.variables).await?;
        self.observe_response(request.generation, &connection);
        Ok(connection)
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Returns the active filters.
    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// Returns the sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Returns the pager.
    pub fn pager(&self) -> &CursorPager {
        &self.pager
    }

    /// Returns the selected rows.
    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Returns the configured columns.
    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    /// Returns `true` while polling is paused.
    pub fn is_polling_paused(&self) -> bool {
        self.polling_paused
    }

    /// Interval the external scheduler should poll at; zero while paused.
    pub fn poll_interval(&self) -> Duration {
        if self.polling_paused {
            Duration::ZERO
        } else {
            self.config.poll_interval
        }
    }

    /// Page metadata from the latest recorded response.
    pub fn page_info(&self) -> Option<&PageInfo> {
        self.last_response.as_ref().map(|r| &r.page_info)
    }

    /// Pagination control state.
    pub fn pagination(&self) -> PaginationView {
        let page = self.pager.current_page();
        let total_count = self.last_response.as_ref().and_then(|r| r.total_count);
        let row_count = self.last_response.as_ref().map_or(0, |r| r.row_count);
        let has_next = self.page_info().is_none_or(|info| info.has_next_page);

        PaginationView {
            page,
            rows_per_page: self.pager.rows_per_page(),
            rows_per_page_options: self.config.rows_per_page_options.clone(),
            total_count,
            visible: row_count > 0 && total_count.unwrap_or(usize::MAX) >= self.config.disable_pagination_under,
            can_go_first: page > 0,
            can_go_back: page > 0,
            can_go_next: has_next && self.pager.can_advance(),
        }
    }

    /// Message for an empty result.
    pub fn empty_message(&self) -> &str {
        if self.filters.is_empty() {
            &self.config.no_data_text
        } else {
            NO_DATA_AFTER_FILTERS_TEXT
        }
    }

    /// Whether column headers should be rendered.
    ///
    /// Headers stay visible while filters are active so they can be cleared
    /// even when nothing matches.
    pub fn show_header(&self) -> bool {
        self.config.render_header_if_no_data
            || self.last_response.as_ref().is_some_and(|r| r.row_count > 0)
            || !self.filters.is_empty()
    }

    /// Whether a "clear all" pill should be offered.
    pub fn show_clear_all(&self) -> bool {
        self.filters.pills().nth(1).is_some()
    }
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("pager", &self.pager)
            .field("selection", &self.selection)
            .field("polling_paused", &self.polling_paused)
            .finish_non_exhaustive()
    }
}
