//! Controller configuration

use std::time::Duration;

use serde_json::Map;
use serde_json::Value;

use crate::model::Direction;

/// Rows-per-page choices offered by default.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 5] = [10, 25, 50, 100, 200];

/// Configuration for a [`TableController`](crate::TableController).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tablestate_lib::ControllerConfig;
/// use tablestate_lib::model::Direction;
///
/// let config = ControllerConfig::default()
///     .with_rows_per_page(25)
///     .with_default_sort("CREATED", Direction::Desc)
///     .with_poll_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Initial page size.
    ///
    /// Default: 10
    pub rows_per_page: usize,

    /// Page sizes the pagination control offers.
    ///
    /// Default: 10, 25, 50, 100, 200
    pub rows_per_page_options: Vec<usize>,

    /// Sort key used when the address has none.
    pub default_sort_key: Option<String>,

    /// Direction used when the address has none.
    ///
    /// Default: `DESC`
    pub default_sort_direction: Direction,

    /// Refetch interval for the external scheduler. Zero disables polling.
    pub poll_interval: Duration,

    /// Variables merged under the derived ones on every build.
    pub base_variables: Map<String, Value>,

    /// Pagination is hidden when the total count is below this.
    pub disable_pagination_under: usize,

    /// Message shown for an empty, unfiltered result.
    pub no_data_text: String,

    /// Show column headers even when there are no rows and no filters.
    pub render_header_if_no_data: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rows_per_page: 10,
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            default_sort_key: None,
            default_sort_direction: Direction::Desc,
            poll_interval: Duration::ZERO,
            base_variables: Map::new(),
            disable_pagination_under: 0,
            no_data_text: String::new(),
            render_header_if_no_data: false,
        }
    }
}

impl ControllerConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size.
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    /// Sets the offered page sizes.
    pub fn with_rows_per_page_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.rows_per_page_options = options.into();
        self
    }

    /// Sets the default sort.
    pub fn with_default_sort(mut self, sort_key: impl Into<String>, direction: Direction) -> Self {
        self.default_sort_key = Some(sort_key.into());
        self.default_sort_direction = direction;
        self
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the base variables.
    pub fn with_base_variables(mut self, variables: Map<String, Value>) -> Self {
        self.base_variables = variables;
        self
    }

    /// Hides pagination for results smaller than `count`.
    pub fn with_disable_pagination_under(mut self, count: usize) -> Self {
        self.disable_pagination_under = count;
        self
    }

    /// Sets the empty-result message.
    pub fn with_no_data_text(mut self, text: impl Into<String>) -> Self {
        self.no_data_text = text.into();
        self
    }

    /// Always render column headers.
    pub fn with_header_if_no_data(mut self) -> Self {
        self.render_header_if_no_data = true;
        self
    }
}
