//! Configuration error types

/// Errors caused by controller or column configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Rows per page must be at least one.
    #[error("Rows per page must be positive")]
    ZeroRowsPerPage,

    /// The column has no filter key to apply a selection to.
    #[error("Column '{column}' is not filterable")]
    NotFilterable { column: String },

    /// The column has no date-time range keys.
    #[error("Column '{column}' has no date-time range filter")]
    NotRangeFilter { column: String },

    /// No column with this name is configured.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

impl ConfigError {
    /// Creates a new not-filterable error.
    pub fn not_filterable(column: impl Into<String>) -> Self {
        Self::NotFilterable {
            column: column.into(),
        }
    }

    /// Creates a new not-a-range-filter error.
    pub fn not_range_filter(column: impl Into<String>) -> Self {
        Self::NotRangeFilter {
            column: column.into(),
        }
    }
}
