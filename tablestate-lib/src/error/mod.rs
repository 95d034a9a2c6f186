//! Error types

mod config;
mod pagination;
mod source;

pub use config::*;
pub use pagination::*;
pub use source::*;

/// Top-level error returned by controller operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page transition was rejected.
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// The data source failed to produce a page.
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// Controller or column configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
