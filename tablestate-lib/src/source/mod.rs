//! Data source contract.
//!
//! The controller does not fetch rows itself. A [`DataSource`] receives the
//! variables built from the table state and answers with one connection
//! page: rows, an optional total count and cursor metadata.

mod array;

pub use array::*;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::SourceError;

/// Cursor metadata for one page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether rows exist after this page.
    pub has_next_page: bool,
    /// Whether rows exist before this page.
    pub has_previous_page: bool,
    /// Cursor to fetch the next page after.
    pub end_cursor: Option<String>,
}

/// One page of rows returned by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection<T> {
    pub rows: Vec<T>,
    /// Total matching rows, `None` when the source cannot tell.
    pub total_count: Option<usize>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A source of table rows.
///
/// # Example
///
/// ```ignore
/// struct Users { client: GraphQlClient }
///
/// #[async_trait]
/// impl DataSource for Users {
///     type Row = User;
///
///     async fn fetch(&self, variables: &Value) -> Result<Connection<User>, SourceError> {
///         self.client.users(variables).await.map_err(|e| SourceError::failed(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    type Row: Send;

    /// Fetches the page described by `variables`.
    async fn fetch(&self, variables: &Value) -> Result<Connection<Self::Row>, SourceError>;
}
