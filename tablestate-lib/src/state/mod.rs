//! Table state components.
//!
//! - [`FilterStore`] - active filters keyed by filter key
//! - [`SortState`] - the single active sort key and its direction
//! - [`CursorPager`] - page index, page size and the forward cursor cache
//! - [`RowSelection`] - ids of the rows picked for a bulk action
//! - [`variables`] - derives data source variables from filters, sort and pager
//!
//! None of these know about each other; the controller composes them.

mod filters;
mod pager;
mod selection;
mod sort;
pub mod variables;

pub use filters::FilterStore;
pub use pager::CursorPager;
pub use selection::CheckState;
pub use selection::RowSelection;
pub use sort::SortState;
