//! Table state controller library
//!
//! Tracks the filter, sort and cursor-pagination state of a data table, keeps
//! it in sync with the page address, and derives the variables sent to the
//! data source on every change.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod source;
pub mod state;

mod controller;
mod view;

pub use config::ControllerConfig;
pub use controller::*;
pub use view::*;
