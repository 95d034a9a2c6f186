//! Typed models

mod column;
mod filter;
mod order;

pub use column::*;
pub use filter::*;
pub use order::*;
