//! Address bar synchronization.
//!
//! The controller never touches a browser directly. It reads the initial
//! address from a [`LocationPort`] once at construction and writes the
//! rebuilt address back through it after every filter or sort change.

mod port;
mod sync;

pub use port::*;
pub use sync::*;
