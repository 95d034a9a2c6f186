//! Persisted-state port.

use std::cell::RefCell;
use std::rc::Rc;

/// Where the table state is persisted, typically the page address.
pub trait LocationPort {
    /// Returns the current absolute address, query string included.
    fn current(&self) -> String;

    /// Replaces the current history entry with `url` without navigating.
    fn replace(&mut self, url: &str);
}

/// An in-memory location.
///
/// Clones share the same address, so a caller can keep a handle after
/// handing one to a controller and observe every write.
///
/// # Example
///
/// ```
/// use tablestate_lib::location::{LocationPort, MemoryLocation};
///
/// let location = MemoryLocation::new("https://app.test/users?sort=NAME");
/// let mut port = location.clone();
/// port.replace("https://app.test/users?sort=EMAIL");
///
/// assert_eq!(location.current(), "https://app.test/users?sort=EMAIL");
/// assert_eq!(location.writes(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    inner: Rc<RefCell<MemoryLocationInner>>,
}

#[derive(Debug, Default)]
struct MemoryLocationInner {
    url: String,
    writes: usize,
}

impl MemoryLocation {
    /// Creates a location at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryLocationInner {
                url: url.into(),
                writes: 0,
            })),
        }
    }

    /// Returns how many times the address was replaced.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl LocationPort for MemoryLocation {
    fn current(&self) -> String {
        self.inner.borrow().url.clone()
    }

    fn replace(&mut self, url: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.url = url.to_string();
        inner.writes += 1;
    }
}
