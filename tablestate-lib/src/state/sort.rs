//! Single-column sort state.

use crate::model::Direction;

/// The active sort key and direction.
///
/// At most one key is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    sort_key: Option<String>,
    direction: Direction,
}

impl SortState {
    /// Creates a sort state.
    pub fn new(sort_key: Option<String>, direction: Direction) -> Self {
        Self { sort_key, direction }
    }

    /// Selects `sort_key`.
    ///
    /// Reselecting the active key flips the direction. Any other key becomes
    /// active in ascending order; the previous direction is not carried over.
    pub fn toggle(&mut self, sort_key: &str) {
        if self.sort_key.as_deref() == Some(sort_key) {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = Some(sort_key.to_string());
            self.direction = Direction::Asc;
        }
    }

    /// Returns the active sort key, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// Returns the sort direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` if `sort_key` is the active key.
    pub fn is_sorted_by(&self, sort_key: &str) -> bool {
        self.sort_key.as_deref() == Some(sort_key)
    }
}
