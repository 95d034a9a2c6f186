//! Row selection for bulk actions.

use serde_json::Value;
use serde_json::json;

/// State of the select-all checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    /// Some, but not all, rows are selected.
    Indeterminate,
    Checked,
}

/// Ids of the rows currently selected, in selection order.
///
/// Selection is independent of filters, sort and paging, and is never
/// persisted to the address.
///
/// # Example
///
/// ```
/// use tablestate_lib::state::RowSelection;
///
/// let mut selection = RowSelection::new();
/// selection.toggle("u-1");
/// selection.toggle("u-2");
/// selection.toggle("u-1");
///
/// assert_eq!(selection.ids(), ["u-2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: Vec<String>,
}

impl RowSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id`, or deselects it if it is already selected.
    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self.ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.ids.remove(index);
            }
            None => self.ids.push(id),
        }
    }

    /// Select-all checkbox behavior for the rows on display.
    ///
    /// While fewer ids are selected than `rows` holds, every row in `rows`
    /// becomes the selection. Otherwise the selection is cleared.
    pub fn toggle_all<I, S>(&mut self, rows: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all: Vec<String> = Vec::new();
        for id in rows {
            let id = id.into();
            if !all.contains(&id) {
                all.push(id);
            }
        }

        if self.ids.len() < all.len() {
            self.ids = all;
        } else {
            self.ids.clear();
        }
    }

    /// Deselects every row.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Select-all checkbox state when `row_count` rows are displayed.
    pub fn check_state(&self, row_count: usize) -> CheckState {
        match self.ids.len() {
            0 => CheckState::Unchecked,
            n if n < row_count => CheckState::Indeterminate,
            _ => CheckState::Checked,
        }
    }

    /// Selection banner text, e.g. `"2 Selected"`; `None` when nothing is
    /// selected.
    pub fn label(&self) -> Option<String> {
        (!self.ids.is_empty()).then(|| format!("{} Selected", self.ids.len()))
    }

    /// Variables for a bulk mutation over the selected rows.
    pub fn mutation_variables(&self) -> Value {
        json!({ "ids": self.ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = RowSelection::new();
        selection.toggle("a");
        selection.toggle("b");
        assert!(selection.contains("a"));
        assert_eq!(selection.label().as_deref(), Some("2 Selected"));

        selection.toggle("a");
        selection.toggle("b");
        assert!(selection.is_empty());
        assert_eq!(selection.label(), None);
    }

    #[test]
    fn test_toggle_all() {
        let mut selection = RowSelection::new();
        selection.toggle("b");
        assert_eq!(selection.check_state(3), CheckState::Indeterminate);

        selection.toggle_all(["a", "b", "c"]);
        assert_eq!(selection.ids(), ["a", "b", "c"]);
        assert_eq!(selection.check_state(3), CheckState::Checked);

        selection.toggle_all(["a", "b", "c"]);
        assert!(selection.is_empty());
        assert_eq!(selection.check_state(3), CheckState::Unchecked);
    }

    #[test]
    fn test_toggle_all_with_no_rows_clears() {
        let mut selection = RowSelection::new();
        selection.toggle("a");
        selection.toggle_all(Vec::<String>::new());
        assert!(selection.is_empty());
        assert_eq!(selection.check_state(0), CheckState::Unchecked);
    }

    #[test]
    fn test_mutation_variables() {
        let mut selection = RowSelection::new();
        selection.toggle("u-2");
        selection.toggle("u-1");
        assert_eq!(selection.mutation_variables(), json!({ "ids": ["u-2", "u-1"] }));
    }
}
