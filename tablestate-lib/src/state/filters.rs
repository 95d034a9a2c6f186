//! Active filter store.

use serde_json::Map;
use serde_json::Value;

use crate::model::FilterEntry;
use crate::model::FilterSlot;
use crate::model::MenuOption;

/// The set of active filters, keyed by filter key.
///
/// Keys keep the order they were first added in, and entries of a
/// multi-valued key keep the order they were applied in. Pills render in
/// that order.
///
/// # Example
///
/// ```
/// use tablestate_lib::model::FilterEntry;
/// use tablestate_lib::state::FilterStore;
///
/// let mut filters = FilterStore::new();
/// filters.apply(FilterEntry::new("tag", "a", "Tag", "A"), false);
/// filters.apply(FilterEntry::new("tag", "b", "Tag", "B"), false);
///
/// let fragment = filters.to_query_fragment();
/// assert_eq!(fragment["tag"], serde_json::json!(["a", "b"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterStore {
    slots: Vec<(String, FilterSlot)>,
}

impl FilterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.slots.iter().position(|(k, _)| k == key)
    }

    /// Applies a filter under `entry.filter_key`.
    ///
    /// A single filter replaces whatever is stored. Otherwise the entry is
    /// appended to the key's sequence; repeated values are kept as separate
    /// pills. Appending to a key that currently holds a single entry turns
    /// it into a two-entry sequence.
    pub fn apply(&mut self, entry: FilterEntry, is_single: bool) {
        let key = entry.filter_key.clone();

        let Some(index) = self.position(&key) else {
            let slot = if is_single {
                FilterSlot::Single(entry)
            } else {
                FilterSlot::Multi(vec![entry])
            };
            self.slots.push((key, slot));
            return;
        };

        let slot = &mut self.slots[index].1;
        if is_single {
            *slot = FilterSlot::Single(entry);
            return;
        }

        let promoted = match slot {
            FilterSlot::Multi(entries) => {
                entries.push(entry);
                return;
            }
            FilterSlot::Single(existing) => vec![existing.clone(), entry],
        };
        *slot = FilterSlot::Multi(promoted);
    }

    /// Removes a filter.
    ///
    /// For a multi-valued key only the first entry whose value equals
    /// `filter_value` is removed, and the key goes away with its last entry.
    /// A single-valued key is removed regardless of `filter_value`.
    ///
    /// Returns `true` if anything was removed.
    pub fn clear(&mut self, key: &str, filter_value: &Value) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        let emptied = match &mut self.slots[index].1 {
            FilterSlot::Single(_) => true,
            FilterSlot::Multi(entries) => {
                let Some(found) = entries.iter().position(|e| &e.filter_value == filter_value) else {
                    return false;
                };
                entries.remove(found);
                entries.is_empty()
            }
        };

        if emptied {
            self.slots.remove(index);
        }
        true
    }

    /// Removes every filter.
    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    /// Filter values per key, as sent to the data source.
    ///
    /// Single keys map to their bare value, multi-valued keys to the values
    /// in order. Pill metadata is dropped.
    pub fn to_query_fragment(&self) -> Map<String, Value> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.query_value()))
            .collect()
    }

    /// Returns the slot stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FilterSlot> {
        self.position(key).map(|i| &self.slots[i].1)
    }

    /// Iterates over keys and slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterSlot)> {
        self.slots.iter().map(|(k, slot)| (k.as_str(), slot))
    }

    /// Every active entry, flattened in pill order.
    pub fn pills(&self) -> impl Iterator<Item = &FilterEntry> {
        self.slots.iter().flat_map(|(_, slot)| slot.entries())
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of active keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Menu options still worth offering for `key`.
    ///
    /// Options repeating an earlier option's value are dropped, as are
    /// options whose name is already shown as a pill on `key`.
    pub fn available_options(&self, key: &str, options: impl IntoIterator<Item = MenuOption>) -> Vec<MenuOption> {
        let active: Vec<&str> = self
            .get(key)
            .map(|slot| slot.entries().iter().map(|e| e.pill_value.as_str()).collect())
            .unwrap_or_default();

        let mut offered: Vec<MenuOption> = Vec::new();
        for option in options {
            if offered.iter().any(|o| o.value == option.value) {
                continue;
            }
            if active.contains(&option.name.as_str()) {
                continue;
            }
            offered.push(option);
        }
        offered
    }

    /// Stores a restored slot, replacing any existing one.
    pub(crate) fn restore(&mut self, key: String, slot: FilterSlot) {
        match self.position(&key) {
            Some(index) => self.slots[index].1 = slot,
            None => self.slots.push((key, slot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tag(value: &str) -> FilterEntry {
        FilterEntry::new("tag", value, "Tag", value.to_uppercase())
    }

    #[test]
    fn test_single_replaces() {
        let mut filters = FilterStore::new();
        filters.apply(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
        filters.apply(FilterEntry::new("status", "DONE", "Status", "Done"), true);

        assert_eq!(filters.len(), 1);
        assert_eq!(filters.to_query_fragment()["status"], json!("DONE"));
    }

    #[test]
    fn test_multi_appends_without_dedup() {
        let mut filters = FilterStore::new();
        filters.apply(tag("a"), false);
        filters.apply(tag("b"), false);
        filters.apply(tag("a"), false);

        assert_eq!(filters.to_query_fragment()["tag"], json!(["a", "b", "a"]));
        assert_eq!(filters.pills().count(), 3);
    }

    #[test]
    fn test_clear_removes_first_match_only() {
        let mut filters = FilterStore::new();
        filters.apply(tag("a"), false);
        filters.apply(tag("b"), false);
        filters.apply(tag("a"), false);

        assert!(filters.clear("tag", &json!("a")));
        assert_eq!(filters.to_query_fragment()["tag"], json!(["b", "a"]));
        assert!(!filters.clear("tag", &json!("zzz")));
    }

    #[test]
    fn test_clear_last_entry_deletes_key() {
        let mut filters = FilterStore::new();
        filters.apply(tag("a"), false);
        assert!(filters.clear("tag", &json!("a")));

        assert!(filters.get("tag").is_none());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_clear_single_ignores_value() {
        let mut filters = FilterStore::new();
        filters.apply(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
        assert!(filters.clear("status", &json!("something else")));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_never_holds_empty_sequence() {
        let mut filters = FilterStore::new();
        let values = ["a", "b", "c"];
        for round in 0..4 {
            for v in &values[..=round % 3] {
                filters.apply(tag(v), false);
            }
            for v in values.iter().rev() {
                filters.clear("tag", &json!(v));
                if let Some(FilterSlot::Multi(entries)) = filters.get("tag") {
                    assert!(!entries.is_empty());
                }
            }
        }
        assert!(filters.is_empty());
    }

    #[test]
    fn test_key_order_is_insertion_order() {
        let mut filters = FilterStore::new();
        filters.apply(tag("a"), false);
        filters.apply(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
        filters.apply(tag("b"), false);

        let keys: Vec<_> = filters.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["tag", "status"]);

        filters.clear("tag", &json!("a"));
        filters.clear("tag", &json!("b"));
        filters.apply(tag("c"), false);
        let keys: Vec<_> = filters.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["status", "tag"]);
    }

    #[test]
    fn test_multi_onto_single_promotes() {
        let mut filters = FilterStore::new();
        filters.apply(tag("a"), true);
        filters.apply(tag("b"), false);
        assert_eq!(filters.to_query_fragment()["tag"], json!(["a", "b"]));
    }

    #[test]
    fn test_available_options() {
        let mut filters = FilterStore::new();
        filters.apply(FilterEntry::new("owner", "u-1", "Owner", "Alice"), false);

        let offered = filters.available_options(
            "owner",
            [
                MenuOption::new("Alice", "u-1"),
                MenuOption::new("Bob", "u-2"),
                MenuOption::new("Bobby", "u-2"),
                MenuOption::new("Carol", "u-3"),
            ],
        );
        let names: Vec<_> = offered.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);
    }
}
