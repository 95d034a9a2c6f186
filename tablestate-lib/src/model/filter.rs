//! Filter entry types.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// One active filter clause.
///
/// `filter_value` is what the data source receives. `pill_label` and
/// `pill_value` describe the removable pill shown for the filter; only
/// `pill_value` survives a trip through the address bar.
///
/// # Example
///
/// ```
/// use tablestate_lib::model::FilterEntry;
///
/// let entry = FilterEntry::new("status", "ACTIVE", "Status", "Active");
/// assert_eq!(entry.filter_value, "ACTIVE");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    /// Key the filter is stored and sent under.
    pub filter_key: String,
    /// Value sent to the data source.
    pub filter_value: Value,
    /// Pill label, e.g. `"Status"` or `"After"`.
    pub pill_label: String,
    /// Human-readable value shown on the pill.
    pub pill_value: String,
}

impl FilterEntry {
    /// Creates a new filter entry.
    pub fn new(
        filter_key: impl Into<String>,
        filter_value: impl Into<Value>,
        pill_label: impl Into<String>,
        pill_value: impl Into<String>,
    ) -> Self {
        Self {
            filter_key: filter_key.into(),
            filter_value: filter_value.into(),
            pill_label: pill_label.into(),
            pill_value: pill_value.into(),
        }
    }
}

/// The filter state stored under one key.
///
/// A multi-valued slot is never empty; the store deletes the key instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSlot {
    /// A replace-on-apply filter.
    Single(FilterEntry),
    /// An append-on-apply filter, in the order entries were added.
    Multi(Vec<FilterEntry>),
}

impl FilterSlot {
    /// Returns the entries in this slot in pill order.
    pub fn entries(&self) -> &[FilterEntry] {
        match self {
            FilterSlot::Single(entry) => std::slice::from_ref(entry),
            FilterSlot::Multi(entries) => entries,
        }
    }

    /// The value handed to the data source for this slot.
    pub(crate) fn query_value(&self) -> Value {
        match self {
            FilterSlot::Single(entry) => entry.filter_value.clone(),
            FilterSlot::Multi(entries) => {
                Value::Array(entries.iter().map(|e| e.filter_value.clone()).collect())
            }
        }
    }
}
