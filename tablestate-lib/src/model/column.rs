//! Static column configuration.
//!
//! Columns describe how a header sorts and filters. The same configuration
//! is used when a filter is picked from a menu and when filters are restored
//! from the address bar, which is what keeps pill labels stable across a
//! reload.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigError;

use super::FilterEntry;

const DEFAULT_PILL_LABEL: &str = "Filter";
const SUBSTRING_SUFFIX: &str = " Contains";

/// Configuration for one table column.
///
/// # Example
///
/// ```
/// use tablestate_lib::model::{ColumnConfig, FilterOptions};
///
/// let column = ColumnConfig::new("Status")
///     .with_sort_key("STATUS")
///     .with_filter_options(FilterOptions::exact("status").with_pill_label("Status"));
///
/// assert_eq!(column.pill_label(), "Status");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    /// Header text.
    pub name: String,
    /// Sort key sent as `orderBy.sort`; the column is not sortable without one.
    #[serde(default)]
    pub sort_key: Option<String>,
    /// Filter configuration; the column is not filterable without one.
    #[serde(default)]
    pub filter_options: Option<FilterOptions>,
}

/// Filter configuration for a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Key for exact-match filters.
    #[serde(default)]
    pub rows_query_filter_key: Option<String>,
    /// Key for free-text "contains" filters.
    #[serde(default)]
    pub rows_query_substring_filter_key: Option<String>,
    /// Label shown on pills. Defaults to `"Filter"`.
    #[serde(default)]
    pub pill_label: Option<String>,
    #[serde(default)]
    pub menu_options: MenuOptions,
}

/// Behavior of the column's filter menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOptions {
    /// Send the option's value (`true`) or its display name (`false`).
    #[serde(default = "default_filter_on_value")]
    pub filter_on_value: bool,
    /// Selecting an option replaces the current one instead of adding to it.
    #[serde(default)]
    pub replace_existing_filter: bool,
    /// Makes the column a date-time range filter.
    #[serde(default)]
    pub date_time_filter_options: Option<DateTimeFilterOptions>,
}

fn default_filter_on_value() -> bool {
    true
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            filter_on_value: true,
            replace_existing_filter: false,
            date_time_filter_options: None,
        }
    }
}

/// Filter keys for the two ends of a date-time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeFilterOptions {
    pub start_time_filter_key: String,
    pub end_time_filter_key: String,
}

/// One end of a date-time range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

impl RangeBound {
    /// Fixed pill label for this bound.
    pub fn pill_label(&self) -> &'static str {
        match self {
            RangeBound::Start => "After",
            RangeBound::End => "Before",
        }
    }
}

/// How a configured filter key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKeyKind {
    /// Exact-match key.
    Exact,
    /// Substring key; pills get a `" Contains"` suffix.
    Substring,
    /// One end of a date-time range.
    Range(RangeBound),
}

/// An option offered by a filter menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuOption {
    pub name: String,
    pub value: Value,
}

impl MenuOption {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A filter entry built from a menu selection, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub entry: FilterEntry,
    pub is_single: bool,
}

impl FilterOptions {
    /// Creates options for an exact-match filter key.
    pub fn exact(key: impl Into<String>) -> Self {
        Self {
            rows_query_filter_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Creates options for a date-time range filter.
    pub fn date_time(start_key: impl Into<String>, end_key: impl Into<String>) -> Self {
        Self {
            menu_options: MenuOptions {
                date_time_filter_options: Some(DateTimeFilterOptions {
                    start_time_filter_key: start_key.into(),
                    end_time_filter_key: end_key.into(),
                }),
                ..MenuOptions::default()
            },
            ..Self::default()
        }
    }

    /// Sets the substring filter key.
    pub fn with_substring_key(mut self, key: impl Into<String>) -> Self {
        self.rows_query_substring_filter_key = Some(key.into());
        self
    }

    /// Sets the pill label.
    pub fn with_pill_label(mut self, label: impl Into<String>) -> Self {
        self.pill_label = Some(label.into());
        self
    }

    /// Makes selections replace the active filter instead of adding to it.
    pub fn replace_existing(mut self) -> Self {
        self.menu_options.replace_existing_filter = true;
        self
    }

    /// Sends option names instead of option values.
    pub fn filter_on_name(mut self) -> Self {
        self.menu_options.filter_on_value = false;
        self
    }
}

impl ColumnConfig {
    /// Creates an unsortable, unfilterable column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the sort key.
    pub fn with_sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    /// Sets the filter options.
    pub fn with_filter_options(mut self, options: FilterOptions) -> Self {
        self.filter_options = Some(options);
        self
    }

    /// Pill label for non-range filters on this column.
    pub fn pill_label(&self) -> &str {
        self.filter_options
            .as_ref()
            .and_then(|o| o.pill_label.as_deref())
            .unwrap_or(DEFAULT_PILL_LABEL)
    }

    fn range_options(&self) -> Option<&DateTimeFilterOptions> {
        self.filter_options
            .as_ref()
            .and_then(|o| o.menu_options.date_time_filter_options.as_ref())
    }

    /// Every filter key this column can populate, with its kind.
    ///
    /// Range columns yield only their start and end keys.
    pub fn filter_keys(&self) -> Vec<(&str, FilterKeyKind)> {
        let Some(options) = &self.filter_options else {
            return Vec::new();
        };

        if let Some(range) = &options.menu_options.date_time_filter_options {
            return vec![
                (
                    range.start_time_filter_key.as_str(),
                    FilterKeyKind::Range(RangeBound::Start),
                ),
                (
                    range.end_time_filter_key.as_str(),
                    FilterKeyKind::Range(RangeBound::End),
                ),
            ];
        }

        let mut keys = Vec::new();
        if let Some(key) = &options.rows_query_filter_key {
            keys.push((key.as_str(), FilterKeyKind::Exact));
        }
        if let Some(key) = &options.rows_query_substring_filter_key {
            keys.push((key.as_str(), FilterKeyKind::Substring));
        }
        keys
    }

    /// Rebuilds an entry from the `value`/`name` pair stored in the address.
    pub(crate) fn restored_entry(
        &self,
        key: &str,
        kind: FilterKeyKind,
        value: Value,
        name: String,
    ) -> FilterEntry {
        match kind {
            FilterKeyKind::Range(bound) => FilterEntry::new(key, value, bound.pill_label(), name),
            FilterKeyKind::Exact | FilterKeyKind::Substring => {
                let mut label = self.pill_label().to_string();
                if kind == FilterKeyKind::Substring {
                    label.push_str(SUBSTRING_SUFFIX);
                }
                let filter_value = if self.filters_on_value() {
                    value
                } else {
                    Value::String(name.clone())
                };
                FilterEntry::new(key, filter_value, label, name)
            }
        }
    }

    fn filters_on_value(&self) -> bool {
        self.filter_options
            .as_ref()
            .is_none_or(|o| o.menu_options.filter_on_value)
    }

    /// Builds the filter for a menu selection.
    ///
    /// A blank value (missing, `null`, `false` or `""`) is free text: it goes
    /// to the substring key when one is configured, and always filters on
    /// the typed name.
    pub fn select(&self, name: &str, value: Option<Value>) -> Result<Selection, ConfigError> {
        let options = self
            .filter_options
            .as_ref()
            .ok_or_else(|| ConfigError::not_filterable(&self.name))?;

        let mut filter_key = options.rows_query_filter_key.clone();
        let mut filter_value = if options.menu_options.filter_on_value {
            value
        } else {
            Some(Value::String(name.to_string()))
        };
        let mut pill_label = self.pill_label().to_string();
        let mut is_single = options.menu_options.replace_existing_filter;

        if filter_value.as_ref().is_none_or(is_blank) {
            if let Some(key) = &options.rows_query_substring_filter_key {
                filter_key = Some(key.clone());
                pill_label.push_str(SUBSTRING_SUFFIX);
                is_single = true;
            }
            filter_value = Some(Value::String(name.to_string()));
        }

        let filter_key = filter_key.ok_or_else(|| ConfigError::not_filterable(&self.name))?;

        Ok(Selection {
            entry: FilterEntry::new(
                filter_key,
                filter_value.unwrap_or(Value::Null),
                pill_label,
                name,
            ),
            is_single,
        })
    }

    /// Builds the filter for one end of a date-time range.
    ///
    /// The data source receives epoch milliseconds; the pill shows the UTC
    /// timestamp.
    pub fn select_range(&self, bound: RangeBound, at: DateTime<Utc>) -> Result<FilterEntry, ConfigError> {
        let range = self
            .range_options()
            .ok_or_else(|| ConfigError::not_range_filter(&self.name))?;

        let key = match bound {
            RangeBound::Start => &range.start_time_filter_key,
            RangeBound::End => &range.end_time_filter_key,
        };

        Ok(FilterEntry::new(
            key.clone(),
            at.timestamp_millis(),
            bound.pill_label(),
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
