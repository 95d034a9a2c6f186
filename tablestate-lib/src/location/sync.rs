//! Query string serialization of filter and sort state.
//!
//! Parameters:
//!
//! - `sort` - the active sort key, omitted when unsorted
//! - `direction` - `ASC` or `DESC`
//! - one parameter per active filter key, holding `{"value": .., "name": ..}`
//!   or an array of those for multi-valued filters
//!
//! Only the value and the pill value are persisted. Pill labels are rebuilt
//! from column configuration on read, so a label that did not come from
//! configuration does not survive a reload.

use log::debug;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use url::Url;

use crate::model::ColumnConfig;
use crate::model::Direction;
use crate::model::FilterEntry;
use crate::model::FilterKeyKind;
use crate::model::FilterSlot;
use crate::state::FilterStore;
use crate::state::SortState;

use super::LocationPort;

/// A filter as stored in the query string.
#[derive(Debug, Deserialize)]
struct PersistedFilter {
    value: Value,
    name: String,
}

/// Table state recovered from an address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredState {
    pub filters: FilterStore,
    pub sort_key: Option<String>,
    pub direction: Option<Direction>,
}

/// Reads filter and sort state from `location`.
///
/// Only keys named by `columns` are considered. A parameter that is not
/// valid JSON, or whose JSON does not have the expected shape, is treated as
/// absent.
pub fn read(location: &str, columns: &[ColumnConfig]) -> RestoredState {
    let mut restored = RestoredState::default();

    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(e) => {
            warn!("cannot restore table state from '{}': {}", location, e);
            return restored;
        }
    };

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    restored.sort_key = param("sort");
    restored.direction = param("direction").and_then(|raw| match raw.parse() {
        Ok(direction) => Some(direction),
        Err(e) => {
            debug!("ignoring direction parameter: {}", e);
            None
        }
    });

    for column in columns {
        for (key, kind) in column.filter_keys() {
            let Some(raw) = param(key) else {
                continue;
            };
            match restore_slot(column, key, kind, &raw) {
                Some(slot) => restored.filters.restore(key.to_string(), slot),
                None => debug!("ignoring malformed filter parameter '{}': {}", key, raw),
            }
        }
    }

    restored
}

fn restore_slot(column: &ColumnConfig, key: &str, kind: FilterKeyKind, raw: &str) -> Option<FilterSlot> {
    let restore = |persisted: PersistedFilter| {
        column.restored_entry(key, kind, persisted.value, persisted.name)
    };

    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) if !matches!(kind, FilterKeyKind::Range(_)) => {
            let entries = items
                .into_iter()
                .map(|item| serde_json::from_value(item).ok().map(restore))
                .collect::<Option<Vec<_>>>()?;
            if entries.is_empty() {
                return None;
            }
            Some(FilterSlot::Multi(entries))
        }
        object @ Value::Object(_) => {
            let persisted = serde_json::from_value(object).ok()?;
            Some(FilterSlot::Single(restore(persisted)))
        }
        _ => None,
    }
}

/// Rebuilds the query string of `location` from `filters` and `sort`.
///
/// Existing parameters are dropped, not patched. Returns the new address,
/// or `None` if the current one could not be parsed.
pub fn write(location: &mut dyn LocationPort, filters: &FilterStore, sort: &SortState) -> Option<String> {
    let current = location.current();
    let mut url = match Url::parse(&current) {
        Ok(url) => url,
        Err(e) => {
            warn!("cannot persist table state to '{}': {}", current, e);
            return None;
        }
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    if let Some(sort_key) = sort.sort_key() {
        pairs.push(("sort".to_string(), sort_key.to_string()));
    }
    pairs.push(("direction".to_string(), sort.direction().to_string()));

    for (key, slot) in filters.iter() {
        let payload = match slot {
            FilterSlot::Single(entry) => persisted(entry),
            FilterSlot::Multi(entries) => Value::Array(entries.iter().map(persisted).collect()),
        };
        pairs.push((key.to_string(), payload.to_string()));
    }

    url.set_query(None);
    url.query_pairs_mut().extend_pairs(pairs);

    debug!("persisting table state: {}", url);
    location.replace(url.as_str());
    Some(url.into())
}

fn persisted(entry: &FilterEntry) -> Value {
    json!({
        "value": entry.filter_value,
        "name": entry.pill_value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::location::MemoryLocation;
    use crate::model::FilterOptions;
    use crate::model::RangeBound;

    fn columns() -> Vec<ColumnConfig> {
        vec![
            ColumnConfig::new("Name").with_sort_key("NAME"),
            ColumnConfig::new("Status").with_filter_options(
                FilterOptions::exact("status")
                    .with_pill_label("Status")
                    .replace_existing(),
            ),
            ColumnConfig::new("Owner").with_filter_options(
                FilterOptions::exact("ownerId")
                    .with_substring_key("ownerSubstring")
                    .with_pill_label("Owner"),
            ),
            ColumnConfig::new("Updated")
                .with_filter_options(FilterOptions::date_time("startUpdatedTime", "endUpdatedTime")),
        ]
    }

    fn query(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_read_sort_and_direction() {
        let restored = read("https://app.test/users?sort=EMAIL&direction=ASC", &columns());
        assert_eq!(restored.sort_key.as_deref(), Some("EMAIL"));
        assert_eq!(restored.direction, Some(Direction::Asc));
        assert!(restored.filters.is_empty());

        let restored = read("https://app.test/users?sort=&direction=sideways", &columns());
        assert_eq!(restored, RestoredState::default());
    }

    #[test]
    fn test_read_uses_first_occurrence_only() {
        let restored = read("https://app.test/users?sort=EMAIL&sort=NAME", &columns());
        assert_eq!(restored.sort_key.as_deref(), Some("EMAIL"));

        let restored = read("https://app.test/users?sort=&sort=NAME&direction=&direction=ASC", &columns());
        assert_eq!(restored.sort_key, None);
        assert_eq!(restored.direction, None);
    }

    #[test]
    fn test_read_rebuilds_labels_from_columns() {
        let location = "https://app.test/users?status=%7B%22value%22%3A%22ACTIVE%22%2C%22name%22%3A%22Active%22%7D\
            &ownerId=%5B%7B%22value%22%3A%22u-1%22%2C%22name%22%3A%22Alice%22%7D%5D\
            &ownerSubstring=%7B%22value%22%3A%22bo%22%2C%22name%22%3A%22bo%22%7D\
            &startUpdatedTime=%7B%22value%22%3A1000%2C%22name%22%3A%221970-01-01T00%3A00%3A01Z%22%7D";
        let restored = read(location, &columns());

        assert_eq!(
            restored.filters.get("status"),
            Some(&FilterSlot::Single(FilterEntry::new("status", "ACTIVE", "Status", "Active")))
        );
        assert_eq!(
            restored.filters.get("ownerId"),
            Some(&FilterSlot::Multi(vec![FilterEntry::new("ownerId", "u-1", "Owner", "Alice")]))
        );
        assert_eq!(
            restored.filters.get("ownerSubstring"),
            Some(&FilterSlot::Single(FilterEntry::new("ownerSubstring", "bo", "Owner Contains", "bo")))
        );
        assert_eq!(
            restored.filters.get("startUpdatedTime"),
            Some(&FilterSlot::Single(FilterEntry::new(
                "startUpdatedTime",
                1000,
                "After",
                "1970-01-01T00:00:01Z"
            )))
        );
    }

    #[test]
    fn test_read_ignores_malformed_and_unknown() {
        let location = "https://app.test/users?status=not-json&ownerId=%5B%5D&unknown=%7B%7D\
            &ownerSubstring=%5B1%2C2%5D&endUpdatedTime=%5B%5D";
        let restored = read(location, &columns());
        assert!(restored.filters.is_empty());

        let restored = read("not a url", &columns());
        assert_eq!(restored, RestoredState::default());
    }

    #[test]
    fn test_write_rebuilds_query() {
        let mut filters = FilterStore::new();
        filters.apply(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
        filters.apply(FilterEntry::new("ownerId", "u-1", "Owner", "Alice"), false);
        filters.apply(FilterEntry::new("ownerId", "u-2", "Owner", "Bob"), false);
        let sort = SortState::new(Some("NAME".into()), Direction::Asc);

        let mut location = MemoryLocation::new("https://app.test/users?page=3&sort=OLD#top");
        let written = write(&mut location, &filters, &sort).unwrap();
        assert_eq!(location.current(), written);
        assert!(written.ends_with("#top"));

        let params = query(&written);
        assert_eq!(params.len(), 4);
        assert_eq!(params["sort"], "NAME");
        assert_eq!(params["direction"], "ASC");
        assert_eq!(
            serde_json::from_str::<Value>(&params["status"]).unwrap(),
            json!({ "value": "ACTIVE", "name": "Active" })
        );
        assert_eq!(
            serde_json::from_str::<Value>(&params["ownerId"]).unwrap(),
            json!([{ "value": "u-1", "name": "Alice" }, { "value": "u-2", "name": "Bob" }])
        );
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let columns = columns();
        let mut filters = FilterStore::new();

        let selection = columns[2].select("Alice", Some(json!("u-1"))).unwrap();
        filters.apply(selection.entry, selection.is_single);
        let selection = columns[2].select("Bob", Some(json!("u-2"))).unwrap();
        filters.apply(selection.entry, selection.is_single);
        let selection = columns[2].select("car", None).unwrap();
        filters.apply(selection.entry, selection.is_single);
        let at = chrono::DateTime::from_timestamp(1_600_000_000, 0).unwrap();
        filters.apply(columns[3].select_range(RangeBound::End, at).unwrap(), true);

        let sort = SortState::new(None, Direction::Desc);
        let mut location = MemoryLocation::new("https://app.test/users");
        let written = write(&mut location, &filters, &sort).unwrap();
        assert!(!query(&written).contains_key("sort"));

        let restored = read(&written, &columns);
        assert_eq!(restored.direction, Some(Direction::Desc));
        for (key, slot) in filters.iter() {
            assert_eq!(restored.filters.get(key), Some(slot), "key {}", key);
        }
        assert_eq!(restored.filters.len(), filters.len());
    }
}
