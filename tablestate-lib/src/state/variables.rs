//! Data source variables.

use log::trace;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::CursorPager;
use super::FilterStore;
use super::SortState;

/// Builds the variables object sent to the data source.
///
/// Starts from `base`, merges the active filters over `base.filters` (the
/// active filters win on key clashes), and sets `after`, `first` and
/// `orderBy`. The result has this shape:
///
/// ```json
/// {
///   "filters": { "status": "ACTIVE", "tag": ["a", "b"] },
///   "after": null,
///   "first": 10,
///   "orderBy": { "sort": "NAME", "direction": "ASC" }
/// }
/// ```
pub fn build(
    filters: &FilterStore,
    sort: &SortState,
    pager: &CursorPager,
    base: &Map<String, Value>,
) -> Value {
    let mut variables = base.clone();

    let mut merged = match base.get("filters") {
        Some(Value::Object(base_filters)) => base_filters.clone(),
        _ => Map::new(),
    };
    merged.extend(filters.to_query_fragment());

    variables.insert("filters".to_string(), Value::Object(merged));
    variables.insert("after".to_string(), json!(pager.after_cursor()));
    variables.insert("first".to_string(), json!(pager.rows_per_page()));
    variables.insert(
        "orderBy".to_string(),
        json!({
            "sort": sort.sort_key(),
            "direction": sort.direction().as_str(),
        }),
    );

    let variables = Value::Object(variables);
    trace!("variables: {}", variables);
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;
    use crate::model::FilterEntry;

    #[test]
    fn test_defaults() {
        let variables = build(
            &FilterStore::new(),
            &SortState::new(None, Direction::Desc),
            &CursorPager::new(10),
            &Map::new(),
        );

        assert_eq!(
            variables,
            json!({
                "filters": {},
                "after": null,
                "first": 10,
                "orderBy": { "sort": null, "direction": "DESC" }
            })
        );
    }

    #[test]
    fn test_state_filters_overlay_base() {
        let mut filters = FilterStore::new();
        filters.apply(FilterEntry::new("status", "ACTIVE", "Status", "Active"), true);
        filters.apply(FilterEntry::new("tag", "a", "Tag", "A"), false);

        let base = json!({
            "workspace": "w-1",
            "first": 999,
            "filters": { "status": "ANY", "archived": false }
        });
        let Value::Object(base) = base else {
            unreachable!()
        };

        let mut pager = CursorPager::new(25);
        pager.observe_end_cursor("c1");
        pager.on_page_change(1).unwrap();

        let variables = build(
            &filters,
            &SortState::new(Some("NAME".into()), Direction::Asc),
            &pager,
            &base,
        );

        assert_eq!(variables["workspace"], "w-1");
        assert_eq!(
            variables["filters"],
            json!({ "status": "ACTIVE", "archived": false, "tag": ["a"] })
        );
        assert_eq!(variables["after"], "c1");
        assert_eq!(variables["first"], 25);
        assert_eq!(
            variables["orderBy"],
            json!({ "sort": "NAME", "direction": "ASC" })
        );
    }
}
