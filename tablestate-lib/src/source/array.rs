//! In-memory data source.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SourceError;

use super::Connection;
use super::DataSource;
use super::PageInfo;

const DEFAULT_FIRST: u64 = 10;

/// Serves rows from a `Vec`.
///
/// Filtering and sorting are delegated to `filter_and_sort`, which receives
/// the full row set and the variables. Cursors are row offsets rendered as
/// strings, so page `n` is fetched after cursor `n * first`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tablestate_lib::source::{ArrayProvider, match_and_sort};
///
/// let rows = vec![json!({ "name": "b" }), json!({ "name": "a" })];
/// let provider = ArrayProvider::new(rows, match_and_sort);
/// assert_eq!(provider.rows().len(), 2);
/// ```
pub struct ArrayProvider<T, F> {
    rows: Vec<T>,
    filter_and_sort: F,
}

impl<T, F> ArrayProvider<T, F>
where
    T: Clone + Send + Sync,
    F: Fn(&[T], &Value) -> Vec<T> + Send + Sync,
{
    /// Creates a provider over `rows`.
    pub fn new(rows: Vec<T>, filter_and_sort: F) -> Self {
        Self {
            rows,
            filter_and_sort,
        }
    }

    /// Returns every row, unfiltered.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

fn offset(variables: &Value) -> Result<usize, SourceError> {
    match variables.get("after") {
        None | Some(Value::Null) => Ok(0),
        Some(Value::String(raw)) => raw
            .parse()
            .map_err(|_| SourceError::invalid_variable("after", format!("'{}' is not an offset", raw))),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| SourceError::invalid_variable("after", format!("{} is not an offset", n))),
        Some(other) => Err(SourceError::invalid_variable(
            "after",
            format!("unexpected value {}", other),
        )),
    }
}

#[async_trait]
impl<T, F> DataSource for ArrayProvider<T, F>
where
    T: Clone + Send + Sync,
    F: Fn(&[T], &Value) -> Vec<T> + Send + Sync,
{
    type Row = T;

    async fn fetch(&self, variables: &Value) -> Result<Connection<T>, SourceError> {
        let after = offset(variables)?;
        let first = variables
            .get("first")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_FIRST) as usize;

        let matched = (self.filter_and_sort)(&self.rows, variables);
        let end = after.saturating_add(first);
        let rows = matched
            .iter()
            .skip(after)
            .take(first)
            .cloned()
            .collect();

        Ok(Connection {
            rows,
            total_count: Some(matched.len()),
            page_info: PageInfo {
                has_next_page: end < matched.len(),
                has_previous_page: after != 0,
                end_cursor: Some(end.to_string()),
            },
        })
    }
}

/// Filters and sorts JSON object rows using the standard variables shape.
///
/// A row passes a filter when it lacks the filtered field, equals the
/// filter value, or is one of the values of a multi-valued filter. Rows are
/// ordered by the field named in `orderBy.sort`.
pub fn match_and_sort(rows: &[Value], variables: &Value) -> Vec<Value> {
    let filters = variables.get("filters").and_then(Value::as_object);

    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            filters.is_none_or(|filters| {
                filters
                    .iter()
                    .all(|(field, wanted)| field_matches(row, field, wanted))
            })
        })
        .cloned()
        .collect();

    if let Some(sort) = variables.pointer("/orderBy/sort").and_then(Value::as_str) {
        let descending = variables.pointer("/orderBy/direction").and_then(Value::as_str) == Some("DESC");
        matched.sort_by(|a, b| {
            let ordering = compare_fields(a.get(sort), b.get(sort));
            if descending { ordering.reverse() } else { ordering }
        });
    }

    matched
}

fn field_matches(row: &Value, field: &str, wanted: &Value) -> bool {
    let Some(actual) = row.get(field) else {
        return true;
    };
    match wanted {
        Value::Array(any) => any.contains(actual),
        Value::Null => true,
        other => other == actual,
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn people() -> Vec<Value> {
        vec![
            json!({ "name": "Carol", "age": 41, "team": "red" }),
            json!({ "name": "Alice", "age": 30, "team": "blue" }),
            json!({ "name": "Bob", "age": 25, "team": "red" }),
            json!({ "name": "Dave", "team": "green" }),
        ]
    }

    fn names(rows: &[Value]) -> Vec<&str> {
        rows.iter().filter_map(|r| r["name"].as_str()).collect()
    }

    #[test]
    fn test_match_and_sort() {
        let variables = json!({
            "filters": { "team": ["red", "green"], "unrelated": "x" },
            "orderBy": { "sort": "age", "direction": "DESC" }
        });
        let matched = match_and_sort(&people(), &variables);
        assert_eq!(names(&matched), vec!["Carol", "Bob", "Dave"]);

        let variables = json!({ "filters": { "team": "blue" }, "orderBy": { "sort": null } });
        assert_eq!(names(&match_and_sort(&people(), &variables)), vec!["Alice"]);
    }

    #[tokio::test]
    async fn test_offset_cursors() {
        let provider = ArrayProvider::new(people(), match_and_sort);
        let variables = json!({
            "first": 3,
            "after": null,
            "orderBy": { "sort": "name", "direction": "ASC" }
        });

        let page = provider.fetch(&variables).await.unwrap();
        assert_eq!(names(&page.rows), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(page.total_count, Some(4));
        assert_eq!(
            page.page_info,
            PageInfo {
                has_next_page: true,
                has_previous_page: false,
                end_cursor: Some("3".into()),
            }
        );

        let mut variables = variables;
        variables["after"] = json!("3");
        let page = provider.fetch(&variables).await.unwrap();
        assert_eq!(names(&page.rows), vec!["Dave"]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_bad_cursor() {
        let provider = ArrayProvider::new(people(), match_and_sort);
        let err = provider.fetch(&json!({ "after": "abc" })).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidVariable { ref name, .. } if name == "after"));
    }
}
