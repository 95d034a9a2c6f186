//! Replayable table actions.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;
use tablestate_lib::TableController;
use tablestate_lib::error::Error;
use tablestate_lib::model::RangeBound;

/// Returned when an action string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("Unknown action '{0}'")]
    Unknown(String),

    #[error("Action '{action}' expects {expected}")]
    Malformed {
        action: String,
        expected: &'static str,
    },
}

impl ParseActionError {
    fn malformed(action: &str, expected: &'static str) -> Self {
        Self::Malformed {
            action: action.to_string(),
            expected,
        }
    }
}

/// One user interaction with the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `sort:KEY`
    Sort(String),
    /// `filter:COLUMN=VALUE`, picks a menu option whose name is `VALUE`.
    Filter { column: String, value: String },
    /// `search:COLUMN=TEXT`, free-text entry in the column's menu.
    Search { column: String, text: String },
    /// `after:COLUMN=TIMESTAMP` or `before:COLUMN=TIMESTAMP`
    Range {
        column: String,
        bound: RangeBound,
        at: DateTime<Utc>,
    },
    /// `clear:KEY=VALUE`
    Clear { key: String, value: Value },
    /// `clear-all`
    ClearAll,
    /// `page:N`
    Page(usize),
    /// `next`
    Next,
    /// `prev`
    Prev,
    /// `rows:N`
    Rows(usize),
    /// `select:ID`, toggles one row.
    Select(String),
    /// `bulk-done`, a bulk action over the selection finished.
    BulkDone,
}

/// Parses a filter value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn pair<'a>(action: &str, arg: &'a str, expected: &'static str) -> Result<(&'a str, &'a str), ParseActionError> {
    match arg.split_once('=') {
        Some((left, right)) if !left.is_empty() => Ok((left, right)),
        _ => Err(ParseActionError::malformed(action, expected)),
    }
}

fn number(action: &str, arg: &str) -> Result<usize, ParseActionError> {
    arg.parse()
        .map_err(|_| ParseActionError::malformed(action, "a non-negative number"))
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = s.split_once(':').unwrap_or((s, ""));

        match name {
            "sort" if !arg.is_empty() => Ok(Action::Sort(arg.to_string())),
            "sort" => Err(ParseActionError::malformed(s, "a sort key")),
            "filter" => {
                let (column, value) = pair(s, arg, "COLUMN=VALUE")?;
                Ok(Action::Filter {
                    column: column.to_string(),
                    value: value.to_string(),
                })
            }
            "search" => {
                let (column, text) = pair(s, arg, "COLUMN=TEXT")?;
                Ok(Action::Search {
                    column: column.to_string(),
                    text: text.to_string(),
                })
            }
            "after" | "before" => {
                let (column, raw) = pair(s, arg, "COLUMN=RFC3339")?;
                let at = DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| ParseActionError::malformed(s, "an RFC 3339 timestamp"))?
                    .with_timezone(&Utc);
                let bound = if name == "after" {
                    RangeBound::Start
                } else {
                    RangeBound::End
                };
                Ok(Action::Range {
                    column: column.to_string(),
                    bound,
                    at,
                })
            }
            "clear" => {
                let (key, value) = pair(s, arg, "KEY=VALUE")?;
                Ok(Action::Clear {
                    key: key.to_string(),
                    value: parse_value(value),
                })
            }
            "clear-all" => Ok(Action::ClearAll),
            "page" => Ok(Action::Page(number(s, arg)?)),
            "next" => Ok(Action::Next),
            "prev" => Ok(Action::Prev),
            "rows" => Ok(Action::Rows(number(s, arg)?)),
            "select" if !arg.is_empty() => Ok(Action::Select(arg.to_string())),
            "select" => Err(ParseActionError::malformed(s, "a row id")),
            "bulk-done" => Ok(Action::BulkDone),
            _ => Err(ParseActionError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Sort(key) => write!(f, "sort:{}", key),
            Action::Filter { column, value } => write!(f, "filter:{}={}", column, value),
            Action::Search { column, text } => write!(f, "search:{}={}", column, text),
            Action::Range { column, bound, at } => {
                let name = match bound {
                    RangeBound::Start => "after",
                    RangeBound::End => "before",
                };
                write!(f, "{}:{}={}", name, column, at.to_rfc3339())
            }
            Action::Clear { key, value } => write!(f, "clear:{}={}", key, value),
            Action::ClearAll => f.write_str("clear-all"),
            Action::Page(page) => write!(f, "page:{}", page),
            Action::Next => f.write_str("next"),
            Action::Prev => f.write_str("prev"),
            Action::Rows(rows) => write!(f, "rows:{}", rows),
            Action::Select(id) => write!(f, "select:{}", id),
            Action::BulkDone => f.write_str("bulk-done"),
        }
    }
}

impl Action {
    /// Applies the action to `table`.
    pub fn apply(&self, table: &mut TableController) -> Result<(), Error> {
        match self {
            Action::Sort(key) => table.toggle_sort(key),
            Action::Filter { column, value } => {
                table.select_option(column, value, Some(parse_value(value)))?
            }
            Action::Search { column, text } => table.select_option(column, text, None)?,
            Action::Range { column, bound, at } => table.select_range(column, *bound, *at)?,
            Action::Clear { key, value } => table.clear_filter(key, value),
            Action::ClearAll => table.clear_all_filters(),
            Action::Page(page) => table.change_page(*page)?,
            Action::Next => table.change_page(table.pager().current_page() + 1)?,
            Action::Prev => {
                let page = table.pager().current_page().saturating_sub(1);
                table.change_page(page)?
            }
            Action::Rows(rows) => table.change_rows_per_page(*rows)?,
            Action::Select(id) => table.toggle_row(id.as_str()),
            Action::BulkDone => {
                table.complete_bulk_action();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("sort:name".parse(), Ok(Action::Sort("name".into())));
        assert_eq!(
            "filter:Team=red".parse(),
            Ok(Action::Filter {
                column: "Team".into(),
                value: "red".into()
            })
        );
        assert_eq!(
            "clear:age=42".parse(),
            Ok(Action::Clear {
                key: "age".into(),
                value: json!(42)
            })
        );
        assert_eq!("clear-all".parse(), Ok(Action::ClearAll));
        assert_eq!("page:2".parse(), Ok(Action::Page(2)));
        assert_eq!("rows:25".parse(), Ok(Action::Rows(25)));
        assert_eq!("select:u-1".parse(), Ok(Action::Select("u-1".into())));
        assert_eq!("bulk-done".parse(), Ok(Action::BulkDone));

        let Ok(Action::Range { bound, at, .. }) = "before:Updated=2024-01-02T03:04:05+02:00".parse() else {
            panic!("expected a range action");
        };
        assert_eq!(bound, RangeBound::End);
        assert_eq!(at.to_rfc3339(), "2024-01-02T01:04:05+00:00");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "jump:3".parse::<Action>(),
            Err(ParseActionError::Unknown("jump:3".into()))
        );
        assert!(matches!(
            "page:-1".parse::<Action>(),
            Err(ParseActionError::Malformed { .. })
        ));
        assert!("filter:red".parse::<Action>().is_err());
        assert!("filter:=red".parse::<Action>().is_err());
        assert!("after:Updated=yesterday".parse::<Action>().is_err());
        assert!("sort".parse::<Action>().is_err());
        assert!("select:".parse::<Action>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for raw in ["sort:name", "filter:Team=red", "clear:team=\"red\"", "page:3", "next"] {
            let action: Action = raw.parse().unwrap();
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }
}
