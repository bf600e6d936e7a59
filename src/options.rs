//! Option resolution: typed, defaulted views over a widget's string options.
//!
//! A widget declaration carries an unordered map of string options; all type
//! coercion happens here. Each extractor is independent and pure. Handlers
//! never mutate the caller's map: per-kind option injection goes through the
//! [`WidgetSpec::with_forced`] / [`WidgetSpec::with_default`] overlay, which
//! returns a new spec.

use crate::date::{self, DateRange};
use crate::error::{Result, WidgetError};
use serde::Deserialize;
use std::collections::BTreeMap;
use time::Date;

// Recognized option keys.
pub const OPTION_TITLE: &str = "title";
pub const OPTION_START_DATE: &str = "start_date";
pub const OPTION_END_DATE: &str = "end_date";
pub const OPTION_METRIC: &str = "metric";
pub const OPTION_METRICS: &str = "metrics";
pub const OPTION_DIMENSION: &str = "dimension";
pub const OPTION_DIMENSIONS: &str = "dimensions";
pub const OPTION_FILTERS: &str = "filters";
pub const OPTION_ORDER: &str = "order";
pub const OPTION_ROW_LIMIT: &str = "row_limit";
pub const OPTION_CHAR_LIMIT: &str = "char_limit";
pub const OPTION_TIME_PERIOD: &str = "time_period";
pub const OPTION_GLOBAL: &str = "global";
pub const OPTION_UNIT: &str = "unit";
pub const OPTION_FIRST_COLOR: &str = "first_color";
pub const OPTION_SECOND_COLOR: &str = "second_color";
pub const OPTION_THIRD_COLOR: &str = "third_color";
pub const OPTION_FOURTH_COLOR: &str = "fourth_color";
pub const OPTION_FIFTH_COLOR: &str = "fifth_color";

// Documented defaults.
pub const DEFAULT_METRIC: &str = "sessions";
pub const DEFAULT_START_DATE: &str = "7_days_ago";
pub const DEFAULT_END_DATE: &str = "today";
pub const DEFAULT_TIME_PERIOD: &str = "day";
pub const DEFAULT_ROW_LIMIT: i64 = 5;
pub const DEFAULT_CHAR_LIMIT: i64 = 20;

/// The string option map of one widget declaration.
pub type Options = BTreeMap<String, String>;

/// One declared dashboard panel: a widget kind plus its string options.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSpec {
    pub kind: String,

    #[serde(default)]
    pub options: Options,
}

impl WidgetSpec {
    pub fn new(kind: impl Into<String>, options: Options) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }

    /// A copy of this spec with `key` set to `value`, winning over any value
    /// the caller declared for that key.
    pub fn with_forced(&self, key: &str, value: &str) -> WidgetSpec {
        let mut options = self.options.clone();
        options.insert(key.to_string(), value.to_string());
        WidgetSpec {
            kind: self.kind.clone(),
            options,
        }
    }

    /// A copy of this spec with `key` set to `value` only when the caller did
    /// not declare it. Injected titles use this so an explicit `title` always
    /// wins.
    pub fn with_default(&self, key: &str, value: &str) -> WidgetSpec {
        let mut options = self.options.clone();
        options
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
        WidgetSpec {
            kind: self.kind.clone(),
            options,
        }
    }
}

/// The primary metric name, defaulting to sessions.
pub fn metric(options: &Options) -> String {
    options
        .get(OPTION_METRIC)
        .cloned()
        .unwrap_or_else(|| DEFAULT_METRIC.to_string())
}

/// The metric list, falling back to `defaults` when absent or empty.
pub fn metrics(options: &Options, defaults: &[&str]) -> Vec<String> {
    match options.get(OPTION_METRICS) {
        Some(value) if !value.trim().is_empty() => split_list(value),
        _ => defaults.iter().map(|m| (*m).to_string()).collect(),
    }
}

/// The single table dimension, with a handler-supplied default.
pub fn dimension(options: &Options, default: &str) -> String {
    match options.get(OPTION_DIMENSION) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

/// The dimension list; absent and empty-string both yield an empty list.
pub fn dimensions(options: &Options) -> Vec<String> {
    options
        .get(OPTION_DIMENSIONS)
        .map(|value| split_list(value))
        .unwrap_or_default()
}

pub fn filters(options: &Options) -> Vec<String> {
    options
        .get(OPTION_FILTERS)
        .map(|value| split_list(value))
        .unwrap_or_default()
}

/// Result ordering clauses, defaulting to the primary metric descending.
pub fn orders(options: &Options, primary_metric: &str) -> Vec<String> {
    match options.get(OPTION_ORDER) {
        Some(value) if !value.trim().is_empty() => split_list(value),
        _ => vec![format!("{primary_metric} desc")],
    }
}

/// A boolean flag: absent means false, anything unparseable is an error.
pub fn flag(options: &Options, key: &str) -> Result<bool> {
    match options.get(key) {
        None => Ok(false),
        Some(value) => {
            value
                .trim()
                .parse::<bool>()
                .map_err(|_| WidgetError::InvalidOptionValue {
                    option: key.to_string(),
                    value: value.clone(),
                    reason: "expected true or false".to_string(),
                })
        }
    }
}

/// An integer limit with a documented default.
pub fn int(options: &Options, key: &str, default: i64) -> Result<i64> {
    match options.get(key) {
        None => Ok(default),
        Some(value) => {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| WidgetError::InvalidOptionValue {
                    option: key.to_string(),
                    value: value.clone(),
                    reason: "expected a number".to_string(),
                })
        }
    }
}

pub fn time_period(options: &Options) -> String {
    options
        .get(OPTION_TIME_PERIOD)
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TIME_PERIOD.to_string())
}

/// The widget title. An explicit `title` option always overrides the
/// computed default; every handler applies this last.
pub fn title(options: &Options, default: &str) -> String {
    options
        .get(OPTION_TITLE)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Resolve the widget's declared time range against `now`, defaulting to the
/// trailing week.
pub fn time_range(options: &Options, now: Date) -> Result<DateRange> {
    let start = options
        .get(OPTION_START_DATE)
        .map(String::as_str)
        .unwrap_or(DEFAULT_START_DATE);
    let end = options
        .get(OPTION_END_DATE)
        .map(String::as_str)
        .unwrap_or(DEFAULT_END_DATE);

    date::resolve_range(now, start, end)
}

fn split_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    value
        .split(',')
        .map(|part| part.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::date;

    fn opts(pairs: &[(&str, &str)]) -> Options {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn metric_defaults_to_sessions() {
        assert_eq!(metric(&Options::new()), "sessions");
        assert_eq!(metric(&opts(&[("metric", "bounces")])), "bounces");
    }

    #[test]
    fn dimensions_split_and_trim() {
        let o = opts(&[("dimensions", " user_type , country ")]);
        assert_eq!(dimensions(&o), vec!["user_type", "country"]);
    }

    #[test]
    fn empty_dimensions_yield_empty_list() {
        // Not a one-element list containing "".
        assert_eq!(dimensions(&opts(&[("dimensions", "")])), Vec::<String>::new());
        assert_eq!(dimensions(&Options::new()), Vec::<String>::new());
    }

    #[test]
    fn flag_absent_is_false() {
        assert!(!flag(&Options::new(), OPTION_GLOBAL).unwrap());
        assert!(flag(&opts(&[("global", "true")]), OPTION_GLOBAL).unwrap());
    }

    #[test]
    fn flag_rejects_non_boolean() {
        let err = flag(&opts(&[("global", "yep")]), OPTION_GLOBAL).unwrap_err();
        match err {
            WidgetError::InvalidOptionValue { option, value, .. } => {
                assert_eq!(option, "global");
                assert_eq!(value, "yep");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn orders_default_to_primary_metric_desc() {
        assert_eq!(orders(&Options::new(), "sessions"), vec!["sessions desc"]);
        assert_eq!(
            orders(&opts(&[("order", "bounces asc, sessions desc")]), "sessions"),
            vec!["bounces asc", "sessions desc"]
        );
    }

    #[test]
    fn int_limits_parse_with_defaults() {
        assert_eq!(int(&Options::new(), OPTION_ROW_LIMIT, 5).unwrap(), 5);
        assert_eq!(
            int(&opts(&[("row_limit", "3")]), OPTION_ROW_LIMIT, 5).unwrap(),
            3
        );

        let err = int(&opts(&[("char_limit", "lots")]), OPTION_CHAR_LIMIT, 20).unwrap_err();
        match err {
            WidgetError::InvalidOptionValue { option, value, .. } => {
                assert_eq!(option, "char_limit");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_title_overrides_default() {
        assert_eq!(title(&opts(&[("title", "Mine")]), "computed"), "Mine");
        assert_eq!(title(&Options::new(), "computed"), "computed");
    }

    #[test]
    fn time_range_defaults_to_trailing_week() {
        let now = date!(2019 - 01 - 15);
        let range = time_range(&Options::new(), now).unwrap();
        assert_eq!(range.start, date!(2019 - 01 - 08));
        assert_eq!(range.end, now);
    }

    #[test]
    fn overlay_forced_wins_but_caller_map_is_untouched() {
        let spec = WidgetSpec::new("ga.bar", opts(&[("metric", "sessions")]));
        let overlaid = spec.with_forced(OPTION_METRIC, "users");

        assert_eq!(overlaid.options.get("metric").unwrap(), "users");
        assert_eq!(spec.options.get("metric").unwrap(), "sessions");
    }

    #[test]
    fn overlay_default_yields_to_caller_value() {
        let spec = WidgetSpec::new("ga.bar", opts(&[("title", "Mine")]));
        let overlaid = spec.with_default(OPTION_TITLE, " Injected ");
        assert_eq!(overlaid.options.get("title").unwrap(), "Mine");

        let bare = WidgetSpec::new("ga.bar", Options::new());
        let overlaid = bare.with_default(OPTION_TITLE, " Injected ");
        assert_eq!(overlaid.options.get("title").unwrap(), " Injected ");
    }
}
