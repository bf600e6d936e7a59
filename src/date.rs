//! Relative date expression resolution.
//!
//! Widget time ranges are declared as compact string expressions such as
//! "today", "7_days_ago", "this_month", or "2_years_ago", resolved against a
//! supplied "now". A literal YYYY-MM-DD date is the fallback when no relative
//! pattern matches.
//!
//! Expressions are matched by substring containment, not equality, so
//! suffixed or prefixed variants of a token still resolve. Aliases
//! (yesterday, last_week, last_month, last_year) are rewritten to their
//! canonical "1_unit_ago" form before interpretation.

use crate::error::{Result, WidgetError};
use time::macros::format_description;
use time::{Date, Duration, Month};

// Expression tokens, tested in this order.
const TODAY: &str = "today";
const DAYS_AGO: &str = "days_ago";
const THIS_WEEK: &str = "this_week";
const WEEKS_AGO: &str = "weeks_ago";
const THIS_MONTH: &str = "this_month";
const MONTHS_AGO: &str = "months_ago";
const THIS_YEAR: &str = "this_year";
const YEARS_AGO: &str = "years_ago";

// Aliases rewritten to their canonical count form.
const YESTERDAY: &str = "yesterday";
const LAST_WEEK: &str = "last_week";
const LAST_MONTH: &str = "last_month";
const LAST_YEAR: &str = "last_year";

/// A resolved calendar range, both ends inclusive.
///
/// `start <= end` is not guaranteed; an out-of-order range is passed through
/// to the provider as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        iso(self.end)
    }
}

/// Format a date as YYYY-MM-DD, the wire format every provider takes.
pub fn iso(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Which end of a range boundary an expression resolves to. Period
/// expressions ("this_week", "2_months_ago") yield the period's first day
/// for the start side and its last day for the end side.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Resolve a start and end expression independently against `now`.
///
/// Mixing categories is legal, e.g. start="this_month", end="today".
pub fn resolve_range(now: Date, start_expr: &str, end_expr: &str) -> Result<DateRange> {
    let start = resolve(now, &rewrite_alias(start_expr), Bound::Start)?;
    let end = resolve(now, &rewrite_alias(end_expr), Bound::End)?;

    Ok(DateRange { start, end })
}

fn rewrite_alias(expr: &str) -> String {
    if expr.contains(YESTERDAY) {
        return "1_days_ago".to_string();
    }
    if expr.contains(LAST_WEEK) {
        return "1_weeks_ago".to_string();
    }
    if expr.contains(LAST_MONTH) {
        return "1_months_ago".to_string();
    }
    if expr.contains(LAST_YEAR) {
        return "1_years_ago".to_string();
    }

    expr.to_string()
}

fn resolve(now: Date, expr: &str, bound: Bound) -> Result<Date> {
    if expr.contains(TODAY) {
        return Ok(now);
    }

    if expr.contains(DAYS_AGO) {
        let days = extract_count(expr)?;
        return days_before(now, days, expr);
    }

    if expr.contains(THIS_WEEK) {
        return Ok(pick(week_bounds(now, expr)?, bound));
    }

    if expr.contains(WEEKS_AGO) {
        let weeks = extract_count(expr)?;
        let base = days_before(now, weeks * 7, expr)?;
        return Ok(pick(week_bounds(base, expr)?, bound));
    }

    if expr.contains(THIS_MONTH) {
        return Ok(pick(month_bounds(now.year(), now.month(), expr)?, bound));
    }

    if expr.contains(MONTHS_AGO) {
        let months = extract_count(expr)?;
        let (year, month) = months_before(now, months, expr)?;
        return Ok(pick(month_bounds(year, month, expr)?, bound));
    }

    if expr.contains(THIS_YEAR) {
        return Ok(pick(year_bounds(now.year(), expr)?, bound));
    }

    if expr.contains(YEARS_AGO) {
        let years = extract_count(expr)?;
        let year = i32::try_from(i64::from(now.year()) - years)
            .map_err(|_| out_of_range(expr))?;
        return Ok(pick(year_bounds(year, expr)?, bound));
    }

    // Anything else must be a literal calendar date. This is the terminal
    // error for near-miss tokens too: "3_day_back" falls through to here.
    parse_literal(expr)
}

/// Extract the integer before the first `_` of a counted expression,
/// "5" in "5_weeks_ago".
fn extract_count(expr: &str) -> Result<i64> {
    let prefix = expr.split('_').next().unwrap_or_default();
    prefix
        .parse::<i64>()
        .map_err(|_| WidgetError::InvalidDateExpression {
            expr: expr.to_string(),
            reason: format!("count prefix {prefix:?} is not a number"),
        })
}

fn pick((start, end): (Date, Date), bound: Bound) -> Date {
    match bound {
        Bound::Start => start,
        Bound::End => end,
    }
}

fn days_before(date: Date, days: i64, expr: &str) -> Result<Date> {
    date.checked_sub(Duration::days(days))
        .ok_or_else(|| out_of_range(expr))
}

/// Monday and Sunday of the week containing `date`.
fn week_bounds(date: Date, expr: &str) -> Result<(Date, Date)> {
    let monday = date
        .checked_sub(Duration::days(i64::from(
            date.weekday().number_days_from_monday(),
        )))
        .ok_or_else(|| out_of_range(expr))?;
    let sunday = monday
        .checked_add(Duration::days(6))
        .ok_or_else(|| out_of_range(expr))?;

    Ok((monday, sunday))
}

/// First and last calendar day of the given month.
fn month_bounds(year: i32, month: Month, expr: &str) -> Result<(Date, Date)> {
    let first = Date::from_calendar_date(year, month, 1).map_err(|_| out_of_range(expr))?;
    let last = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .map_err(|_| out_of_range(expr))?;

    Ok((first, last))
}

/// The calendar month `months` before the month containing `now`.
fn months_before(now: Date, months: i64, expr: &str) -> Result<(i32, Month)> {
    let total = i64::from(now.year()) * 12 + i64::from(u8::from(now.month())) - 1 - months;
    let year = i32::try_from(total.div_euclid(12)).map_err(|_| out_of_range(expr))?;
    let month = Month::try_from(total.rem_euclid(12) as u8 + 1).map_err(|_| out_of_range(expr))?;

    Ok((year, month))
}

/// Jan 1 and Dec 31 of the given year.
fn year_bounds(year: i32, expr: &str) -> Result<(Date, Date)> {
    let first = Date::from_calendar_date(year, Month::January, 1).map_err(|_| out_of_range(expr))?;
    let last = Date::from_calendar_date(year, Month::December, 31).map_err(|_| out_of_range(expr))?;

    Ok((first, last))
}

fn parse_literal(expr: &str) -> Result<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(expr, &format).map_err(|err| WidgetError::InvalidDateExpression {
        expr: expr.to_string(),
        reason: format!("not a calendar date: {err}"),
    })
}

fn out_of_range(expr: &str) -> WidgetError {
    WidgetError::InvalidDateExpression {
        expr: expr.to_string(),
        reason: "resolved date is out of the supported calendar range".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use time::macros::date;

    // 2019-01-15 is a Tuesday; 2020-06-15 is a Monday.
    const NOW: Date = date!(2019 - 01 - 15);

    fn range(start: &str, end: &str) -> DateRange {
        resolve_range(NOW, start, end).unwrap()
    }

    #[test]
    fn today_returns_now_unchanged() {
        let r = range("today", "today");
        assert_eq!(r.start, NOW);
        assert_eq!(r.end, NOW);
    }

    #[test]
    fn days_ago_subtracts_calendar_days() {
        let r = range("7_days_ago", "today");
        assert_eq!(r.start, date!(2019 - 01 - 08));
        assert_eq!(r.end, NOW);
    }

    #[test]
    fn yesterday_is_one_day_ago() {
        assert_eq!(range("yesterday", "today"), range("1_days_ago", "today"));
    }

    #[test]
    fn alias_rewrite_is_idempotent() {
        // Resolving the canonical form yields the same range as the alias.
        assert_eq!(
            range("1_weeks_ago", "1_weeks_ago"),
            range("last_week", "last_week")
        );
    }

    #[test]
    fn this_week_runs_monday_to_sunday() {
        let r = range("this_week", "this_week");
        assert_eq!(r.start, date!(2019 - 01 - 14));
        assert_eq!(r.end, date!(2019 - 01 - 20));
    }

    #[test]
    fn weeks_ago_shifts_whole_weeks() {
        let r = range("1_weeks_ago", "1_weeks_ago");
        assert_eq!(r.start, date!(2019 - 01 - 07));
        assert_eq!(r.end, date!(2019 - 01 - 13));
    }

    #[test]
    fn this_month_spans_first_to_last_day() {
        // End-to-end scenario: start=this_month, end=today.
        let r = range("this_month", "today");
        assert_eq!(r.start, date!(2019 - 01 - 01));
        assert_eq!(r.end, NOW);
    }

    #[test]
    fn months_ago_crosses_year_boundary() {
        let r = range("2_months_ago", "2_months_ago");
        assert_eq!(r.start, date!(2018 - 11 - 01));
        assert_eq!(r.end, date!(2018 - 11 - 30));
    }

    #[test]
    fn last_month_has_correct_last_day() {
        let r = range("last_month", "last_month");
        assert_eq!(r.start, date!(2018 - 12 - 01));
        assert_eq!(r.end, date!(2018 - 12 - 31));
    }

    #[test]
    fn this_year_spans_jan_to_dec() {
        let r = range("this_year", "this_year");
        assert_eq!(r.start, date!(2019 - 01 - 01));
        assert_eq!(r.end, date!(2019 - 12 - 31));
    }

    #[test]
    fn years_ago_shifts_whole_years() {
        let r = range("2_years_ago", "2_years_ago");
        assert_eq!(r.start, date!(2017 - 01 - 01));
        assert_eq!(r.end, date!(2017 - 12 - 31));
    }

    #[test]
    fn literal_dates_parse() {
        let r = range("2018-05-04", "2018-06-01");
        assert_eq!(r.start, date!(2018 - 05 - 04));
        assert_eq!(r.end, date!(2018 - 06 - 01));
    }

    #[test]
    fn mixed_categories_are_legal() {
        let r = range("this_month", "2019-01-20");
        assert_eq!(r.start, date!(2019 - 01 - 01));
        assert_eq!(r.end, date!(2019 - 01 - 20));
    }

    #[test]
    fn start_after_end_passes_through() {
        let r = range("today", "7_days_ago");
        assert!(r.start > r.end);
    }

    #[test]
    fn containment_matches_suffixed_variants() {
        // A decorated token still matches its category by containment.
        assert_eq!(range("x_this_week_x", "today").start, date!(2019 - 01 - 14));
    }

    #[test]
    fn near_miss_token_fails_as_date_parse() {
        // Contains "day" but not "days_ago": must fall through to literal
        // parsing and fail there, not as an unknown category.
        let err = resolve_range(NOW, "3_day_back", "today").unwrap_err();
        match err {
            WidgetError::InvalidDateExpression { expr, reason } => {
                assert_eq!(expr, "3_day_back");
                assert!(reason.contains("not a calendar date"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_count_prefix_is_an_error() {
        let err = resolve_range(NOW, "x_days_ago", "today").unwrap_err();
        match err {
            WidgetError::InvalidDateExpression { expr, reason } => {
                assert_eq!(expr, "x_days_ago");
                assert!(reason.contains("not a number"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn end_side_error_names_the_end_expression() {
        let err = resolve_range(NOW, "today", "q_weeks_ago").unwrap_err();
        match err {
            WidgetError::InvalidDateExpression { expr, .. } => assert_eq!(expr, "q_weeks_ago"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn n_days_ago_subtracts_exactly_n(n in 0i64..3650) {
            let now = date!(2020 - 06 - 15);
            let r = resolve_range(now, &format!("{n}_days_ago"), "today").unwrap();
            prop_assert_eq!(r.start, now - Duration::days(n));
            prop_assert_eq!(r.end, now);
        }

        #[test]
        fn week_bounds_contain_now_and_span_seven_days(offset in 0i64..1000) {
            let now = date!(2020 - 06 - 15) + Duration::days(offset);
            let r = resolve_range(now, "this_week", "this_week").unwrap();
            prop_assert!(r.start <= now && now <= r.end);
            prop_assert_eq!(r.end - r.start, Duration::days(6));
            prop_assert_eq!(r.start.weekday(), time::Weekday::Monday);
        }
    }
}
