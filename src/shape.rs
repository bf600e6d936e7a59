//! Result shaping: pure transformations from raw provider rows into
//! renderer primitives.

use crate::error::{Result, WidgetError};
use crate::options::{
    Options, OPTION_FIFTH_COLOR, OPTION_FIRST_COLOR, OPTION_FOURTH_COLOR, OPTION_SECOND_COLOR,
    OPTION_THIRD_COLOR,
};
use crate::provider::StackedData;
use crate::render::{Color, StackedSeries, DEFAULT_PALETTE, MAX_STACKED_SERIES};
use tracing::warn;

/// Build table rows: a header row followed by at most
/// `min(row_limit, len(values))` data rows. Each row's label is trimmed,
/// truncated to `char_limit` characters, and placed before the metric
/// columns.
pub fn format_table(
    row_limit: i64,
    char_limit: i64,
    headers: &[String],
    labels: &[String],
    values: &[Vec<String>],
) -> Vec<Vec<String>> {
    let limit = usize::try_from(row_limit).unwrap_or(0).min(values.len());

    let mut table = Vec::with_capacity(limit + 1);
    table.push(headers.to_vec());

    for (label, row) in labels.iter().zip(values).take(limit) {
        let mut out = Vec::with_capacity(row.len() + 1);
        out.push(truncate(label, char_limit));
        out.extend(row.iter().cloned());
        table.push(out);
    }

    table
}

/// Trim surrounding whitespace and keep the first `char_limit` characters.
/// No ellipsis; an already-short label is unchanged.
pub fn truncate(label: &str, char_limit: i64) -> String {
    let limit = usize::try_from(char_limit).unwrap_or(0);
    label.trim().chars().take(limit).collect()
}

/// Capitalize the first letter of each alphabetic run:
/// "page_views" becomes "Page_Views".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }

    out
}

/// Default bar chart title, overridden by an explicit `title` option.
pub fn bar_title(metric: &str, time_period: &str) -> String {
    format!(" {} per {} ", title_case(metric), time_period)
}

/// Place provider series into the bounded stacked structure, dropping and
/// logging anything beyond the capacity of the rendering surface.
pub fn stacked_series(data: &StackedData) -> StackedSeries {
    let mut series = StackedSeries::new();
    for (name, values) in &data.series {
        if !series.push(name.clone(), values.clone()) {
            warn!(
                series = %name,
                cap = MAX_STACKED_SERIES,
                "dropping stacked-bar series beyond capacity"
            );
        }
    }

    series
}

/// Parse the five positional color override options.
pub fn color_overrides(options: &Options) -> Result<[Option<Color>; 5]> {
    const KEYS: [&str; 5] = [
        OPTION_FIRST_COLOR,
        OPTION_SECOND_COLOR,
        OPTION_THIRD_COLOR,
        OPTION_FOURTH_COLOR,
        OPTION_FIFTH_COLOR,
    ];

    let mut out = [None; 5];
    for (slot, key) in KEYS.iter().enumerate() {
        if let Some(value) = options.get(*key) {
            let color =
                Color::from_name(value).ok_or_else(|| WidgetError::InvalidOptionValue {
                    option: (*key).to_string(),
                    value: value.clone(),
                    reason: "not a recognized color name".to_string(),
                })?;
            out[slot] = Some(color);
        }
    }

    Ok(out)
}

/// One color per series, from the default palette in encounter order with
/// per-slot overrides. The palette cycles for series beyond the fifth.
pub fn stacked_colors(count: usize, overrides: &[Option<Color>; 5]) -> Vec<Color> {
    (0..count.min(MAX_STACKED_SERIES))
        .map(|idx| {
            overrides
                .get(idx)
                .copied()
                .flatten()
                .unwrap_or(DEFAULT_PALETTE[idx % DEFAULT_PALETTE.len()])
        })
        .collect()
}

/// Default stacked-bar title: the metric followed by every series name with
/// its resolved color, "/ "-separated.
pub fn stacked_title(metric: &str, series: &StackedSeries, colors: &[Color]) -> String {
    let metric = title_case(metric);
    let mut title = format!("{} - ", metric.trim_matches('_'));

    for (idx, (name, _)) in series.iter().enumerate() {
        if idx != 0 {
            title.push_str("/ ");
        }
        let color = colors
            .get(idx)
            .copied()
            .unwrap_or(DEFAULT_PALETTE[idx % DEFAULT_PALETTE.len()]);
        title.push_str(&format!("{} ({}) ", name, color.name()));
    }

    title
}

/// Default table title including the resolved range.
pub fn table_title(first_header: &str, start_iso: &str, end_iso: &str) -> String {
    format!("{first_header} from {start_iso} to {end_iso}")
}

/// Default total-box title including the resolved range.
pub fn total_title(metric: &str, start_iso: &str, end_iso: &str) -> String {
    format!("Total {metric} from {start_iso} to {end_iso}")
}

/// Render an uptime in seconds as "3d 4h 5m 6s", omitting leading zero
/// units.
pub fn format_uptime(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));

    parts.join(" ")
}
