//! Timestamp parsing and rendering.

use crate::descriptor::TimeFormat;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use std::fmt::Write;

/// Parse a timestamp. Patterns without an offset are read as UTC, and
/// date-only patterns as midnight UTC.
pub(crate) fn parse_time(format: TimeFormat, value: &str) -> chrono::ParseResult<DateTime<FixedOffset>> {
    match format {
        TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(value),
        TimeFormat::Pattern(pattern) => DateTime::parse_from_str(value, pattern)
            .or_else(|_| {
                NaiveDateTime::parse_from_str(value, pattern).map(|dt| dt.and_utc().fixed_offset())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(value, pattern)
                    .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
            }),
    }
}

/// Render a timestamp, or `None` when the pattern is unusable.
pub(crate) fn format_time(format: TimeFormat, value: &DateTime<FixedOffset>) -> Option<String> {
    match format {
        TimeFormat::Rfc3339 => Some(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        TimeFormat::Pattern(pattern) => {
            let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                return None;
            }
            let mut out = String::new();
            write!(out, "{}", value.format_with_items(items.iter())).ok()?;
            Some(out)
        }
    }
}
