//! Tab-separated feed ingestion.
//!
//! Each line is `timestamp<TAB>value`. Rows whose value is the `ERROR`
//! sentinel, is not a finite number, or whose timestamp cannot be read are
//! dropped silently.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::trace;

use crate::data_types::{DataPoint, Dataset};

/// Value written by the feed producer when a sample could not be taken.
pub const ERROR_SENTINEL: &str = "ERROR";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a whole feed body. Never fails; unusable rows are skipped.
pub fn parse_feed(raw: &str) -> Dataset {
    raw.lines()
        .enumerate()
        .filter_map(|(line_no, row)| {
            let point = parse_row(row);
            if point.is_none() && !row.trim().is_empty() {
                trace!(line = line_no + 1, row, "dropping feed row");
            }
            point
        })
        .collect()
}

/// Parses one `timestamp<TAB>value` record.
pub fn parse_row(row: &str) -> Option<DataPoint> {
    let mut cols = row.split('\t');
    let time_col = cols.next()?;
    let value_col = cols.next()?.trim();

    if value_col == ERROR_SENTINEL {
        return None;
    }
    let value = parse_value(value_col)?;
    let timestamp = parse_timestamp(time_col)?;
    Some(DataPoint::new(timestamp, value))
}

fn parse_value(col: &str) -> Option<f64> {
    if col.is_empty() {
        return None;
    }
    col.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient calendar parser. Inputs without an offset are read as UTC.
///
/// Accepts RFC 3339, RFC 2822, ISO-like dates with or without time and
/// offset, `date(1)` style output with a `UTC`/`GMT` zone, and bare epoch
/// seconds or milliseconds.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let without_zone = strip_utc_zone(s);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&without_zone, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
        }
    }

    parse_epoch(s)
}

fn strip_utc_zone(s: &str) -> String {
    s.split_whitespace()
        .filter(|tok| !matches!(*tok, "UTC" | "GMT" | "Z"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = s.parse().ok()?;
    // Anything past 1e11 would be a second count beyond year 5000.
    if n > 100_000_000_000 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}
