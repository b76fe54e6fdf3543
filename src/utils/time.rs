//! Timestamp parsing and display.
//!
//! The backend sends RFC 3339 strings, naive ISO strings without an offset,
//! or bare dates depending on the table. All of them are read as UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse any timestamp shape the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a timestamp with a chrono pattern; unparseable input is returned as-is.
pub fn format_timestamp(raw: &str, format: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Publication year from a date string, or from a leading four-digit year.
pub fn year_of(raw: &str) -> Option<i32> {
    if let Some(dt) = parse_timestamp(raw) {
        return Some(dt.year());
    }
    let prefix = raw.trim().get(..4)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

/// Normalize a user-entered date to `YYYY-MM-DD`.
pub fn to_iso_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Relative age: "Just now", "{h}h ago", "{d}d ago", then the formatted date.
pub fn time_ago(raw: &str, now: NaiveDateTime, date_format: &str) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let hours = (now - then).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours < 24 * 7 {
        format!("{}d ago", hours / 24)
    } else {
        then.format(date_format).to_string()
    }
}
