// File: crates/timechart-core/src/format.rs
// Summary: Default label formatters for timestamps (UTC) and values.

use chrono::{TimeZone, Utc};

/// "Jan 5" style date, UTC.
pub fn format_date_short(timestamp: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp).single() {
        Some(dt) => dt.format("%b %-d").to_string(),
        None => timestamp.to_string(),
    }
}

/// "14:05" style time of day, UTC.
pub fn format_time(timestamp: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

/// Integer with space-separated thousands: `1 234 567`.
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Abbreviates `value` with the unit chosen from the axis maximum `max`.
pub fn format_compact(value: i64, max: i64) -> String {
    let v = value as f64;
    if value == 0 {
        "0".to_string()
    } else if max >= 10_000_000 {
        format!("{:.0}M", v / 1_000_000.0)
    } else if max >= 1_000_000 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if max >= 10_000 {
        format!("{:.0}K", v / 1_000.0)
    } else if max >= 1_000 {
        format!("{:.1}K", v / 1_000.0)
    } else {
        value.to_string()
    }
}
