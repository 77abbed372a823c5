// File: crates/timechart-core/src/time.rs
// Summary: Sampling resolution and calendar grouping (UTC) for chart timestamps.
// Notes:
// - Timestamps are milliseconds since the Unix epoch.
// - Out-of-range timestamps are returned unchanged by calendar helpers.

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Timelike, Utc};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Sampling granularity of a chart's x-axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Day,
    Hour,
    FiveMin,
}

impl Resolution {
    pub const fn duration_millis(self) -> i64 {
        match self {
            Resolution::Day => DAY,
            Resolution::Hour => HOUR,
            Resolution::FiveMin => 5 * MINUTE,
        }
    }

    /// Distance between two timestamps, in resolution steps.
    pub fn distance(self, from: i64, to: i64) -> f32 {
        ((to - from) as f64 / self.duration_millis() as f64) as f32
    }

    /// Moves `time` by `amount` steps. All steps are fixed-length in UTC.
    pub fn add(self, time: i64, amount: i64) -> i64 {
        time + self.duration_millis() * amount
    }
}

/// Calendar groups used to align labels and finder snapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    Day,
    Month,
}

impl GroupBy {
    /// Nominal group length; a month counts as 30 days.
    pub const fn duration_millis(self) -> i64 {
        match self {
            GroupBy::Day => DAY,
            GroupBy::Month => 30 * DAY,
        }
    }

    /// Approximate number of resolution steps in one group.
    pub fn steps_count(self, resolution: Resolution) -> i64 {
        (self.duration_millis() as f64 / resolution.duration_millis() as f64).round() as i64
    }

    /// Distance between two timestamps, in (nominal) groups.
    pub fn distance(self, from: i64, to: i64) -> f32 {
        ((to - from) as f64 / self.duration_millis() as f64) as f32
    }

    pub fn is_start(self, time: i64) -> bool {
        let Some(dt) = utc(time) else { return false };
        match self {
            GroupBy::Day => dt.hour() == 0 && dt.minute() == 0,
            GroupBy::Month => dt.day() == 1,
        }
    }

    /// Group start at or before `time` (`direction <= 0`) or at or after it (`direction > 0`).
    pub fn closest_start(self, time: i64, direction: i32) -> i64 {
        if self.is_start(time) {
            return time;
        }
        let Some(dt) = utc(time) else { return time };

        let start = match self {
            GroupBy::Day => {
                let midnight = dt.date_naive().and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
                midnight.map(|m| if direction > 0 { m + Duration::days(1) } else { m })
            }
            GroupBy::Month => dt
                .with_day(1)
                .and_then(|m| if direction > 0 { m.checked_add_months(Months::new(1)) } else { Some(m) }),
        };

        start.map(|s| s.timestamp_millis()).unwrap_or(time)
    }

    /// Moves `time` by `amount` whole groups (calendar months clamp the day of month).
    pub fn add(self, time: i64, amount: i32) -> i64 {
        let Some(dt) = utc(time) else { return time };
        let moved = match self {
            GroupBy::Day => dt.checked_add_signed(Duration::days(amount as i64)),
            GroupBy::Month if amount >= 0 => dt.checked_add_months(Months::new(amount as u32)),
            GroupBy::Month => dt.checked_sub_months(Months::new(amount.unsigned_abs())),
        };
        moved.map(|m| m.timestamp_millis()).unwrap_or(time)
    }
}

fn utc(time: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(time).single()
}
