//! Wall-clock helpers shared by the decay engine and the effects ledger.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours from `start` to `now`, never negative.
pub fn hours_between(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let ms = (now - start).num_milliseconds().max(0);
    ms as f64 / MS_PER_HOUR
}

/// Convert fractional hours into a chrono duration (millisecond precision).
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * MS_PER_HOUR).round() as i64)
}

/// Local wall-clock time for a fixed UTC offset.
pub fn local_naive(now: DateTime<Utc>, offset_hours: i32) -> NaiveDateTime {
    (now + Duration::hours(offset_hours as i64)).naive_utc()
}

/// Local hour of day (0-23) for a fixed UTC offset.
pub fn local_hour(now: DateTime<Utc>, offset_hours: i32) -> u32 {
    local_naive(now, offset_hours).hour()
}
