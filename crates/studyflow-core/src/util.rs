//! Shared time and formatting helpers.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

/// UTC half-open bounds `[start, end)` of a calendar day.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = (date + Days::new(1)).and_time(NaiveTime::MIN).and_utc();
    (start, end)
}

/// First date of the trailing window of `days` calendar days ending today.
pub fn window_start(today: NaiveDate, days: u64) -> NaiveDate {
    today - Days::new(days.saturating_sub(1))
}

/// "1h 25m" / "25m" style rendering for CLI output.
pub fn format_minutes(minutes: u32) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}
