//! Minute tick alignment

use core::time::Duration;

use chrono::{NaiveDateTime, Timelike};

/// Time left until the minute of `now` ends.
///
/// Exactly on a minute boundary this is a full minute.
pub fn until_next_minute(now: &NaiveDateTime) -> Duration {
    // Leap seconds report more than 10^9 nanoseconds
    let micros = (now.nanosecond() / 1_000).min(999_999) as u64;
    let into_minute = now.second() as u64 * 1_000_000 + micros;
    Duration::from_micros(60_000_000 - into_minute)
}
