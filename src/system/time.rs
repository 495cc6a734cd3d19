//! Time keeping module for PineTime
//!
//! The watch has no battery backed clock. Time is kept as a wall clock
//! reading together with the system instant it was taken at, and advanced
//! with the embassy time driver from there.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use embassy_time::{Duration, Instant};
use watchface::clock;

pub struct TimeReference {
    /// Local clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    const fn epoch() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }

    /// Create new time reference from a UTC timestamp in seconds
    pub fn from_timestamp(secs: i64, utc_offset: i32) -> Option<Self> {
        let utc = DateTime::from_timestamp(secs, 0)?.naive_utc();
        Some(Self::from_datetime(
            utc + ChronoDuration::seconds(utc_offset as i64),
        ))
    }

    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Create new time reference from Current Time Service data.
    ///
    /// Returns `None` if the bytes do not describe a valid date and time.
    pub fn from_cts_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 9 {
            return None;
        }

        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // bytes[7] is the day of week, derived from the date instead
        let milli = bytes[8] as u32 * 1000 / 256; // Convert fractions_256 to milliseconds

        let time = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_milli_opt(hour, min, sec, milli)?;

        Some(Self::from_datetime(time))
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Time measurement starting at the epoch until a reference is set
    pub const fn new() -> Self {
        Self {
            reference: TimeReference::epoch(),
        }
    }

    /// Get current local time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        self.reference.time + ChronoDuration::microseconds(elapsed.as_micros() as i64)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    /// Time left until the wall clock minute changes
    pub fn until_next_minute(&self) -> Duration {
        let wait = clock::until_next_minute(&self.get_time());
        Duration::from_micros(wait.as_micros() as u64)
    }
}
