//! Clock and date strings
//!
//! Both formatters write into caller owned buffers and hand back the written
//! part as `&str`, so the strings never need an allocator.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::error::Error;

/// Enough for `"23:59"`
pub const CLOCK_BUF_LEN: usize = 8;
/// Enough for `"Wed, Sep 30, 2026"`
pub const DATE_BUF_LEN: usize = 32;

/// Shown in the time layer until the first update
pub const CLOCK_PLACEHOLDER: &str = "00:00";
/// Shown in the date layer until the first update
pub const DATE_PLACEHOLDER: &str = "Xxx, Xxx 00, 0000";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format hours and minutes as `HH:MM`.
///
/// With `is_24h` the hour runs from `00` to `23`, otherwise from `01` to `12`
/// without an AM/PM suffix.
pub fn format_clock<'a>(
    buf: &'a mut [u8; CLOCK_BUF_LEN],
    time: &NaiveDateTime,
    is_24h: bool,
) -> Result<&'a str, Error> {
    let hour = if is_24h {
        time.hour()
    } else {
        time.hour12().1
    };

    Ok(format_no_std::show(
        buf,
        format_args!("{:02}:{:02}", hour, time.minute()),
    )?)
}

/// Format the date as `Www, Mmm DD, YYYY`, e.g. `Mon, Oct 19, 2026`.
pub fn format_date<'a>(
    buf: &'a mut [u8; DATE_BUF_LEN],
    time: &NaiveDateTime,
) -> Result<&'a str, Error> {
    Ok(format_no_std::show(
        buf,
        format_args!(
            "{}, {} {:02}, {}",
            weekday_abbrev(time.weekday()),
            MONTHS[time.month0() as usize],
            time.day(),
            time.year()
        ),
    )?)
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn clock_24h() {
        let mut buf = [0; CLOCK_BUF_LEN];
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 17, 5), true).unwrap(), "17:05");
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 0, 0), true).unwrap(), "00:00");
    }

    #[test]
    fn clock_12h() {
        let mut buf = [0; CLOCK_BUF_LEN];
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 17, 5), false).unwrap(), "05:05");
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 0, 30), false).unwrap(), "12:30");
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 12, 59), false).unwrap(), "12:59");
        assert_eq!(format_clock(&mut buf, &at(2026, 10, 19, 9, 1), false).unwrap(), "09:01");
    }

    #[test]
    fn clock_style_toggles_only_the_hour() {
        let time = at(2024, 3, 3, 23, 45);
        let mut buf = [0; CLOCK_BUF_LEN];
        let long = format_clock(&mut buf, &time, true).unwrap();
        assert_eq!(long, "23:45");
        let mut buf = [0; CLOCK_BUF_LEN];
        let short = format_clock(&mut buf, &time, false).unwrap();
        assert_eq!(short, "11:45");
    }

    #[test]
    fn date() {
        let mut buf = [0; DATE_BUF_LEN];
        assert_eq!(format_date(&mut buf, &at(2026, 10, 19, 8, 0)).unwrap(), "Mon, Oct 19, 2026");
        assert_eq!(format_date(&mut buf, &at(2024, 3, 3, 8, 0)).unwrap(), "Sun, Mar 03, 2024");
        assert_eq!(format_date(&mut buf, &at(1999, 12, 31, 8, 0)).unwrap(), "Fri, Dec 31, 1999");
    }

    #[test]
    fn date_fits_the_placeholder_width() {
        let mut buf = [0; DATE_BUF_LEN];
        let text = format_date(&mut buf, &at(2026, 9, 30, 8, 0)).unwrap();
        assert_eq!(text.len(), DATE_PLACEHOLDER.len());
    }
}
