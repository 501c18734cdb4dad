//! Excel serial date conversion
//!
//! Serial dates count days (with a fractional time of day) from an epoch
//! that depends on the workbook's date system. The 1900 system keeps the
//! historical 1900-02-29 that never existed, so serials up to 59 are shifted
//! by a day to line up with real calendar dates.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Days between the 1900 epoch (as Excel counts it) and 1970-01-01
const UNIX_EPOCH_SERIAL: i64 = 25569;

/// Days between the 1900 and 1904 epochs
const DATE_1904_OFFSET: i64 = 1462;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Serial of 9999-12-31 in the 1900 system, the last day Excel can show
const MAX_SERIAL: f64 = 2_958_465.0;

/// Literal formats accepted for non-numeric date text, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Workbook date system (`workbookPr/@date1904`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateSystem {
    /// Day 1 is 1900-01-01 (Windows default)
    #[default]
    Excel1900,
    /// Day 0 is 1904-01-01 (legacy Mac)
    Excel1904,
}

impl DateSystem {
    /// Pick the system from the `date1904` flag
    pub fn from_1904_flag(date_1904: bool) -> Self {
        if date_1904 {
            DateSystem::Excel1904
        } else {
            DateSystem::Excel1900
        }
    }
}

/// Convert a serial date-time to Unix epoch seconds.
///
/// A zero day count is a pure time of day and yields seconds since midnight.
/// Returns `None` for serials that are not finite or lie past 9999-12-31 in
/// either direction.
///
/// ```
/// use stream_sheets_core::date::{serial_to_timestamp, DateSystem};
///
/// assert_eq!(serial_to_timestamp(25569.0, DateSystem::Excel1900), Some(0));
/// assert_eq!(serial_to_timestamp(0.5, DateSystem::Excel1900), Some(43200));
/// assert_eq!(serial_to_timestamp(1e20, DateSystem::Excel1900), None);
/// ```
pub fn serial_to_timestamp(serial: f64, system: DateSystem) -> Option<i64> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL {
        return None;
    }

    let day = serial.floor();
    let time = ((serial - day) * SECONDS_PER_DAY).round() as i64;
    let mut day = day as i64;

    if day == 0 {
        return Some(time);
    }
    if system == DateSystem::Excel1904 {
        day += DATE_1904_OFFSET;
    }
    if day <= 59 {
        day += 1;
    }

    Some((day - UNIX_EPOCH_SERIAL) * 86400 + time)
}

/// Convert cell text holding a date to Unix epoch seconds.
///
/// Numeric text is a serial date; anything else is parsed as a UTC literal
/// (RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DD` or a bare time of day).
/// Returns `None` when the text is neither, or the serial is out of range.
pub fn timestamp(raw: &str, system: DateSystem) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(serial) = raw.parse::<f64>() {
        return serial_to_timestamp(serial, system);
    }

    parse_literal(raw)
}

fn parse_literal(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(raw, fmt) {
            return Some(time.num_seconds_from_midnight() as i64);
        }
    }
    None
}

/// Render epoch seconds in UTC with a `strftime`-style pattern.
///
/// Returns `None` when the timestamp is out of range or the pattern is not
/// understood.
pub fn format_timestamp(secs: i64, pattern: &str) -> Option<String> {
    let dt = DateTime::from_timestamp(secs, 0)?;
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).ok()?;
    Some(out)
}
