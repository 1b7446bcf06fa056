//! UTC calendar date/time and the JD-based [`UtcEpoch`].
//!
//! `UtcTime` is the human-facing calendar form; `UtcEpoch` is what the
//! position boundary and the design-epoch search work with. Leap seconds
//! are not modelled: one UTC day is always 86 400 s.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

use crate::julian::{SECONDS_PER_DAY, calendar_to_jd, jd_to_calendar, jd_to_centuries};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Julian Date (UTC) of this calendar instant.
    pub fn to_jd(&self) -> f64 {
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / SECONDS_PER_DAY;
        calendar_to_jd(self.year, self.month, day_frac)
    }

    /// Calendar form of a Julian Date (UTC), rounded to the millisecond.
    pub fn from_jd(jd: f64) -> Self {
        // Work in integer milliseconds so 23:59:59.9999 carries into the next day.
        let total_ms = ((jd + 0.5) * MILLIS_PER_DAY as f64).round() as i64;
        let day_number = total_ms.div_euclid(MILLIS_PER_DAY);
        let ms_of_day = total_ms.rem_euclid(MILLIS_PER_DAY);

        let (year, month, day_frac) = jd_to_calendar(day_number as f64 - 0.5);
        let hour = (ms_of_day / 3_600_000) as u32;
        let minute = ((ms_of_day % 3_600_000) / 60_000) as u32;
        let second = (ms_of_day % 60_000) as f64 / 1000.0;
        Self {
            year,
            month,
            day: day_frac.round() as u32,
            hour,
            minute,
            second,
        }
    }
}

impl From<NaiveDateTime> for UtcTime {
    fn from(dt: NaiveDateTime) -> Self {
        let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
        Self::new(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            second,
        )
    }
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

impl Serialize for UtcTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A UTC instant represented as a Julian Date.
///
/// This is the time type handed to position providers. Bit-identical
/// epochs compare equal, which is what the per-request memo relies on.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UtcEpoch {
    jd_utc: f64,
}

impl UtcEpoch {
    pub fn from_jd_utc(jd_utc: f64) -> Self {
        Self { jd_utc }
    }

    pub fn from_utc(time: &UtcTime) -> Self {
        Self {
            jd_utc: time.to_jd(),
        }
    }

    /// Julian Date (UTC).
    pub fn as_jd_utc(self) -> f64 {
        self.jd_utc
    }

    /// Julian centuries since J2000.0 (UTC used as a stand-in for TT).
    pub fn centuries_since_j2000(self) -> f64 {
        jd_to_centuries(self.jd_utc)
    }

    /// Shift by a (possibly fractional, possibly negative) number of days.
    pub fn add_days(self, days: f64) -> Self {
        Self {
            jd_utc: self.jd_utc + days,
        }
    }

    /// Signed day difference `self - other`.
    pub fn days_since(self, other: UtcEpoch) -> f64 {
        self.jd_utc - other.jd_utc
    }

    pub fn to_utc(self) -> UtcTime {
        UtcTime::from_jd(self.jd_utc)
    }

    /// Memo key for this epoch.
    pub fn key_bits(self) -> u64 {
        self.jd_utc.to_bits()
    }
}
