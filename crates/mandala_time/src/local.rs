//! Local wall-clock → UTC normalization with an explicit fixed offset.
//!
//! There is deliberately no timezone database here: the caller supplies the
//! offset, so daylight-saving and historical zone changes are the caller's
//! responsibility.

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::error::TimeError;
use crate::utc_time::UtcTime;

/// Largest accepted offset magnitude, in minutes (±18h).
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Build a fixed offset east of UTC from whole minutes.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, TimeError> {
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(TimeError::InvalidOffset { minutes });
    }
    FixedOffset::east_opt(minutes * 60).ok_or(TimeError::InvalidOffset { minutes })
}

/// Parse an offset such as `+08:00`, `-0530`, `+8`, `Z` or `UTC`.
pub fn parse_offset(text: &str) -> Result<FixedOffset, TimeError> {
    let s = text.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return offset_from_minutes(0);
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(TimeError::Parse(format!("offset must start with + or -: {s}"))),
    };
    let (hours, minutes) = if let Some((h, m)) = rest.split_once(':') {
        (h, m)
    } else if rest.len() == 4 {
        rest.split_at(2)
    } else {
        (rest, "0")
    };
    let hours: i32 = hours
        .parse()
        .map_err(|_| TimeError::Parse(format!("bad offset hours: {s}")))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| TimeError::Parse(format!("bad offset minutes: {s}")))?;
    if !(0..60).contains(&minutes) {
        return Err(TimeError::Parse(format!("bad offset minutes: {s}")));
    }
    offset_from_minutes(sign * (hours * 60 + minutes))
}

/// Convert a local date + wall-clock time at a fixed offset into UTC.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<UtcTime, TimeError> {
    let local = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or(TimeError::AmbiguousLocalTime)?;
    Ok(UtcTime::from(local.naive_utc()))
}

/// Inclusive range of calendar years accepted as birth input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedRange {
    pub min_year: i32,
    pub max_year: i32,
}

impl SupportedRange {
    pub const fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    pub fn check(&self, year: i32) -> Result<(), TimeError> {
        if year < self.min_year || year > self.max_year {
            return Err(TimeError::OutOfSupportedRange { year });
        }
        Ok(())
    }
}

impl Default for SupportedRange {
    fn default() -> Self {
        Self::new(1800, 2050)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn utc_plus_eight_moves_back_a_day() {
        let offset = offset_from_minutes(480).unwrap();
        let utc = local_to_utc(date(1995, 1, 1), time(4, 30), offset).unwrap();
        assert_eq!(utc, UtcTime::new(1994, 12, 31, 20, 30, 0.0));
    }

    #[test]
    fn negative_offset_moves_forward() {
        let offset = parse_offset("-05:30").unwrap();
        let utc = local_to_utc(date(2010, 6, 1), time(22, 0), offset).unwrap();
        assert_eq!(utc, UtcTime::new(2010, 6, 2, 3, 30, 0.0));
    }

    #[test]
    fn parse_offset_forms() {
        assert_eq!(parse_offset("+08:00").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("+9").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("utc").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn parse_offset_rejects_garbage() {
        assert!(matches!(parse_offset("08:00"), Err(TimeError::Parse(_))));
        assert!(matches!(parse_offset("+ab"), Err(TimeError::Parse(_))));
        assert!(matches!(parse_offset("+05:75"), Err(TimeError::Parse(_))));
    }

    #[test]
    fn offset_beyond_eighteen_hours_rejected() {
        assert_eq!(
            offset_from_minutes(19 * 60),
            Err(TimeError::InvalidOffset { minutes: 1140 })
        );
        assert!(offset_from_minutes(-18 * 60).is_ok());
    }

    #[test]
    fn supported_range_bounds_inclusive() {
        let range = SupportedRange::default();
        assert!(range.check(1800).is_ok());
        assert!(range.check(2050).is_ok());
        assert_eq!(
            range.check(1799),
            Err(TimeError::OutOfSupportedRange { year: 1799 })
        );
        assert!(range.check(2051).is_err());
    }
}
