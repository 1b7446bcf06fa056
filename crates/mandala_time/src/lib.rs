//! Calendar and UTC handling for the chart engine.
//!
//! This crate provides:
//! - Julian Date ↔ calendar conversions
//! - `UtcTime` (calendar form) and `UtcEpoch` (JD form) for UTC instants
//! - Local wall-clock → UTC normalization with an explicit fixed offset
//! - The supported birth-year range check

pub mod error;
pub mod julian;
pub mod local;
pub mod utc_time;

pub use error::TimeError;
pub use julian::{
    DAYS_PER_CENTURY, J2000_JD, SECONDS_PER_DAY, calendar_to_jd, jd_to_calendar, jd_to_centuries,
};
pub use local::{
    MAX_OFFSET_MINUTES, SupportedRange, local_to_utc, offset_from_minutes, parse_offset,
};
pub use utc_time::{UtcEpoch, UtcTime};

// Re-export the chrono types that appear in this crate's public API.
pub use chrono::{FixedOffset, NaiveDate, NaiveTime};
