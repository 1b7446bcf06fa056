//! Error types for calendar and offset handling.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from local-time normalization or range checks.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// UTC offset outside ±18 hours.
    InvalidOffset { minutes: i32 },
    /// The wall-clock time does not map to exactly one instant.
    AmbiguousLocalTime,
    /// Calendar year outside the supported range.
    OutOfSupportedRange { year: i32 },
    /// Date, time, or offset text could not be parsed.
    Parse(String),
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOffset { minutes } => {
                write!(f, "UTC offset of {minutes} minutes is outside ±18h")
            }
            Self::AmbiguousLocalTime => write!(f, "local time does not map to a single instant"),
            Self::OutOfSupportedRange { year } => {
                write!(f, "year {year} is outside the supported range")
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl Error for TimeError {}

impl From<chrono::ParseError> for TimeError {
    fn from(e: chrono::ParseError) -> Self {
        Self::Parse(e.to_string())
    }
}
