//! Error types for design-epoch search and chart assembly.

use std::error::Error;
use std::fmt::{Display, Formatter};

use mandala_core::PositionUnavailable;
use mandala_time::TimeError;

/// Errors from the design-epoch search.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// Search configuration is out of bounds.
    InvalidConfig(&'static str),
    /// The Sun could not be evaluated at some step of the search.
    Position(PositionUnavailable),
    /// Iterative algorithm did not reach the tolerance.
    NoConvergence(&'static str),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid search config: {msg}"),
            Self::Position(e) => write!(f, "position error: {e}"),
            Self::NoConvergence(msg) => write!(f, "no convergence: {msg}"),
        }
    }
}

impl Error for SearchError {}

impl From<PositionUnavailable> for SearchError {
    fn from(e: PositionUnavailable) -> Self {
        Self::Position(e)
    }
}

/// Errors that reject a chart request outright.
///
/// Both variants are raised before the position provider is called.
/// An unresolvable body is not an error; it becomes an unknown activation.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChartError {
    /// Birth date/time, offset or coordinates are not acceptable.
    InvalidInput(String),
    /// Chart configuration is out of bounds.
    InvalidConfig(&'static str),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid chart config: {msg}"),
        }
    }
}

impl Error for ChartError {}

impl From<TimeError> for ChartError {
    fn from(e: TimeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}
