//! Gate and line lookup on the 64-gate wheel.
//!
//! The ecliptic is divided into 64 equal arcs of 5.625 deg starting at
//! 0 deg of the zodiac. Each arc carries a gate number taken from the fixed,
//! non-sequential [`MANDALA_ORDER`]; each arc is split into 6 lines of
//! 0.9375 deg.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::util::normalize_360;

/// Number of gates on the wheel.
pub const GATE_COUNT: usize = 64;

/// Lines per gate.
pub const LINES_PER_GATE: u8 = 6;

/// Span of one gate: 360/64 = 5.625 degrees.
pub const GATE_SPAN: f64 = 360.0 / GATE_COUNT as f64;

/// Span of one line: 5.625/6 = 0.9375 degrees.
pub const LINE_SPAN: f64 = GATE_SPAN / LINES_PER_GATE as f64;

/// Gate numbers in wheel order, one per 5.625 deg arc from 0 deg.
#[rustfmt::skip]
pub const MANDALA_ORDER: [u8; GATE_COUNT] = [
    41, 19, 13, 49, 30, 55, 37, 63, 22, 36, 25, 17, 21, 51, 42,  3,
    27, 24,  2, 23,  8, 20, 16, 35, 45, 12, 15, 52, 39, 53, 62, 56,
    31, 33,  7,  4, 29, 59, 40, 64, 47,  6, 46, 18, 48, 57, 32, 50,
    28, 44,  1, 43, 14, 34,  9,  5, 26, 11, 10, 58, 38, 54, 61, 60,
];

/// A gate/line position on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateLine {
    /// Gate number, 1-64.
    pub gate: u8,
    /// Line within the gate, 1-6.
    pub line: u8,
    /// 0-based arc index on the wheel (0 = the arc starting at 0 deg).
    #[serde(skip)]
    pub wheel_index: u8,
    /// Decimal degrees within the gate [0.0, 5.625).
    #[serde(skip)]
    pub degrees_in_gate: f64,
}

impl Display for GateLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.gate, self.line)
    }
}

/// Determine gate and line from an ecliptic longitude.
///
/// Returns `None` only for NaN or infinite input, which is how an
/// unresolved position reaches this function. Every finite longitude maps;
/// `lon` and `lon + 360k` map identically.
pub fn gate_from_longitude(lon_deg: f64) -> Option<GateLine> {
    if !lon_deg.is_finite() {
        return None;
    }
    let lon = normalize_360(lon_deg);
    let idx = ((lon / GATE_SPAN).floor() as usize) % GATE_COUNT;
    let degrees_in_gate = (lon - idx as f64 * GATE_SPAN).max(0.0);
    let line_idx = (degrees_in_gate / LINE_SPAN).floor() as u8;
    // Floating-point overshoot at the upper arc edge must not yield line 7.
    let line = line_idx.min(LINES_PER_GATE - 1) + 1;

    Some(GateLine {
        gate: MANDALA_ORDER[idx],
        line,
        wheel_index: idx as u8,
        degrees_in_gate,
    })
}

/// Starting longitude of a gate's arc, or `None` if `gate` is not 1-64.
pub fn gate_arc_start(gate: u8) -> Option<f64> {
    MANDALA_ORDER
        .iter()
        .position(|&g| g == gate)
        .map(|idx| idx as f64 * GATE_SPAN)
}

/// True if `gate` is a valid gate number.
pub fn is_gate(gate: u8) -> bool {
    (1..=GATE_COUNT as u8).contains(&gate)
}
