//! Shared angle helpers.

pub use mandala_core::normalize_360;

/// Normalize an angle to (-180, 180] degrees.
pub fn normalize_pm180(deg: f64) -> f64 {
    let d = normalize_360(deg);
    if d > 180.0 { d - 360.0 } else { d }
}
