//! Geocentric lunar longitude from a truncated periodic series.
//!
//! Mean arguments and the 13 largest longitude terms of Meeus,
//! *Astronomical Algorithms* (2nd ed.), Chapter 47, Table 47.A. The
//! truncation error is a few hundredths of a degree.
//!
//! The series yields longitude on the mean equinox of date; it is moved
//! to the J2000 equinox by subtracting general precession in longitude so
//! that every body shares one frame.

use crate::normalize_360;

/// General precession in longitude, degrees per Julian century (5029.0966").
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971_3;

/// Delaunay-style mean arguments in degrees: `[L', D, M, M', F]`.
fn mean_arguments(t: f64) -> [f64; 5] {
    [
        218.316_447_7 + 481_267.881_234_21 * t,
        297.850_192_1 + 445_267.111_403_4 * t,
        357.529_109_2 + 35_999.050_290_9 * t,
        134.963_396_4 + 477_198.867_505_5 * t,
        93.272_095_0 + 483_202.017_523_3 * t,
    ]
}

/// Periodic correction to the Moon's mean longitude, in degrees.
fn longitude_perturbation_deg(args: &[f64; 5]) -> f64 {
    // [nD, nM, nM', nF, amplitude_deg]
    #[rustfmt::skip]
    static TERMS: [[f64; 5]; 13] = [
        // nD   nM    nM'   nF   amplitude (deg)
        [ 0.0,  0.0,  1.0,  0.0,  6.288_774],
        [ 2.0,  0.0, -1.0,  0.0,  1.274_027],
        [ 2.0,  0.0,  0.0,  0.0,  0.658_314],
        [ 0.0,  0.0,  2.0,  0.0,  0.213_618],
        [ 0.0,  1.0,  0.0,  0.0, -0.185_116],
        [ 0.0,  0.0,  0.0,  2.0, -0.114_332],
        [ 2.0,  0.0, -2.0,  0.0,  0.058_793],
        [ 2.0, -1.0, -1.0,  0.0,  0.057_066],
        [ 2.0,  0.0,  1.0,  0.0,  0.053_322],
        [ 2.0, -1.0,  0.0,  0.0,  0.045_758],
        [ 0.0,  1.0, -1.0,  0.0, -0.040_923],
        [ 1.0,  0.0,  0.0,  0.0, -0.034_720],
        [ 0.0,  1.0,  1.0,  0.0, -0.030_383],
    ];

    let [_, d, m, mp, f] = *args;
    let mut correction = 0.0_f64;
    for term in &TERMS {
        let angle = term[0] * d + term[1] * m + term[2] * mp + term[3] * f;
        correction += term[4] * angle.to_radians().sin();
    }
    correction
}

/// Moon's geocentric ecliptic longitude, mean equinox of date, in [0, 360).
pub fn moon_longitude_of_date_deg(t: f64) -> f64 {
    let args = mean_arguments(t);
    normalize_360(args[0] + longitude_perturbation_deg(&args))
}

/// Moon's geocentric ecliptic longitude referred to the J2000 equinox.
///
/// `t` = Julian centuries since J2000.0.
pub fn moon_longitude_j2000_deg(t: f64) -> f64 {
    normalize_360(moon_longitude_of_date_deg(t) - PRECESSION_DEG_PER_CENTURY * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moon_at_j2000() {
        // Meeus-series value at J2000.0 is about 223.31 deg.
        let lon = moon_longitude_j2000_deg(0.0);
        assert!((lon - 223.31).abs() < 0.1, "moon = {lon}");
    }

    #[test]
    fn frames_coincide_at_j2000() {
        assert_eq!(moon_longitude_of_date_deg(0.0), moon_longitude_j2000_deg(0.0));
    }

    #[test]
    fn precession_shift_after_one_century() {
        let of_date = moon_longitude_of_date_deg(1.0);
        let j2000 = moon_longitude_j2000_deg(1.0);
        let shift = normalize_360(of_date - j2000);
        assert!((shift - PRECESSION_DEG_PER_CENTURY).abs() < 1e-9);
    }

    #[test]
    fn moon_moves_about_thirteen_degrees_per_day() {
        let day = 1.0 / 36_525.0;
        let rate = normalize_360(moon_longitude_j2000_deg(0.1 + day) - moon_longitude_j2000_deg(0.1));
        assert!(rate > 11.0 && rate < 15.5, "rate = {rate}");
    }

    #[test]
    fn meeus_example_47a_longitude() {
        // 1992 April 12, 0h TD: apparent longitude 133.162655 deg. The
        // truncated series, without nutation, lands within a tenth.
        let t = -0.077_221_081_451;
        let lon = moon_longitude_of_date_deg(t);
        assert!((lon - 133.16).abs() < 0.1, "moon = {lon}");
    }
}
