//! Analytic ephemeris from mean Keplerian elements.
//!
//! Heliocentric orbits use the J2000 mean elements and century rates of
//! E. M. Standish, "Keplerian Elements for Approximate Positions of the
//! Major Planets" (JPL), Table 1, valid 1800–2050. Geocentric positions
//! are planet − Earth–Moon barycenter; the Sun is −EMB. The Moon comes
//! from [`crate::lunar`].
//!
//! Output frame: ecliptic and mean equinox of J2000, geometric (no light
//! time, aberration or nutation). Accuracy is of order an arc-minute for
//! the inner planets, which is well inside one line (0.9375 deg).

use mandala_time::{UtcEpoch, calendar_to_jd};

use crate::lunar::moon_longitude_j2000_deg;
use crate::{CelestialBody, PositionProvider, PositionUnavailable, UnavailableReason, normalize_360};

/// Kepler solver stops once the eccentric-anomaly update is below this (radians).
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Hard cap on Newton steps for Kepler's equation.
const KEPLER_MAX_ITER: usize = 30;

/// Mean elements at J2000 and their rates per Julian century.
///
/// Order: `[a (AU), e, I (deg), L (deg), long. perihelion (deg), long. node (deg)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitalElements {
    at_j2000: [f64; 6],
    per_century: [f64; 6],
}

#[rustfmt::skip]
const MERCURY: OrbitalElements = OrbitalElements {
    at_j2000:    [0.38709927, 0.20563593,  7.00497902, 252.25032350,  77.45779628,  48.33076593],
    per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};

#[rustfmt::skip]
const VENUS: OrbitalElements = OrbitalElements {
    at_j2000:    [0.72333566, 0.00677672,  3.39467605, 181.97909950, 131.60246718,  76.67984255],
    per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};

#[rustfmt::skip]
const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    at_j2000:    [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};

#[rustfmt::skip]
const MARS: OrbitalElements = OrbitalElements {
    at_j2000:    [1.52371034, 0.09339410,  1.84969142, -4.55343205, -23.94362959,  49.55953891],
    per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};

#[rustfmt::skip]
const JUPITER: OrbitalElements = OrbitalElements {
    at_j2000:    [5.20288700, 0.04838624,  1.30439695, 34.39644051, 14.72847983, 100.47390909],
    per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};

#[rustfmt::skip]
const SATURN: OrbitalElements = OrbitalElements {
    at_j2000:    [9.53667594, 0.05386179,  2.48599187, 49.95424423, 92.59887831, 113.66242448],
    per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};

#[rustfmt::skip]
const URANUS: OrbitalElements = OrbitalElements {
    at_j2000:    [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};

#[rustfmt::skip]
const NEPTUNE: OrbitalElements = OrbitalElements {
    at_j2000:    [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};

#[rustfmt::skip]
const PLUTO: OrbitalElements = OrbitalElements {
    at_j2000:    [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    per_century: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration (radians).
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ecc
}

/// Heliocentric ecliptic J2000 position `[x, y, z]` in AU.
fn heliocentric_position(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let mut v = [0.0f64; 6];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = el.at_j2000[i] + el.per_century[i] * t;
    }
    let [a, e, incl, mean_lon, long_peri, long_node] = v;

    let arg_peri = (long_peri - long_node).to_radians();
    let node = long_node.to_radians();
    let incl = incl.to_radians();
    // Mean anomaly reduced to [-180, 180) before solving.
    let m = (normalize_360(mean_lon - long_peri + 180.0) - 180.0).to_radians();
    let ecc = eccentric_anomaly(m, e);

    let xp = a * (ecc.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc.sin();

    let (sw, cw) = arg_peri.sin_cos();
    let (so, co) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    [
        (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
        (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
        (sw * si) * xp + (cw * si) * yp,
    ]
}

/// Longitude in [0, 360) of a Cartesian ecliptic vector.
fn longitude_deg(xyz: &[f64; 3]) -> f64 {
    normalize_360(xyz[1].atan2(xyz[0]).to_degrees())
}

const fn elements_for(body: CelestialBody) -> Option<&'static OrbitalElements> {
    match body {
        CelestialBody::Mercury => Some(&MERCURY),
        CelestialBody::Venus => Some(&VENUS),
        CelestialBody::Mars => Some(&MARS),
        CelestialBody::Jupiter => Some(&JUPITER),
        CelestialBody::Saturn => Some(&SATURN),
        CelestialBody::Uranus => Some(&URANUS),
        CelestialBody::Neptune => Some(&NEPTUNE),
        CelestialBody::Pluto => Some(&PLUTO),
        CelestialBody::Sun | CelestialBody::Earth | CelestialBody::Moon => None,
    }
}

/// Position provider backed by mean orbital elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElementsProvider {
    valid_from_jd: f64,
    valid_to_jd: f64,
}

impl MeanElementsProvider {
    pub fn new() -> Self {
        Self {
            valid_from_jd: calendar_to_jd(1799, 1, 1.0),
            valid_to_jd: calendar_to_jd(2051, 1, 1.0),
        }
    }

    /// `(first, last)` Julian Dates (UTC) this provider will answer for.
    pub fn validity_jd(&self) -> (f64, f64) {
        (self.valid_from_jd, self.valid_to_jd)
    }
}

impl Default for MeanElementsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for MeanElementsProvider {
    fn name(&self) -> &'static str {
        "mean-elements"
    }

    fn ecliptic_longitude(
        &self,
        body: CelestialBody,
        epoch: UtcEpoch,
    ) -> Result<f64, PositionUnavailable> {
        let jd = epoch.as_jd_utc();
        if !jd.is_finite() || jd < self.valid_from_jd || jd > self.valid_to_jd {
            return Err(PositionUnavailable::new(
                body,
                epoch,
                UnavailableReason::EpochOutOfRange,
            ));
        }
        let t = epoch.centuries_since_j2000();

        let earth = heliocentric_position(&EARTH_MOON_BARYCENTER, t);
        let lon = match body {
            CelestialBody::Earth => {
                return Err(PositionUnavailable::new(
                    body,
                    epoch,
                    UnavailableReason::UnsupportedBody,
                ));
            }
            CelestialBody::Sun => longitude_deg(&[-earth[0], -earth[1], -earth[2]]),
            CelestialBody::Moon => moon_longitude_j2000_deg(t),
            planet => {
                let Some(elements) = elements_for(planet) else {
                    return Err(PositionUnavailable::new(
                        body,
                        epoch,
                        UnavailableReason::UnsupportedBody,
                    ));
                };
                let helio = heliocentric_position(elements, t);
                longitude_deg(&[
                    helio[0] - earth[0],
                    helio[1] - earth[1],
                    helio[2] - earth[2],
                ])
            }
        };
        Ok(lon)
    }
}
