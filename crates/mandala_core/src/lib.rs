//! Celestial bodies and the ecliptic-longitude boundary.
//!
//! This crate provides the [`PositionProvider`] seam that any ephemeris
//! backend implements, the per-request [`LongitudeContext`] that memoizes
//! provider calls and derives Earth from the Sun, and
//! [`MeanElementsProvider`], an analytic backend built on mean orbital
//! elements.

pub mod lunar;
pub mod mean_elements;

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use mandala_time::UtcEpoch;
use serde::Serialize;

pub use mean_elements::MeanElementsProvider;

/// The eleven bodies that produce activations.
///
/// Declaration order is the chart order and drives `Ord`, so sorted
/// collections of bodies come out Sun first, Pluto last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CelestialBody {
    Sun,
    Earth,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// All bodies in chart order.
pub const ALL_BODIES: [CelestialBody; 11] = [
    CelestialBody::Sun,
    CelestialBody::Earth,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Uranus,
    CelestialBody::Neptune,
    CelestialBody::Pluto,
];

impl CelestialBody {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Earth => "Earth",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }

    /// All bodies in chart order.
    pub const fn all() -> &'static [CelestialBody; 11] {
        &ALL_BODIES
    }

    /// True for bodies whose longitude comes from another body rather
    /// than from the provider.
    pub const fn is_derived(self) -> bool {
        matches!(self, Self::Earth)
    }
}

impl Display for CelestialBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a provider could not produce a longitude.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum UnavailableReason {
    /// The backend has no model for this body.
    UnsupportedBody,
    /// The epoch falls outside the backend's validity window.
    EpochOutOfRange,
    /// The backend produced NaN or infinity.
    NonFinite,
    /// The backend gave up waiting.
    Timeout,
    /// Any other backend failure.
    Backend(String),
}

impl Display for UnavailableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedBody => write!(f, "unsupported body"),
            Self::EpochOutOfRange => write!(f, "epoch out of range"),
            Self::NonFinite => write!(f, "non-finite longitude"),
            Self::Timeout => write!(f, "timed out"),
            Self::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

/// A body's position could not be resolved at an epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUnavailable {
    pub body: CelestialBody,
    pub jd_utc: f64,
    pub reason: UnavailableReason,
}

impl PositionUnavailable {
    pub fn new(body: CelestialBody, epoch: UtcEpoch, reason: UnavailableReason) -> Self {
        Self {
            body,
            jd_utc: epoch.as_jd_utc(),
            reason,
        }
    }
}

impl Display for PositionUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} unavailable at JD {:.5}: {}",
            self.body, self.jd_utc, self.reason
        )
    }
}

impl Error for PositionUnavailable {}

/// Boundary to an ephemeris backend.
///
/// Implementations return the geocentric ecliptic longitude in degrees.
/// They are never asked for Earth; [`LongitudeContext`] derives it.
/// A backend that performs I/O must bound its own latency and report an
/// expired wait as [`UnavailableReason::Timeout`].
pub trait PositionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn ecliptic_longitude(
        &self,
        body: CelestialBody,
        epoch: UtcEpoch,
    ) -> Result<f64, PositionUnavailable>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn ecliptic_longitude(
        &self,
        body: CelestialBody,
        epoch: UtcEpoch,
    ) -> Result<f64, PositionUnavailable> {
        (**self).ecliptic_longitude(body, epoch)
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn ecliptic_longitude(
        &self,
        body: CelestialBody,
        epoch: UtcEpoch,
    ) -> Result<f64, PositionUnavailable> {
        (**self).ecliptic_longitude(body, epoch)
    }
}

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // A tiny negative input rounds up to exactly 360.0 above.
    if r >= 360.0 { r - 360.0 } else { r }
}

/// Earth's longitude is always opposite the Sun's.
pub fn earth_from_sun(sun_lon_deg: f64) -> f64 {
    normalize_360(sun_lon_deg + 180.0)
}

/// Telemetry from one chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryStats {
    pub evaluations: u32,
    pub cache_hits: u32,
}

/// Per-request memoization of provider calls.
///
/// Created at the start of a chart request and dropped at the end, so
/// concurrent requests share nothing. Keys use `epoch.key_bits()`: the
/// same instant reached twice within one request is bit-identical.
/// Failures are memoized too, so a body that is unavailable stays
/// unavailable for the rest of the request.
pub struct LongitudeContext<'a, P: PositionProvider + ?Sized> {
    provider: &'a P,
    cache: HashMap<(CelestialBody, u64), Result<f64, PositionUnavailable>>,
    evaluations: u32,
    cache_hits: u32,
}

impl<'a, P: PositionProvider + ?Sized> LongitudeContext<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            cache: HashMap::with_capacity(32),
            evaluations: 0,
            cache_hits: 0,
        }
    }

    pub fn provider(&self) -> &P {
        self.provider
    }

    /// Ecliptic longitude in [0, 360) for any of the eleven bodies.
    ///
    /// Earth is computed as Sun + 180 and never reaches the provider. An
    /// Earth failure is the Sun's failure re-labelled for Earth.
    pub fn longitude(
        &mut self,
        body: CelestialBody,
        epoch: UtcEpoch,
    ) -> Result<f64, PositionUnavailable> {
        if body == CelestialBody::Earth {
            return match self.longitude(CelestialBody::Sun, epoch) {
                Ok(sun) => Ok(earth_from_sun(sun)),
                Err(e) => Err(PositionUnavailable {
                    body: CelestialBody::Earth,
                    ..e
                }),
            };
        }

        let key = (body, epoch.key_bits());
        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits += 1;
            return cached.clone();
        }

        self.evaluations += 1;
        let result = match self.provider.ecliptic_longitude(body, epoch) {
            Ok(lon) if lon.is_finite() => Ok(normalize_360(lon)),
            Ok(_) => Err(PositionUnavailable::new(
                body,
                epoch,
                UnavailableReason::NonFinite,
            )),
            Err(e) => Err(e),
        };
        match &result {
            Ok(lon) => tracing::trace!(
                provider = self.provider.name(),
                %body,
                jd_utc = epoch.as_jd_utc(),
                lon,
                "position evaluated"
            ),
            Err(e) => tracing::warn!(provider = self.provider.name(), "{e}"),
        }
        self.cache.insert(key, result.clone());
        result
    }

    pub fn stats(&self) -> QueryStats {
        QueryStats {
            evaluations: self.evaluations,
            cache_hits: self.cache_hits,
        }
    }
}
