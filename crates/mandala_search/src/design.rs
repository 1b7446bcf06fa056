//! Design-epoch resolution.
//!
//! The design instant is the moment the Sun stood a fixed solar arc
//! (88 deg by default) behind its personality longitude. Two strategies:
//!
//! - [`DesignStrategy::RootFind`]: bisection on
//!   f(t) = normalize(sun(t) - target), where target = sun(personality) - arc.
//!   The normalize wraps to (-180, +180] so the zero crossing is the target
//!   longitude regardless of where 0 deg falls. Converges to `tolerance_deg`.
//! - [`DesignStrategy::FixedOffset`]: subtract a fixed number of days. This is
//!   an approximation; the Sun's speed varies through the year, so the result
//!   can be off by about a day and shift a boundary-adjacent line.

use std::fmt::{Display, Formatter};

use mandala_base::{normalize_360, normalize_pm180};
use mandala_core::{CelestialBody, LongitudeContext, PositionProvider};
use mandala_time::UtcEpoch;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Mean solar motion, used only to seed the search.
pub const SUN_MEAN_MOTION_DEG_PER_DAY: f64 = 0.9856;

/// Times the bracket is doubled before giving up.
const MAX_BRACKET_EXPANSIONS: u32 = 4;

/// How the design instant is derived from the personality instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignStrategy {
    /// Solve for the exact solar arc.
    #[default]
    RootFind,
    /// Subtract a fixed day count (approximation).
    FixedOffset,
}

impl DesignStrategy {
    pub const fn name(self) -> &'static str {
        match self {
            Self::RootFind => "root-find",
            Self::FixedOffset => "fixed-offset",
        }
    }

    pub const fn is_approximation(self) -> bool {
        matches!(self, Self::FixedOffset)
    }
}

impl Display for DesignStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the design-epoch resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignConfig {
    pub strategy: DesignStrategy,
    /// Solar arc between design and personality, degrees (default 88).
    pub solar_arc_deg: f64,
    /// Day count for [`DesignStrategy::FixedOffset`] (default 88).
    pub fixed_offset_days: f64,
    /// Root-find tolerance on the Sun's longitude, degrees (default 1e-4).
    pub tolerance_deg: f64,
    /// Maximum bisection iterations (default 64).
    pub max_iterations: u32,
    /// Half-width of the initial bracket around the seed, days (default 5).
    pub bracket_days: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            strategy: DesignStrategy::RootFind,
            solar_arc_deg: 88.0,
            fixed_offset_days: 88.0,
            tolerance_deg: 1e-4,
            max_iterations: 64,
            bracket_days: 5.0,
        }
    }
}

impl DesignConfig {
    /// Default root-find config.
    pub fn root_find() -> Self {
        Self::default()
    }

    /// Default fixed-offset config.
    pub fn fixed_offset() -> Self {
        Self {
            strategy: DesignStrategy::FixedOffset,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let arc = self.solar_arc_deg;
        if !arc.is_finite() || arc <= 0.0 || arc >= 180.0 {
            return Err("solar_arc_deg must be in (0, 180)");
        }
        if !self.fixed_offset_days.is_finite() || self.fixed_offset_days <= 0.0 {
            return Err("fixed_offset_days must be positive");
        }
        if !self.tolerance_deg.is_finite() || self.tolerance_deg <= 0.0 {
            return Err("tolerance_deg must be positive");
        }
        if self.tolerance_deg > 1e-4 {
            return Err("tolerance_deg must not exceed 0.0001");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.bracket_days.is_finite() || self.bracket_days <= 0.0 {
            return Err("bracket_days must be positive");
        }
        Ok(())
    }
}

/// A resolved design instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignEpoch {
    pub strategy: DesignStrategy,
    pub epoch: UtcEpoch,
    /// Sun(personality) - Sun(design) actually reached, degrees.
    /// `None` for the fixed offset, which never evaluates the Sun.
    pub achieved_arc_deg: Option<f64>,
    /// Bisection steps taken (0 for the fixed offset).
    pub iterations: u32,
}

/// The fixed-offset approximation.
pub fn fixed_offset_design_epoch(personality: UtcEpoch, offset_days: f64) -> UtcEpoch {
    personality.add_days(-offset_days)
}

/// Resolve the design instant for `personality` using `config.strategy`.
///
/// Sun evaluations go through `ctx`, so the Sun at the returned epoch is
/// already memoized when the chart is filled in.
pub fn resolve_design_epoch<P: PositionProvider + ?Sized>(
    ctx: &mut LongitudeContext<'_, P>,
    personality: UtcEpoch,
    config: &DesignConfig,
) -> Result<DesignEpoch, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let resolved = match config.strategy {
        DesignStrategy::FixedOffset => DesignEpoch {
            strategy: DesignStrategy::FixedOffset,
            epoch: fixed_offset_design_epoch(personality, config.fixed_offset_days),
            achieved_arc_deg: None,
            iterations: 0,
        },
        DesignStrategy::RootFind => root_find(ctx, personality, config)?,
    };
    tracing::debug!(
        strategy = %resolved.strategy,
        jd_utc = resolved.epoch.as_jd_utc(),
        days_before = personality.days_since(resolved.epoch),
        achieved_arc_deg = ?resolved.achieved_arc_deg,
        iterations = resolved.iterations,
        "design epoch resolved"
    );
    Ok(resolved)
}

/// Signed distance of the Sun from `target_deg` at `epoch`, in (-180, 180].
fn sun_offset<P: PositionProvider + ?Sized>(
    ctx: &mut LongitudeContext<'_, P>,
    epoch: UtcEpoch,
    target_deg: f64,
) -> Result<f64, SearchError> {
    let sun = ctx.longitude(CelestialBody::Sun, epoch)?;
    Ok(normalize_pm180(sun - target_deg))
}

/// A sign change with both sides small, not the +-180 wrap.
fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a < 0.0 && f_b > 0.0 && (f_b - f_a) < 270.0
}

fn root_find<P: PositionProvider + ?Sized>(
    ctx: &mut LongitudeContext<'_, P>,
    personality: UtcEpoch,
    config: &DesignConfig,
) -> Result<DesignEpoch, SearchError> {
    let sun_personality = ctx.longitude(CelestialBody::Sun, personality)?;
    let target = normalize_360(sun_personality - config.solar_arc_deg);
    let seed = personality.add_days(-config.solar_arc_deg / SUN_MEAN_MOTION_DEG_PER_DAY);

    let finish = |epoch: UtcEpoch, f: f64, iterations: u32| DesignEpoch {
        strategy: DesignStrategy::RootFind,
        epoch,
        achieved_arc_deg: Some(config.solar_arc_deg - f),
        iterations,
    };

    let mut half_width = config.bracket_days;
    let mut bracket = None;
    for _ in 0..=MAX_BRACKET_EXPANSIONS {
        let t_a = seed.add_days(-half_width);
        let t_b = seed.add_days(half_width);
        let f_a = sun_offset(ctx, t_a, target)?;
        let f_b = sun_offset(ctx, t_b, target)?;
        if f_a == 0.0 {
            return Ok(finish(t_a, f_a, 0));
        }
        if f_b == 0.0 {
            return Ok(finish(t_b, f_b, 0));
        }
        if is_genuine_crossing(f_a, f_b) {
            bracket = Some((t_a, f_a, t_b));
            break;
        }
        half_width *= 2.0;
    }
    let Some((mut t_a, mut f_a, mut t_b)) = bracket else {
        return Err(SearchError::NoConvergence("solar arc not bracketed"));
    };

    for iteration in 1..=config.max_iterations {
        let t_mid = t_a.add_days(0.5 * t_b.days_since(t_a));
        let f_mid = sun_offset(ctx, t_mid, target)?;
        if f_mid.abs() <= config.tolerance_deg {
            return Ok(finish(t_mid, f_mid, iteration));
        }
        if f_a * f_mid < 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
    }
    Err(SearchError::NoConvergence(
        "solar arc did not reach tolerance within max_iterations",
    ))
}
