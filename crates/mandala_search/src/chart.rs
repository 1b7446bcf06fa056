//! Chart assembly: birth input to [`ChartProfile`].
//!
//! Pipeline: local time -> UTC at the caller's fixed offset, every body at
//! the personality instant, design instant, every body again, gate union,
//! channel resolution, classification. A body the provider cannot place
//! stays an unknown activation all the way through.

use chrono::Datelike;
use mandala_base::{ClassificationRule, GateSet, gate_from_longitude, resolve_channels};
use mandala_core::{
    CelestialBody, LongitudeContext, PositionProvider, QueryStats, UnavailableReason,
};
use mandala_time::{SupportedRange, UtcEpoch, UtcTime, local_to_utc};

use crate::chart_types::{
    Activation, ActivationMap, BirthInput, ChartProfile, Cycle, Placement, UnknownReason,
    profile_string,
};
use crate::design::{DesignConfig, resolve_design_epoch};
use crate::error::ChartError;

/// Version stamped into every profile.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime configuration for chart assembly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartConfig {
    pub design: DesignConfig,
    pub classification: ClassificationRule,
    pub range: SupportedRange,
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        self.design.validate()?;
        if self.range.min_year > self.range.max_year {
            return Err("range.min_year must not exceed range.max_year");
        }
        Ok(())
    }
}

/// Builds charts against one position provider.
///
/// Holds no per-request state; each call gets its own memo, so one
/// assembler can serve concurrent requests.
#[derive(Debug)]
pub struct ChartAssembler<P> {
    provider: P,
    config: ChartConfig,
}

impl<P: PositionProvider> ChartAssembler<P> {
    /// Assembler with the default configuration.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ChartConfig::default(),
        }
    }

    pub fn with_config(provider: P, config: ChartConfig) -> Result<Self, ChartError> {
        config.validate().map_err(ChartError::InvalidConfig)?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn assemble(&self, input: &BirthInput) -> Result<ChartProfile, ChartError> {
        self.assemble_with_stats(input).map(|(profile, _)| profile)
    }

    /// Like [`assemble`](Self::assemble), also returning provider-call telemetry.
    pub fn assemble_with_stats(
        &self,
        input: &BirthInput,
    ) -> Result<(ChartProfile, QueryStats), ChartError> {
        let personality_utc = personality_utc(input, &self.config.range)?;
        let personality = UtcEpoch::from_utc(&personality_utc);

        let mut ctx = LongitudeContext::new(&self.provider);
        let mut activations = ActivationMap::new();
        fill_cycle(&mut ctx, Cycle::Personality, Ok(personality), &mut activations);

        let design = match resolve_design_epoch(&mut ctx, personality, &self.config.design) {
            Ok(design) => Ok(design),
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "design epoch unresolved, all Design activations unknown: {e}"
                );
                Err(UnknownReason::DesignUnresolved)
            }
        };
        let design_epoch = design.as_ref().map(|d| d.epoch).map_err(Clone::clone);
        fill_cycle(&mut ctx, Cycle::Design, design_epoch, &mut activations);

        let activated_gates: GateSet = activations.values().filter_map(Activation::gate).collect();
        let resolution = resolve_channels(&activated_gates);
        let aura_type = self.config.classification.classifier().classify(&resolution);

        let sun_line = |cycle: Cycle| {
            activations
                .get(&(CelestialBody::Sun, cycle))
                .and_then(Activation::line)
        };
        let profile = profile_string(sun_line(Cycle::Personality), sun_line(Cycle::Design));

        let chart = ChartProfile {
            engine_version: ENGINE_VERSION,
            aura_type,
            classification: self.config.classification,
            profile,
            personality_utc,
            design_utc: design.as_ref().ok().map(|d| d.epoch.to_utc()),
            design_strategy: self.config.design.strategy,
            activations,
            defined_centers: resolution.defined_centers,
            active_channels: resolution.active_channels,
            activated_gates,
            location: input.location,
        };
        let stats = ctx.stats();
        tracing::info!(
            aura_type = %chart.aura_type,
            profile = %chart.profile,
            unknown = chart.unknown_count(),
            evaluations = stats.evaluations,
            cache_hits = stats.cache_hits,
            "chart assembled"
        );
        Ok((chart, stats))
    }
}

/// Validate the input and convert it to the personality instant in UTC.
///
/// Runs before any provider call.
pub fn personality_utc(input: &BirthInput, range: &SupportedRange) -> Result<UtcTime, ChartError> {
    range.check(input.date.year())?;
    let utc = local_to_utc(input.date, input.local_time, input.utc_offset)?;
    range.check(utc.year)?;
    Ok(utc)
}

fn fill_cycle<P: PositionProvider + ?Sized>(
    ctx: &mut LongitudeContext<'_, P>,
    cycle: Cycle,
    epoch: Result<UtcEpoch, UnknownReason>,
    out: &mut ActivationMap,
) {
    for &body in CelestialBody::all() {
        let placement = match &epoch {
            Ok(epoch) => place(ctx, body, *epoch),
            Err(reason) => Placement::Unknown {
                reason: reason.clone(),
            },
        };
        out.insert(
            (body, cycle),
            Activation {
                body,
                cycle,
                placement,
            },
        );
    }
}

fn place<P: PositionProvider + ?Sized>(
    ctx: &mut LongitudeContext<'_, P>,
    body: CelestialBody,
    epoch: UtcEpoch,
) -> Placement {
    match ctx.longitude(body, epoch) {
        Ok(lon) => match gate_from_longitude(lon) {
            Some(gate) => Placement::Resolved {
                gate,
                longitude_deg: lon,
            },
            None => Placement::Unknown {
                reason: UnknownReason::Unavailable(UnavailableReason::NonFinite),
            },
        },
        Err(e) => Placement::Unknown {
            reason: UnknownReason::Unavailable(e.reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandala_time::{FixedOffset, NaiveDate, NaiveTime, TimeError};

    fn input(y: i32, m: u32, d: u32) -> BirthInput {
        BirthInput::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            FixedOffset::east_opt(8 * 3600).unwrap(),
        )
    }

    #[test]
    fn personality_utc_applies_offset() {
        let utc = personality_utc(&input(1995, 1, 1), &SupportedRange::default()).unwrap();
        assert_eq!((utc.year, utc.month, utc.day, utc.hour), (1995, 1, 1, 4));
    }

    #[test]
    fn out_of_range_year_is_invalid_input() {
        let err = personality_utc(&input(1700, 1, 1), &SupportedRange::default()).unwrap_err();
        assert_eq!(
            err,
            ChartError::from(TimeError::OutOfSupportedRange { year: 1700 })
        );
    }

    #[test]
    fn utc_crossing_out_of_range_is_rejected() {
        // Local 1800-01-01 00:30 at +08:00 is still 1799 in UTC.
        let mut i = input(1800, 1, 1);
        i.local_time = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        assert!(personality_utc(&i, &SupportedRange::default()).is_err());
    }

    #[test]
    fn config_validation() {
        assert!(ChartConfig::default().validate().is_ok());
        let mut c = ChartConfig::default();
        c.range = SupportedRange::new(2000, 1999);
        assert!(c.validate().is_err());
        let mut c = ChartConfig::default();
        c.design.max_iterations = 0;
        assert!(c.validate().is_err());
    }
}
