//! Design-epoch and whole-chart tests against the analytic mean-element provider.
//!
//! The provider is arc-minute accurate, which is far coarser than the
//! root-find tolerance; these tests check the solver against the provider's
//! own Sun, not against an external ephemeris.

use mandala_base::{GateSet, normalize_360, normalize_pm180};
use mandala_core::{CelestialBody, LongitudeContext, MeanElementsProvider, PositionProvider};
use mandala_search::{
    BirthInput, ChartAssembler, ChartConfig, Cycle, DesignConfig, DesignStrategy,
    resolve_design_epoch,
};
use mandala_time::{FixedOffset, NaiveDate, NaiveTime, UtcEpoch, UtcTime};

fn sun(p: &MeanElementsProvider, e: UtcEpoch) -> f64 {
    p.ecliptic_longitude(CelestialBody::Sun, e).unwrap()
}

#[test]
fn root_find_reaches_88_degrees_through_the_year() {
    let p = MeanElementsProvider::new();
    for month in 1..=12 {
        let personality = UtcEpoch::from_utc(&UtcTime::new(1990, month, 15, 6, 30, 0.0));
        let mut ctx = LongitudeContext::new(&p);
        let d = resolve_design_epoch(&mut ctx, personality, &DesignConfig::default()).unwrap();
        let arc = normalize_360(sun(&p, personality) - sun(&p, d.epoch));
        assert!((arc - 88.0).abs() <= 1e-4, "month {month}: arc = {arc}");

        // Perihelion in January makes the Sun fastest then; the span stays near 88 days.
        let days = personality.days_since(d.epoch);
        assert!((85.0..=93.0).contains(&days), "month {month}: {days} days");
    }
}

#[test]
fn fixed_offset_is_within_about_four_days_of_root_find() {
    let p = MeanElementsProvider::new();
    for year in [1850, 1923, 1984, 2001, 2049] {
        let personality = UtcEpoch::from_utc(&UtcTime::new(year, 7, 4, 0, 0, 0.0));
        let mut ctx = LongitudeContext::new(&p);
        let exact = resolve_design_epoch(&mut ctx, personality, &DesignConfig::root_find()).unwrap();
        let approx =
            resolve_design_epoch(&mut ctx, personality, &DesignConfig::fixed_offset()).unwrap();
        let gap = exact.epoch.days_since(approx.epoch).abs();
        // Near aphelion an 88 degree span takes about 91 days.
        assert!(gap < 4.0, "{year}: gap {gap} days");

        // The two strategies disagree by about the gap times the Sun's rate.
        let drift = normalize_pm180(sun(&p, exact.epoch) - sun(&p, approx.epoch)).abs();
        assert!(drift < 4.0, "{year}: drift {drift} deg");
    }
}

fn hong_kong_birth(y: i32, m: u32, d: u32, h: u32, min: u32) -> BirthInput {
    BirthInput::new(
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(h, min, 0).unwrap(),
        FixedOffset::east_opt(8 * 3600).unwrap(),
    )
}

#[test]
fn analytic_chart_is_fully_known() {
    let a = ChartAssembler::new(MeanElementsProvider::new());
    let chart = a.assemble(&hong_kong_birth(1988, 8, 8, 20, 8)).unwrap();

    assert_eq!(chart.unknown_count(), 0);
    assert_eq!(chart.design_strategy(), DesignStrategy::RootFind);
    assert!(chart.design_utc().is_some());

    let profile = chart.profile();
    let (p, d) = profile.split_once('/').unwrap();
    assert!(matches!(p, "1" | "2" | "3" | "4" | "5" | "6"), "{profile}");
    assert!(matches!(d, "1" | "2" | "3" | "4" | "5" | "6"), "{profile}");

    for cycle in [Cycle::Personality, Cycle::Design] {
        let sun = chart.activation(CelestialBody::Sun, cycle).unwrap();
        let earth = chart.activation(CelestialBody::Earth, cycle).unwrap();
        let opposite = normalize_360(sun.longitude_deg().unwrap() + 180.0);
        assert!((earth.longitude_deg().unwrap() - opposite).abs() < 1e-9);
    }

    // Every activated gate came from a resolved activation.
    let from_activations: GateSet = chart.activations().filter_map(|a| a.gate()).collect();
    assert_eq!(chart.activated_gates(), &from_activations);
}

#[test]
fn analytic_chart_reuses_sun_from_the_search() {
    let a = ChartAssembler::new(MeanElementsProvider::new());
    let (_, stats) = a.assemble_with_stats(&hong_kong_birth(2000, 1, 1, 12, 0)).unwrap();
    // The design Sun was the search's last evaluation, so it and both Earths are memo hits.
    assert!(stats.cache_hits >= 3, "{stats:?}");
}

#[test]
fn earliest_supported_year_still_resolves_design() {
    let a = ChartAssembler::with_config(MeanElementsProvider::new(), ChartConfig::default()).unwrap();
    let chart = a.assemble(&hong_kong_birth(1800, 1, 2, 12, 0)).unwrap();
    assert_eq!(chart.unknown_count(), 0);
}
