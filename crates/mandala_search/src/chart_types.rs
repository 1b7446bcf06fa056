//! Types for chart input and the assembled chart profile.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use mandala_base::{AuraType, CenterSet, Channel, ClassificationRule, GateLine, GateSet};
use mandala_core::{CelestialBody, UnavailableReason};
use mandala_time::{FixedOffset, NaiveDate, NaiveTime, UtcTime};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::design::DesignStrategy;
use crate::error::ChartError;

/// Which of the two computed instants an activation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Cycle {
    Personality,
    Design,
}

impl Cycle {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Personality => "Personality",
            Self::Design => "Design",
        }
    }
}

impl Display for Cycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an activation has no gate.
#[derive(Debug, Clone, PartialEq)]
pub enum UnknownReason {
    /// The provider could not place the body.
    Unavailable(UnavailableReason),
    /// The design instant itself could not be resolved.
    DesignUnresolved,
}

impl Display for UnknownReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "{reason}"),
            Self::DesignUnresolved => f.write_str("design epoch unresolved"),
        }
    }
}

/// Where an activation landed, or why it could not.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Resolved { gate: GateLine, longitude_deg: f64 },
    Unknown { reason: UnknownReason },
}

/// One body in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub body: CelestialBody,
    pub cycle: Cycle,
    pub placement: Placement,
}

impl Activation {
    pub fn gate_line(&self) -> Option<GateLine> {
        match &self.placement {
            Placement::Resolved { gate, .. } => Some(*gate),
            Placement::Unknown { .. } => None,
        }
    }

    pub fn gate(&self) -> Option<u8> {
        self.gate_line().map(|g| g.gate)
    }

    pub fn line(&self) -> Option<u8> {
        self.gate_line().map(|g| g.line)
    }

    pub fn longitude_deg(&self) -> Option<f64> {
        match &self.placement {
            Placement::Resolved { longitude_deg, .. } => Some(*longitude_deg),
            Placement::Unknown { .. } => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.placement, Placement::Unknown { .. })
    }

    /// `"41.3"`, or `"unknown"`.
    pub fn text(&self) -> String {
        match self.gate_line() {
            Some(g) => g.to_string(),
            None => "unknown".to_string(),
        }
    }
}

impl Serialize for Activation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("body", &self.body)?;
        map.serialize_entry("cycle", &self.cycle)?;
        match &self.placement {
            Placement::Resolved {
                gate,
                longitude_deg,
            } => {
                map.serialize_entry("gate", &gate.gate)?;
                map.serialize_entry("line", &gate.line)?;
                map.serialize_entry("longitude_deg", longitude_deg)?;
            }
            Placement::Unknown { reason } => {
                map.serialize_entry("unknown", &reason.to_string())?;
            }
        }
        map.end()
    }
}

/// Birth coordinates, echoed back unchanged. Either may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    #[serde(rename = "lat")]
    latitude_deg: Option<f64>,
    #[serde(rename = "lon")]
    longitude_deg: Option<f64>,
}

impl Location {
    /// Latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude_deg: Option<f64>, longitude_deg: Option<f64>) -> Result<Self, ChartError> {
        if let Some(lat) = latitude_deg {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(ChartError::InvalidInput(format!("latitude {lat} outside [-90, 90]")));
            }
        }
        if let Some(lon) = longitude_deg {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(ChartError::InvalidInput(format!(
                    "longitude {lon} outside [-180, 180]"
                )));
            }
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    pub fn latitude_deg(&self) -> Option<f64> {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> Option<f64> {
        self.longitude_deg
    }
}

/// A chart request: local date and wall-clock time at an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthInput {
    pub date: NaiveDate,
    pub local_time: NaiveTime,
    /// Fixed offset east of UTC. No timezone database is consulted.
    pub utc_offset: FixedOffset,
    pub location: Option<Location>,
}

impl BirthInput {
    pub fn new(date: NaiveDate, local_time: NaiveTime, utc_offset: FixedOffset) -> Self {
        Self {
            date,
            local_time,
            utc_offset,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// `"{personality sun line}/{design sun line}"`, or `"?/?"` unless both lines are known.
pub fn profile_string(personality_line: Option<u8>, design_line: Option<u8>) -> String {
    match (personality_line, design_line) {
        (Some(p), Some(d)) => format!("{p}/{d}"),
        _ => "?/?".to_string(),
    }
}

pub(crate) type ActivationMap = BTreeMap<(CelestialBody, Cycle), Activation>;

/// The assembled chart. Built once per request; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProfile {
    pub(crate) engine_version: &'static str,
    #[serde(rename = "type")]
    pub(crate) aura_type: AuraType,
    pub(crate) classification: ClassificationRule,
    pub(crate) profile: String,
    pub(crate) personality_utc: UtcTime,
    pub(crate) design_utc: Option<UtcTime>,
    pub(crate) design_strategy: DesignStrategy,
    #[serde(serialize_with = "activations_as_list")]
    pub(crate) activations: ActivationMap,
    pub(crate) defined_centers: CenterSet,
    pub(crate) active_channels: Vec<Channel>,
    pub(crate) activated_gates: GateSet,
    pub(crate) location: Option<Location>,
}

fn activations_as_list<S: Serializer>(map: &ActivationMap, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(map.len()))?;
    for activation in map.values() {
        seq.serialize_element(activation)?;
    }
    seq.end()
}

impl ChartProfile {
    pub fn engine_version(&self) -> &'static str {
        self.engine_version
    }

    pub fn aura_type(&self) -> AuraType {
        self.aura_type
    }

    pub fn classification(&self) -> ClassificationRule {
        self.classification
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn personality_utc(&self) -> UtcTime {
        self.personality_utc
    }

    /// `None` when the design instant could not be resolved.
    pub fn design_utc(&self) -> Option<UtcTime> {
        self.design_utc
    }

    pub fn design_strategy(&self) -> DesignStrategy {
        self.design_strategy
    }

    pub fn activation(&self, body: CelestialBody, cycle: Cycle) -> Option<&Activation> {
        self.activations.get(&(body, cycle))
    }

    /// All activations, body order then Personality before Design.
    pub fn activations(&self) -> impl Iterator<Item = &Activation> {
        self.activations.values()
    }

    pub fn cycle(&self, cycle: Cycle) -> impl Iterator<Item = &Activation> {
        self.activations.values().filter(move |a| a.cycle == cycle)
    }

    pub fn defined_centers(&self) -> &CenterSet {
        &self.defined_centers
    }

    pub fn active_channels(&self) -> &[Channel] {
        &self.active_channels
    }

    pub fn activated_gates(&self) -> &GateSet {
        &self.activated_gates
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn unknown_count(&self) -> usize {
        self.activations.values().filter(|a| a.is_unknown()).count()
    }
}
