//! Aura type classification from defined centers.
//!
//! The default rule is binary: a defined Sacral means Generator, anything
//! else falls into one merged non-Generator bucket that does not separate
//! Projector, Manifestor and Reflector. [`FullRule`] implements the finer
//! classification (motor-to-Throat connectivity) and is only used when a
//! caller asks for it through [`ClassificationRule::Full`].

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::center::{Center, CenterSet};
use crate::channel::{Channel, ChannelResolution};

/// Coarse type derived from the defined centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuraType {
    /// Sacral defined.
    Generator,
    /// Merged bucket: Projector, Manifestor or Reflector, not distinguished.
    NonGenerator,
    /// Sacral defined and a motor reaches the Throat ([`FullRule`] only).
    ManifestingGenerator,
    /// [`FullRule`] only.
    Manifestor,
    /// [`FullRule`] only.
    Projector,
    /// No defined centers ([`FullRule`] only).
    Reflector,
}

impl AuraType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generator => "Generator",
            Self::NonGenerator => "Non-Generator (Manifestor/Projector/Reflector)",
            Self::ManifestingGenerator => "Manifesting Generator",
            Self::Manifestor => "Manifestor",
            Self::Projector => "Projector",
            Self::Reflector => "Reflector",
        }
    }

    /// True for any Sacral-defined type.
    pub const fn is_generator_class(self) -> bool {
        matches!(self, Self::Generator | Self::ManifestingGenerator)
    }
}

impl Display for AuraType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Simplified binary classification: Sacral defined or not.
pub fn classify_aura(defined_centers: &CenterSet) -> AuraType {
    if defined_centers.contains(&Center::Sacral) {
        AuraType::Generator
    } else {
        AuraType::NonGenerator
    }
}

/// Extension seam for classification rules.
pub trait AuraClassifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, resolution: &ChannelResolution) -> AuraType;
}

/// The binary Sacral rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct SacralRule;

impl AuraClassifier for SacralRule {
    fn name(&self) -> &'static str {
        "simplified"
    }

    fn classify(&self, resolution: &ChannelResolution) -> AuraType {
        classify_aura(&resolution.defined_centers)
    }
}

/// Four-type rule with motor-to-Throat connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRule;

impl AuraClassifier for FullRule {
    fn name(&self) -> &'static str {
        "full"
    }

    fn classify(&self, resolution: &ChannelResolution) -> AuraType {
        let centers = &resolution.defined_centers;
        if centers.is_empty() {
            return AuraType::Reflector;
        }
        let motor_to_throat = motor_reaches_throat(&resolution.active_channels);
        match (centers.contains(&Center::Sacral), motor_to_throat) {
            (true, true) => AuraType::ManifestingGenerator,
            (true, false) => AuraType::Generator,
            (false, true) => AuraType::Manifestor,
            (false, false) => AuraType::Projector,
        }
    }
}

/// Which classifier a chart request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationRule {
    #[default]
    Simplified,
    Full,
}

impl ClassificationRule {
    pub fn classifier(self) -> &'static dyn AuraClassifier {
        match self {
            Self::Simplified => &SacralRule,
            Self::Full => &FullRule,
        }
    }
}

/// Centers reachable from `start` along active channels.
pub fn reachable_centers(start: Center, channels: &[Channel]) -> CenterSet {
    let mut seen: CenterSet = BTreeSet::from([start]);
    let mut frontier = vec![start];
    while let Some(center) = frontier.pop() {
        for channel in channels {
            let next = if channel.centers[0] == center {
                channel.centers[1]
            } else if channel.centers[1] == center {
                channel.centers[0]
            } else {
                continue;
            };
            if seen.insert(next) {
                frontier.push(next);
            }
        }
    }
    seen
}

/// True if any motor center has a path of active channels to the Throat.
pub fn motor_reaches_throat(channels: &[Channel]) -> bool {
    let reachable = reachable_centers(Center::Throat, channels);
    reachable.iter().any(|c| c.is_motor())
}
