//! The nine centers of the body graph.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

/// One of the nine named centers.
///
/// Declaration order runs top to bottom through the graph and drives
/// `Ord`, so a [`CenterSet`] iterates Head first, Root last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    Spleen,
    Sacral,
    #[serde(rename = "Solar Plexus")]
    SolarPlexus,
    Root,
}

/// Ordered set of centers.
pub type CenterSet = BTreeSet<Center>;

/// All nine centers in graph order.
pub const ALL_CENTERS: [Center; 9] = [
    Center::Head,
    Center::Ajna,
    Center::Throat,
    Center::G,
    Center::Heart,
    Center::Spleen,
    Center::Sacral,
    Center::SolarPlexus,
    Center::Root,
];

impl Center {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Ajna => "Ajna",
            Self::Throat => "Throat",
            Self::G => "G",
            Self::Heart => "Heart",
            Self::Spleen => "Spleen",
            Self::Sacral => "Sacral",
            Self::SolarPlexus => "Solar Plexus",
            Self::Root => "Root",
        }
    }

    /// Energy-producing centers.
    pub const fn is_motor(self) -> bool {
        matches!(
            self,
            Self::Heart | Self::Sacral | Self::SolarPlexus | Self::Root
        )
    }

    /// All nine centers in graph order.
    pub const fn all() -> &'static [Center; 9] {
        &ALL_CENTERS
    }
}

impl Display for Center {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
