//! Channel table and channel/center resolution.
//!
//! A channel is active when both of its gates appear anywhere in the
//! activated-gate set; which cycle contributed a gate does not matter.
//! Every active channel defines the two centers it connects.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::center::Center::{Ajna, G, Head, Heart, Root, Sacral, SolarPlexus, Spleen, Throat};
use crate::center::{Center, CenterSet};

/// Ordered set of activated gate numbers.
pub type GateSet = BTreeSet<u8>;

/// A fixed pairing of two gates joining two centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Channel {
    pub gates: [u8; 2],
    pub centers: [Center; 2],
}

impl Channel {
    const fn new(a: u8, b: u8, from: Center, to: Center) -> Self {
        Self {
            gates: [a, b],
            centers: [from, to],
        }
    }

    /// True if both gates are in `gates`.
    pub fn is_active(&self, gates: &GateSet) -> bool {
        gates.contains(&self.gates[0]) && gates.contains(&self.gates[1])
    }

    /// True if this channel joins `a` and `b`, in either direction.
    pub fn connects(&self, a: Center, b: Center) -> bool {
        let [x, y] = self.centers;
        (x == a && y == b) || (x == b && y == a)
    }

    /// `"64-47"` style label.
    pub fn label(&self) -> String {
        format!("{}-{}", self.gates[0], self.gates[1])
    }
}

/// The 36 channels, in table order.
#[rustfmt::skip]
pub const CHANNELS: [Channel; 36] = [
    Channel::new(64, 47, Head, Ajna),
    Channel::new(61, 24, Head, Ajna),
    Channel::new(63, 4, Head, Ajna),
    Channel::new(17, 62, Ajna, Throat),
    Channel::new(43, 23, Ajna, Throat),
    Channel::new(11, 56, Ajna, Throat),
    Channel::new(16, 48, Throat, Spleen),
    Channel::new(20, 57, Throat, Spleen),
    Channel::new(35, 36, Throat, SolarPlexus),
    Channel::new(12, 22, Throat, SolarPlexus),
    Channel::new(45, 21, Throat, Heart),
    Channel::new(31, 7, Throat, G),
    Channel::new(8, 1, Throat, G),
    Channel::new(33, 13, Throat, G),
    Channel::new(10, 20, G, Throat),
    Channel::new(10, 34, G, Sacral),
    Channel::new(10, 57, G, Spleen),
    Channel::new(25, 51, G, Heart),
    Channel::new(46, 29, G, Sacral),
    Channel::new(15, 5, G, Sacral),
    Channel::new(2, 14, G, Sacral),
    Channel::new(26, 44, Heart, Spleen),
    Channel::new(40, 37, Heart, SolarPlexus),
    Channel::new(34, 57, Sacral, Spleen),
    Channel::new(34, 20, Sacral, Throat),
    Channel::new(50, 27, Spleen, Sacral),
    Channel::new(59, 6, Sacral, SolarPlexus),
    Channel::new(42, 53, Sacral, Root),
    Channel::new(3, 60, Sacral, Root),
    Channel::new(9, 52, Sacral, Root),
    Channel::new(18, 58, Spleen, Root),
    Channel::new(28, 38, Spleen, Root),
    Channel::new(32, 54, Spleen, Root),
    Channel::new(19, 49, Root, SolarPlexus),
    Channel::new(39, 55, Root, SolarPlexus),
    Channel::new(41, 30, Root, SolarPlexus),
];

/// Active channels (table order) and the centers they define.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelResolution {
    pub active_channels: Vec<Channel>,
    pub defined_centers: CenterSet,
}

/// Resolve active channels and defined centers from an activated-gate set.
///
/// One pass over the fixed table; pure and independent of insertion order.
pub fn resolve_channels(gates: &GateSet) -> ChannelResolution {
    let mut resolution = ChannelResolution::default();
    for channel in CHANNELS.iter().filter(|c| c.is_active(gates)) {
        resolution.active_channels.push(*channel);
        resolution.defined_centers.extend(channel.centers);
    }
    resolution
}
