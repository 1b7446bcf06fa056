//! Pure lookup tables and graph rules for the mandala chart engine.
//!
//! This crate provides:
//! - Gate and line lookup on the 64-gate wheel
//! - The nine centers and the 36-channel table
//! - Channel activation and center definition from a gate set
//! - Aura classification, simplified by default with an opt-in full rule
//!
//! Nothing here touches an ephemeris; every function is deterministic.

pub mod aura;
pub mod center;
pub mod channel;
pub mod gate;
pub mod util;

pub use aura::{
    AuraClassifier, AuraType, ClassificationRule, FullRule, SacralRule, classify_aura,
    motor_reaches_throat, reachable_centers,
};
pub use center::{ALL_CENTERS, Center, CenterSet};
pub use channel::{CHANNELS, Channel, ChannelResolution, GateSet, resolve_channels};
pub use gate::{
    GATE_COUNT, GATE_SPAN, GateLine, LINE_SPAN, LINES_PER_GATE, MANDALA_ORDER, gate_arc_start,
    gate_from_longitude, is_gate,
};
pub use util::{normalize_360, normalize_pm180};
