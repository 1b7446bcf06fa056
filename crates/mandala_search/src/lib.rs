//! Design-epoch search and chart assembly.
//!
//! This crate provides:
//! - The design-epoch resolver (solar-arc root-find, or a fixed-day approximation)
//! - [`ChartAssembler`], which turns a birth instant into an immutable [`ChartProfile`]
//!
//! Positions come from any [`mandala_core::PositionProvider`]; everything
//! downstream of the provider is deterministic.

pub mod chart;
pub mod chart_types;
pub mod design;
pub mod error;

pub use chart::{ChartAssembler, ChartConfig, ENGINE_VERSION, personality_utc};
pub use chart_types::{
    Activation, BirthInput, ChartProfile, Cycle, Location, Placement, UnknownReason,
    profile_string,
};
pub use design::{
    DesignConfig, DesignEpoch, DesignStrategy, SUN_MEAN_MOTION_DEG_PER_DAY,
    fixed_offset_design_epoch, resolve_design_epoch,
};
pub use error::{ChartError, SearchError};
