//! Default values, bounds, and layout metrics
//!
//! This module centralizes the numeric knobs shared by the connector
//! family manager, the visibility engine, and node size computation so
//! behaviors and templates stay consistent.

/// Bounds for managed connector families
pub struct FamilyDefaults;

impl FamilyDefaults {
    /// First index in a family; `<prefix>_1` is the floor connector
    pub const BASE_INDEX: usize = 1;
    /// Largest index a family may grow to
    pub const MAX_CONNECTORS: usize = 20;
}

/// Node layout metrics used by size computation
pub struct LayoutDefaults;

impl LayoutDefaults {
    // Node body
    pub const NODE_WIDTH: f32 = 150.0;
    pub const HEADER_HEIGHT: f32 = 30.0;

    // Connector spacing along the node edges
    pub const PORT_SPACING: f32 = 30.0;
    pub const PORT_MARGIN: f32 = 15.0;

    // Per-kind control height contributions
    pub const NUMBER_HEIGHT: f32 = 22.0;
    pub const COMBO_HEIGHT: f32 = 22.0;
    pub const TEXT_HEIGHT: f32 = 22.0;
    pub const TEXT_AREA_HEIGHT: f32 = 66.0;
    pub const BUTTON_HEIGHT: f32 = 24.0;
    pub const HIDDEN_HEIGHT: f32 = 0.0;
}

/// Engine dispatch limits
pub struct EngineDefaults;

impl EngineDefaults {
    /// Rounds of change-queue draining before pending writes are dropped
    pub const MAX_CHANGE_ROUNDS: usize = 4;
}
