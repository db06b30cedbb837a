//! Nodewise - behavioral extensions for node graph editors
//!
//! This library keeps node surfaces in step with how they are used:
//! connector families that grow a spare input whenever the last one is
//! taken and shed unused trailing inputs, and visibility rules that hide
//! or restore controls as their driver values change. A small engine
//! routes host lifecycle events to per-type behaviors and drains the
//! reactive change queue after each one.

pub mod behavior;
pub mod behaviors;
pub mod connector;
pub mod control;
pub mod defaults;
pub mod engine;
pub mod family;
pub mod graph;
pub mod node;
pub mod observable;
pub mod registry;
pub mod saved;
pub mod schedule;
pub mod visibility;

pub use behavior::{BehaviorCtx, ConnectionEvent, NodeBehavior};
pub use behaviors::{LabeledIndexBehavior, PickerBehavior, SearchReplaceBehavior};
pub use connector::{Connector, ConnectorSide, DataType};
pub use control::{Control, ControlKind, ControlValue};
pub use defaults::{EngineDefaults, FamilyDefaults, LayoutDefaults};
pub use engine::BehaviorEngine;
pub use family::ConnectorFamily;
pub use graph::{Link, LinkId, NodeGraph};
pub use node::{Node, NodeId};
pub use observable::{ChangeQueue, ControlWrite, ValueCell};
pub use registry::BehaviorRegistry;
pub use saved::{SavedConnector, SavedNode};
pub use schedule::SettleQueue;
pub use visibility::{toggle_control, ModeVisibility, ThresholdVisibility};

// Re-export commonly used egui types
pub use egui::{Color32, Pos2, Vec2};
