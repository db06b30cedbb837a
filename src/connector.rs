//! Connector types and family-name parsing
//!
//! Connectors are the named attachment points on a node. Input connectors
//! carry at most one link; outputs fan out through the graph's link table
//! and keep no link bookkeeping of their own.

use crate::graph::LinkId;
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Side of the node a connector sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorSide {
    Input,
    Output,
}

/// Data types that can flow through connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Floating point number
    Float,
    /// Whole number
    Integer,
    /// Text string
    String,
    /// Boolean value
    Boolean,
    /// Any type (for generic connectors)
    Any,
}

impl DataType {
    /// Check if this data type can connect to another
    pub fn can_connect_to(&self, other: &DataType) -> bool {
        self == other || *self == DataType::Any || *other == DataType::Any
    }

    /// Get a human-readable name for this data type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Float => "Float",
            DataType::Integer => "Integer",
            DataType::String => "String",
            DataType::Boolean => "Boolean",
            DataType::Any => "Any",
        }
    }

    /// Get a color representing this data type
    pub fn color(&self) -> Color32 {
        match self {
            DataType::Float => Color32::from_rgb(100, 150, 255), // Blue
            DataType::Integer => Color32::from_rgb(140, 200, 255), // Light blue
            DataType::String => Color32::from_rgb(100, 255, 100), // Green
            DataType::Boolean => Color32::from_rgb(255, 100, 255), // Magenta
            DataType::Any => Color32::from_rgb(150, 150, 150),   // Gray
        }
    }
}

/// Represents a named connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub name: String,
    pub side: ConnectorSide,
    pub data_type: DataType,
    /// Link currently feeding this connector (input side only)
    pub link: Option<LinkId>,
    /// Display label overriding the name; `None` shows the plain name
    pub label: Option<String>,
    #[serde(with = "pos2_serde")]
    pub position: Pos2,
}

impl Connector {
    /// Creates a new unlinked connector
    pub fn new(name: impl Into<String>, side: ConnectorSide, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            side,
            data_type,
            link: None,
            label: None,
            position: Pos2::ZERO,
        }
    }

    /// Checks if this connector is an input
    pub fn is_input(&self) -> bool {
        matches!(self.side, ConnectorSide::Input)
    }

    /// Checks if this connector is an output
    pub fn is_output(&self) -> bool {
        matches!(self.side, ConnectorSide::Output)
    }

    /// Checks if a link is currently attached
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// Parses a family member name of the form `<prefix>_<index>`.
///
/// Returns the numeric index, or `None` when the name does not belong to
/// the family. Names with a matching prefix but a malformed suffix
/// (`text_x`, `text_`) are not members and are skipped by every scan.
pub fn family_index(name: &str, prefix: &str) -> Option<usize> {
    let rest = name.strip_prefix(prefix)?;
    let digits = rest.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// Serde helper module for Pos2
mod pos2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(pos: &Pos2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [pos.x, pos.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pos2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Pos2::new(x, y))
    }
}
