//! Persisted node state records
//!
//! The host serializes nodes into its own document format; the behavior
//! engine only needs the slice of that document a behavior can act on
//! during configure: which input connectors the node had, in order, and
//! the ordered control values to restore.

use crate::control::ControlValue;
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Saved descriptor for one input connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConnector {
    pub name: String,
}

/// Saved state for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SavedNode {
    /// Input connectors present when the node was saved, in order
    #[serde(default)]
    pub inputs: Vec<SavedConnector>,
    /// Control values in control order; buttons save as null
    #[serde(default)]
    pub controls: Vec<ControlValue>,
}

impl SavedNode {
    /// Captures the saved record for a live node
    pub fn capture(node: &Node) -> Self {
        Self {
            inputs: node
                .inputs
                .iter()
                .map(|connector| SavedConnector {
                    name: connector.name.clone(),
                })
                .collect(),
            controls: node
                .controls
                .iter()
                .map(|control| control.value.get())
                .collect(),
        }
    }

    /// Parses a saved record from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Renders the saved record as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
