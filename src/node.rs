//! Node types and core node functionality

use crate::connector::{Connector, ConnectorSide, DataType};
use crate::control::Control;
use crate::defaults::LayoutDefaults;
use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = usize;

/// Core node structure representing a visual node in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Registered type this node dispatches behaviors through
    pub type_id: String,
    pub title: String,
    #[serde(with = "pos2_serde")]
    pub position: Pos2,
    #[serde(with = "vec2_serde")]
    pub size: Vec2,
    pub inputs: Vec<Connector>,
    pub outputs: Vec<Connector>,
    pub controls: Vec<Control>,
    #[serde(with = "color32_serde")]
    pub color: Color32,
}

impl Node {
    /// Creates a new node of the given type
    pub fn new(id: NodeId, type_id: impl Into<String>, position: Pos2) -> Self {
        let type_id = type_id.into();
        Self {
            id,
            title: type_id.clone(),
            type_id,
            position,
            size: Vec2::new(LayoutDefaults::NODE_WIDTH, LayoutDefaults::HEADER_HEIGHT),
            inputs: vec![],
            outputs: vec![],
            controls: vec![],
            color: Color32::from_rgb(60, 60, 60),
        }
    }

    /// Adds an input connector to the node
    pub fn add_input(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Self {
        self.inputs
            .push(Connector::new(name, ConnectorSide::Input, data_type));
        self
    }

    /// Adds an output connector to the node
    pub fn add_output(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Self {
        self.outputs
            .push(Connector::new(name, ConnectorSide::Output, data_type));
        self
    }

    /// Adds a control to the node body
    pub fn add_control(&mut self, control: Control) -> &mut Self {
        self.controls.push(control);
        self
    }

    /// Looks up an input connector by name
    pub fn input(&self, name: &str) -> Option<&Connector> {
        self.inputs.iter().find(|connector| connector.name == name)
    }

    /// Looks up an input connector by name, mutably
    pub fn input_mut(&mut self, name: &str) -> Option<&mut Connector> {
        self.inputs
            .iter_mut()
            .find(|connector| connector.name == name)
    }

    /// Looks up an output connector by name
    pub fn output(&self, name: &str) -> Option<&Connector> {
        self.outputs.iter().find(|connector| connector.name == name)
    }

    /// Looks up an output connector by name, mutably
    pub fn output_mut(&mut self, name: &str) -> Option<&mut Connector> {
        self.outputs
            .iter_mut()
            .find(|connector| connector.name == name)
    }

    /// Removes an input connector by name
    pub fn remove_input(&mut self, name: &str) -> Option<Connector> {
        let index = self
            .inputs
            .iter()
            .position(|connector| connector.name == name)?;
        Some(self.inputs.remove(index))
    }

    /// Looks up a control by name
    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }

    /// Looks up a control by name, mutably
    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|control| control.name == name)
    }

    /// Position of an input connector within the input list
    pub fn input_slot(&self, name: &str) -> Option<usize> {
        self.inputs
            .iter()
            .position(|connector| connector.name == name)
    }

    /// Position of an output connector within the output list
    pub fn output_slot(&self, name: &str) -> Option<usize> {
        self.outputs
            .iter()
            .position(|connector| connector.name == name)
    }

    /// Computes the size the node needs for its connectors and visible
    /// controls. Hidden controls contribute no height.
    pub fn compute_size(&self) -> Vec2 {
        let slots = self.inputs.len().max(self.outputs.len());
        let span = slots.saturating_sub(1) as f32 * LayoutDefaults::PORT_SPACING
            + 2.0 * LayoutDefaults::PORT_MARGIN;
        let width = LayoutDefaults::NODE_WIDTH.max(span);

        let mut height = LayoutDefaults::HEADER_HEIGHT;
        for control in &self.controls {
            height += control.height;
        }
        Vec2::new(width, height)
    }

    /// Applies the computed size and relays out the connectors
    pub fn apply_computed_size(&mut self) {
        self.size = self.compute_size();
        self.update_port_positions();
    }

    /// Grows the node to the computed size without shrinking either axis.
    ///
    /// Revealing controls must not pull the node below its committed
    /// footprint, so the committed size acts as a floor here.
    pub fn expand_to_computed_size(&mut self) {
        let computed = self.compute_size();
        self.size = Vec2::new(self.size.x.max(computed.x), self.size.y.max(computed.y));
        self.update_port_positions();
    }

    /// Updates the positions of all connectors based on the node's
    /// position and size
    pub fn update_port_positions(&mut self) {
        let port_spacing = LayoutDefaults::PORT_SPACING;

        // Input connectors on TOP of node
        let input_start_x = if self.inputs.len() > 1 {
            (self.size.x - (self.inputs.len() - 1) as f32 * port_spacing) / 2.0
        } else {
            self.size.x / 2.0
        };

        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.position =
                self.position + Vec2::new(input_start_x + i as f32 * port_spacing, 0.0);
        }

        // Output connectors on BOTTOM of node
        let output_start_x = if self.outputs.len() > 1 {
            (self.size.x - (self.outputs.len() - 1) as f32 * port_spacing) / 2.0
        } else {
            self.size.x / 2.0
        };

        for (i, output) in self.outputs.iter_mut().enumerate() {
            output.position =
                self.position + Vec2::new(output_start_x + i as f32 * port_spacing, self.size.y);
        }
    }

    /// Returns the bounding rectangle of the node
    pub fn get_rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Sets the display title of the node
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the color of the node
    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Sets the size of the node
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

// Serde helper modules for egui types
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

mod vec2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(vec: &Vec2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [vec.x, vec.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}

mod color32_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [color.r(), color.g(), color.b(), color.a()].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [r, g, b, a] = <[u8; 4]>::deserialize(deserializer)?;
        Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
    }
}
