//! Search and replace node behavior
//!
//! The node declares twenty search/replace text pairs up front; the
//! `pairs` counter decides how many of them are on screen.

use crate::behavior::{BehaviorCtx, NodeBehavior};
use crate::connector::DataType;
use crate::control::Control;
use crate::defaults::FamilyDefaults;
use crate::node::Node;
use crate::saved::SavedNode;
use crate::visibility::ThresholdVisibility;
use egui::{Color32, Pos2};

/// Behavior for `SearchReplace_JN` nodes
#[derive(Clone)]
pub struct SearchReplaceBehavior {
    visibility: ThresholdVisibility,
}

impl SearchReplaceBehavior {
    pub fn new() -> Self {
        Self {
            visibility: ThresholdVisibility::new("pairs", &["search", "replace"]),
        }
    }
}

impl Default for SearchReplaceBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBehavior for SearchReplaceBehavior {
    fn on_created(&mut self, node: &mut Node, ctx: &mut BehaviorCtx) {
        self.visibility.bind(node, ctx.changes());
        ctx.defer_apply(node.id);
    }

    fn on_configure(&mut self, node: &mut Node, _saved: &SavedNode, ctx: &mut BehaviorCtx) {
        self.visibility.bind(node, ctx.changes());
        ctx.defer_apply(node.id);
    }

    fn on_control_changed(&mut self, node: &mut Node, control: &str, _ctx: &mut BehaviorCtx) {
        if control == self.visibility.driver {
            self.visibility.apply(node);
        }
    }

    fn on_settled(&mut self, node: &mut Node, _ctx: &mut BehaviorCtx) {
        self.visibility.apply(node);
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Creates a search-and-replace node with its full run of pair controls
pub fn template(position: Pos2) -> Node {
    let mut node = Node::new(0, "SearchReplace_JN", position)
        .with_title("Search & Replace")
        .with_color(Color32::from_rgb(95, 115, 140));
    node.add_input("text", DataType::String);
    node.add_output("text", DataType::String);
    node.add_control(Control::number("pairs", 3));
    for index in 1..=FamilyDefaults::MAX_CONNECTORS {
        node.add_control(Control::text(format!("search_{}", index), ""));
        node.add_control(Control::text(format!("replace_{}", index), ""));
    }
    node.apply_computed_size();
    node
}
