//! Labeled index node behavior
//!
//! The node turns a multiline label list into an index output. Manual
//! mode exposes the value field; random mode swaps it for the seed and
//! range fields.

use crate::behavior::{BehaviorCtx, NodeBehavior};
use crate::connector::DataType;
use crate::control::Control;
use crate::node::Node;
use crate::saved::SavedNode;
use crate::visibility::ModeVisibility;
use egui::{Color32, Pos2};

/// Behavior for `LabeledIndex_JN` nodes
#[derive(Clone)]
pub struct LabeledIndexBehavior {
    visibility: ModeVisibility,
}

impl LabeledIndexBehavior {
    pub fn new() -> Self {
        Self {
            visibility: ModeVisibility::new("mode", &["value"], &["seed", "min", "max"]),
        }
    }
}

impl Default for LabeledIndexBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBehavior for LabeledIndexBehavior {
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

/// Creates a labeled index node
pub fn template(position: Pos2) -> Node {
    let mut node = Node::new(0, "LabeledIndex_JN", position)
        .with_title("Labeled Index")
        .with_color(Color32::from_rgb(140, 120, 95));
    node.add_output("index", DataType::Integer);
    node.add_control(Control::text_area("labels", "Option A\nOption B\nOption C"));
    node.add_control(Control::combo("mode", "manual"));
    node.add_control(Control::number("value", 0));
    node.add_control(Control::number("seed", 0).with_linked(&["control_after_generate"]));
    node.add_control(Control::number("min", 0));
    node.add_control(Control::number("max", 10));
    node.apply_computed_size();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::ChangeQueue;
    use crate::schedule::SettleQueue;

    #[test]
    fn test_manual_mode_hides_random_fields_on_settle() {
        let mut node = template(Pos2::ZERO);
        let changes = ChangeQueue::new();
        let mut settle = SettleQueue::new();
        let mut behavior = LabeledIndexBehavior::new();

        behavior.on_created(&mut node, &mut BehaviorCtx::new(&changes, &mut settle));
        assert!(settle.is_scheduled(node.id));

        behavior.on_settled(&mut node, &mut BehaviorCtx::new(&changes, &mut settle));
        assert!(node.control("value").unwrap().is_visible());
        assert!(node.control("seed").unwrap().is_hidden());
        assert!(node.control("min").unwrap().is_hidden());
        assert!(node.control("max").unwrap().is_hidden());
        assert!(node.control("labels").unwrap().is_visible());
    }

    #[test]
    fn test_mode_flip_swaps_the_partitions() {
        let mut node = template(Pos2::ZERO);
        let changes = ChangeQueue::new();
        let mut settle = SettleQueue::new();
        let mut behavior = LabeledIndexBehavior::new();

        let mut ctx = BehaviorCtx::new(&changes, &mut settle);
        behavior.on_created(&mut node, &mut ctx);
        behavior.on_settled(&mut node, &mut ctx);

        node.control_mut("mode").unwrap().value.set("random");
        behavior.on_control_changed(&mut node, "mode", &mut ctx);
        assert!(node.control("value").unwrap().is_hidden());
        assert!(node.control("seed").unwrap().is_visible());
        assert!(node.control("min").unwrap().is_visible());
        assert!(node.control("max").unwrap().is_visible());
    }
}
