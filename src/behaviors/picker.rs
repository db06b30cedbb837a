//! Picker node behavior
//!
//! A picker selects one line from the texts wired into its `text_*`
//! inputs. The behavior keeps that input family one spare ahead of its
//! links, swaps the line/seed controls with the mode, and annotates each
//! linked input with the line count of its source text on demand.

use crate::behavior::{BehaviorCtx, ConnectionEvent, NodeBehavior};
use crate::connector::DataType;
use crate::control::Control;
use crate::defaults::FamilyDefaults;
use crate::family::ConnectorFamily;
use crate::graph::NodeGraph;
use crate::node::{Node, NodeId};
use crate::saved::SavedNode;
use crate::visibility::ModeVisibility;
use egui::{Color32, Pos2};

/// Button control that triggers the line-count refresh
pub const REFRESH_CONTROL: &str = "refresh_lines";

/// Behavior for `Picker_JN` nodes
#[derive(Clone)]
pub struct PickerBehavior {
    inputs: ConnectorFamily,
    visibility: ModeVisibility,
}

impl PickerBehavior {
    pub fn new() -> Self {
        Self {
            inputs: ConnectorFamily::new("text", DataType::String),
            visibility: ModeVisibility::new("mode", &["line"], &["seed"]),
        }
    }
}

impl Default for PickerBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBehavior for PickerBehavior {
    fn on_created(&mut self, node: &mut Node, ctx: &mut BehaviorCtx) {
        let keep = self.inputs.base_name();
        self.inputs.normalize(node, &keep);
        if node.control(REFRESH_CONTROL).is_none() {
            node.add_control(Control::button(REFRESH_CONTROL));
        }
        self.visibility.bind(node, ctx.changes());
        ctx.defer_apply(node.id);
    }

    fn on_configure(&mut self, node: &mut Node, saved: &SavedNode, ctx: &mut BehaviorCtx) {
        self.inputs.preallocate(node, saved);
        self.visibility.bind(node, ctx.changes());
        ctx.defer_apply(node.id);
    }

    fn on_connection_changed(&mut self, node: &mut Node, event: ConnectionEvent, _ctx: &mut BehaviorCtx) {
        self.inputs
            .on_connection_changed(node, event.side, event.connected);
    }

    fn on_control_changed(&mut self, node: &mut Node, control: &str, _ctx: &mut BehaviorCtx) {
        if control == self.visibility.driver {
            self.visibility.apply(node);
        }
    }

    fn on_button(&mut self, graph: &mut NodeGraph, node: NodeId, control: &str) {
        if control == REFRESH_CONTROL {
            refresh_line_labels(graph, node, &self.inputs);
        }
    }

    fn on_settled(&mut self, node: &mut Node, _ctx: &mut BehaviorCtx) {
        self.visibility.apply(node);
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Relabels each family input with the line count of the text its link
/// carries.
///
/// Linked inputs read their source node's first text-like control and
/// take a `<name>: <n> lines` label counting non-blank lines; unlinked
/// inputs drop their label. A missing source node or a source without a
/// text control leaves that input's label untouched. Labels are display
/// state only, so the pass ends by flagging the canvas.
pub fn refresh_line_labels(graph: &mut NodeGraph, node_id: NodeId, family: &ConnectorFamily) {
    let Some(node) = graph.nodes.get(&node_id) else {
        return;
    };

    let mut updates: Vec<(String, Option<String>)> = Vec::new();
    for connector in &node.inputs {
        if family.member_index(&connector.name).is_none() {
            continue;
        }
        match connector.link.and_then(|link_id| graph.links.get(&link_id)) {
            Some(link) => {
                let Some(source) = graph.nodes.get(&link.from_node) else {
                    continue;
                };
                let Some(text_control) = source
                    .controls
                    .iter()
                    .find(|control| control.kind.is_text())
                else {
                    continue;
                };
                let value = text_control.value.get();
                let text = value.as_text().unwrap_or("");
                let count = text.lines().filter(|line| !line.trim().is_empty()).count();
                updates.push((
                    connector.name.clone(),
                    Some(format!("{}: {} lines", connector.name, count)),
                ));
            }
            None => updates.push((connector.name.clone(), None)),
        }
    }

    let Some(node) = graph.nodes.get_mut(&node_id) else {
        return;
    };
    for (name, label) in updates {
        if let Some(connector) = node.input_mut(&name) {
            connector.label = label;
        }
    }
    graph.mark_canvas_dirty();
}

/// Creates a picker node; the behavior trims the input family down to
/// its base member on creation
pub fn template(position: Pos2) -> Node {
    let mut node = Node::new(0, "Picker_JN", position)
        .with_title("Picker")
        .with_color(Color32::from_rgb(95, 130, 95));
    for index in 1..=FamilyDefaults::MAX_CONNECTORS {
        node.add_input(format!("text_{}", index), DataType::String);
    }
    node.add_output("text", DataType::String);
    node.add_control(Control::combo("mode", "manual"));
    node.add_control(Control::number("line", 0));
    node.add_control(Control::number("seed", 0).with_linked(&["control_after_generate"]));
    node.apply_computed_size();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::ChangeQueue;
    use crate::schedule::SettleQueue;

    fn text_source(graph: &mut NodeGraph, text: &str) -> NodeId {
        let mut node = Node::new(0, "Notes", Pos2::ZERO);
        node.add_control(Control::text_area("text", text));
        node.add_output("text", DataType::String);
        graph.add_node(node)
    }

    fn created_picker(graph: &mut NodeGraph) -> NodeId {
        let id = graph.add_node(template(Pos2::ZERO));
        let changes = ChangeQueue::new();
        let mut settle = SettleQueue::new();
        let mut ctx = BehaviorCtx::new(&changes, &mut settle);
        let mut behavior = PickerBehavior::new();
        let node = graph.nodes.get_mut(&id).unwrap();
        behavior.on_created(node, &mut ctx);
        id
    }

    #[test]
    fn test_template_collapses_to_base_on_creation() {
        let mut graph = NodeGraph::new();
        let id = created_picker(&mut graph);
        let node = &graph.nodes[&id];

        let members: Vec<&str> = node
            .inputs
            .iter()
            .filter(|connector| connector.name.starts_with("text_"))
            .map(|connector| connector.name.as_str())
            .collect();
        assert_eq!(members, vec!["text_1"]);
        assert!(node.control(REFRESH_CONTROL).is_some());
    }

    #[test]
    fn test_creation_is_idempotent() {
        let mut graph = NodeGraph::new();
        let id = created_picker(&mut graph);

        let changes = ChangeQueue::new();
        let mut settle = SettleQueue::new();
        let mut ctx = BehaviorCtx::new(&changes, &mut settle);
        let mut behavior = PickerBehavior::new();
        let node = graph.nodes.get_mut(&id).unwrap();
        behavior.on_created(node, &mut ctx);

        let node = &graph.nodes[&id];
        let buttons = node
            .controls
            .iter()
            .filter(|control| control.name == REFRESH_CONTROL)
            .count();
        assert_eq!(buttons, 1);
        assert_eq!(node.control("mode").unwrap().value.subscriber_count(), 1);
    }

    #[test]
    fn test_refresh_counts_non_blank_lines() {
        let mut graph = NodeGraph::new();
        let source = text_source(&mut graph, "alpha\n\nbeta\n   \ngamma\n");
        let picker = created_picker(&mut graph);
        graph.connect(source, "text", picker, "text_1").unwrap();

        let family = ConnectorFamily::new("text", DataType::String);
        refresh_line_labels(&mut graph, picker, &family);

        let node = &graph.nodes[&picker];
        assert_eq!(
            node.input("text_1").unwrap().label.as_deref(),
            Some("text_1: 3 lines")
        );
        assert!(graph.take_canvas_dirty());
    }

    #[test]
    fn test_refresh_clears_labels_of_unlinked_inputs() {
        let mut graph = NodeGraph::new();
        let picker = created_picker(&mut graph);
        graph
            .nodes
            .get_mut(&picker)
            .unwrap()
            .input_mut("text_1")
            .unwrap()
            .label = Some("text_1: 9 lines".to_string());

        let family = ConnectorFamily::new("text", DataType::String);
        refresh_line_labels(&mut graph, picker, &family);
        assert!(graph.nodes[&picker].input("text_1").unwrap().label.is_none());
    }

    #[test]
    fn test_refresh_skips_sources_without_text_controls() {
        let mut graph = NodeGraph::new();
        let mut bare = Node::new(0, "Bare", Pos2::ZERO);
        bare.add_output("text", DataType::String);
        let bare = graph.add_node(bare);

        let picker = created_picker(&mut graph);
        graph.connect(bare, "text", picker, "text_1").unwrap();
        graph
            .nodes
            .get_mut(&picker)
            .unwrap()
            .input_mut("text_1")
            .unwrap()
            .label = Some("stale".to_string());

        let family = ConnectorFamily::new("text", DataType::String);
        refresh_line_labels(&mut graph, picker, &family);
        assert_eq!(
            graph.nodes[&picker].input("text_1").unwrap().label.as_deref(),
            Some("stale")
        );
    }
}
