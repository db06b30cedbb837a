//! Control visibility rules
//!
//! Two rule shapes share one toggle mechanism. A mode rule partitions its
//! dependents into a set shown under the manual state and a set shown
//! under the random state of a combo driver. A threshold rule shows the
//! members of indexed control families whose index is at or below a
//! numeric driver. Both bind to their driver through the control's value
//! cell, so any write, whether an edit or a restore, re-applies the rule
//! without the host calling back in.

use crate::connector::family_index;
use crate::node::Node;
use crate::observable::{ChangeQueue, ControlWrite};
use log::debug;

/// Shows or hides a control together with its linked companions.
///
/// A control whose name matches a live-linked input connector is left
/// alone: that slot is under editor control while the link stands.
/// Companion chains are walked with a visited list so mutually linked
/// controls terminate.
pub fn toggle_control(node: &mut Node, name: &str, visible: bool) {
    let mut seen = Vec::new();
    toggle_inner(node, name, visible, &mut seen);
}

fn toggle_inner(node: &mut Node, name: &str, visible: bool, seen: &mut Vec<String>) {
    if seen.iter().any(|visited| visited == name) {
        return;
    }
    seen.push(name.to_string());

    if node
        .input(name)
        .map_or(false, |connector| connector.is_linked())
    {
        return;
    }

    let linked = {
        let Some(control) = node.control_mut(name) else {
            return;
        };
        if visible {
            control.show();
        } else {
            control.hide();
        }
        control.linked.clone()
    };
    for companion in linked {
        toggle_inner(node, &companion, visible, seen);
    }
}

/// Captures the original kind of a control and its companion chain
fn capture_with_linked(node: &mut Node, name: &str, seen: &mut Vec<String>) {
    if seen.iter().any(|visited| visited == name) {
        return;
    }
    seen.push(name.to_string());

    let linked = match node.control_mut(name) {
        Some(control) => {
            control.capture_original();
            control.linked.clone()
        }
        None => return,
    };
    for companion in linked {
        capture_with_linked(node, &companion, seen);
    }
}

/// Watches a driver control, recording each value write in the queue.
///
/// Installing the watch twice is a no-op; the flag on the control keeps
/// repeated binds from stacking subscribers.
fn install_watch(node: &mut Node, driver: &str, changes: &ChangeQueue) {
    let node_id = node.id;
    let Some(control) = node.control_mut(driver) else {
        debug!("driver control {} missing on node {}", driver, node_id);
        return;
    };
    if control.watched {
        return;
    }
    control.watched = true;

    let queue = changes.clone();
    let name = control.name.clone();
    control.value.on_change(move |_| {
        queue.push(ControlWrite {
            node: node_id,
            control: name.clone(),
        });
    });
}

/// Visibility rule driven by a two-state mode control
#[derive(Debug, Clone)]
pub struct ModeVisibility {
    pub driver: String,
    /// Controls shown while the driver is not "random"
    pub manual: Vec<String>,
    /// Controls shown while the driver is "random"
    pub random: Vec<String>,
}

impl ModeVisibility {
    pub fn new(driver: impl Into<String>, manual: &[&str], random: &[&str]) -> Self {
        Self {
            driver: driver.into(),
            manual: manual.iter().map(|name| name.to_string()).collect(),
            random: random.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Captures dependent originals and watches the driver
    pub fn bind(&self, node: &mut Node, changes: &ChangeQueue) {
        let mut seen = Vec::new();
        for name in self.manual.iter().chain(self.random.iter()) {
            capture_with_linked(node, name, &mut seen);
        }
        install_watch(node, &self.driver, changes);
    }

    /// Partitions the dependents by the driver's current state, then
    /// grows the node to fit whatever became visible
    pub fn apply(&self, node: &mut Node) {
        let Some(value) = node
            .control(&self.driver)
            .map(|control| control.value.get())
        else {
            debug!(
                "mode driver {} missing on node {}; visibility unchanged",
                self.driver, node.id
            );
            return;
        };
        let is_random = value.as_text() == Some("random");

        for name in &self.manual {
            toggle_control(node, name, !is_random);
        }
        for name in &self.random {
            toggle_control(node, name, is_random);
        }
        node.expand_to_computed_size();
    }
}

/// Visibility rule driven by a numeric count over indexed control
/// families
#[derive(Debug, Clone)]
pub struct ThresholdVisibility {
    pub driver: String,
    /// Family prefixes whose members `<prefix>_<index>` the rule governs
    pub prefixes: Vec<String>,
}

impl ThresholdVisibility {
    pub fn new(driver: impl Into<String>, prefixes: &[&str]) -> Self {
        Self {
            driver: driver.into(),
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
        }
    }

    fn member_index(&self, name: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .find_map(|prefix| family_index(name, prefix))
    }

    /// Captures member originals and watches the driver
    pub fn bind(&self, node: &mut Node, changes: &ChangeQueue) {
        let members: Vec<String> = node
            .controls
            .iter()
            .filter(|control| self.member_index(&control.name).is_some())
            .map(|control| control.name.clone())
            .collect();
        let mut seen = Vec::new();
        for name in &members {
            capture_with_linked(node, name, &mut seen);
        }
        install_watch(node, &self.driver, changes);
    }

    /// Shows members indexed at or below the driver value, hides the
    /// rest, then grows the node to fit
    pub fn apply(&self, node: &mut Node) {
        let Some(value) = node
            .control(&self.driver)
            .map(|control| control.value.get())
        else {
            debug!(
                "threshold driver {} missing on node {}; visibility unchanged",
                self.driver, node.id
            );
            return;
        };
        let visible_count = value.as_int().unwrap_or(0);

        let members: Vec<(String, usize)> = node
            .controls
            .iter()
            .filter_map(|control| {
                self.member_index(&control.name)
                    .map(|index| (control.name.clone(), index))
            })
            .collect();
        for (name, index) in members {
            toggle_control(node, &name, index as i64 <= visible_count);
        }
        node.expand_to_computed_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DataType;
    use crate::control::{Control, ControlKind};
    use egui::Pos2;

    fn mode_node() -> Node {
        let mut node = Node::new(1, "LabeledIndex_JN", Pos2::ZERO);
        node.add_control(Control::combo("mode", "manual"))
            .add_control(Control::number("value", 0))
            .add_control(Control::number("seed", 0));
        node
    }

    fn mode_rule() -> ModeVisibility {
        ModeVisibility::new("mode", &["value"], &["seed"])
    }

    #[test]
    fn test_apply_partitions_dependents_by_mode() {
        let mut node = mode_node();
        let rule = mode_rule();
        rule.bind(&mut node, &ChangeQueue::new());

        rule.apply(&mut node);
        assert!(node.control("value").unwrap().is_visible());
        assert!(node.control("seed").unwrap().is_hidden());

        node.control_mut("mode").unwrap().value.set("random");
        rule.apply(&mut node);
        assert!(node.control("value").unwrap().is_hidden());
        assert!(node.control("seed").unwrap().is_visible());
    }

    #[test]
    fn test_hidden_controls_restore_exactly_after_mode_flips() {
        let mut node = mode_node();
        let rule = mode_rule();
        rule.bind(&mut node, &ChangeQueue::new());

        for _ in 0..3 {
            node.control_mut("mode").unwrap().value.set("random");
            rule.apply(&mut node);
            node.control_mut("mode").unwrap().value.set("manual");
            rule.apply(&mut node);
        }

        let value = node.control("value").unwrap();
        assert_eq!(value.kind, ControlKind::Number);
        assert_eq!(value.height, ControlKind::Number.default_height());
    }

    #[test]
    fn test_bind_twice_installs_one_watch() {
        let mut node = mode_node();
        let rule = mode_rule();
        let changes = ChangeQueue::new();

        rule.bind(&mut node, &changes);
        rule.bind(&mut node, &changes);
        assert_eq!(node.control("mode").unwrap().value.subscriber_count(), 1);

        node.control_mut("mode").unwrap().value.set("random");
        assert_eq!(changes.len(), 1);
        let writes = changes.take();
        assert_eq!(writes[0].control, "mode");
        assert_eq!(writes[0].node, 1);
    }

    #[test]
    fn test_linked_companion_follows_in_lock_step() {
        let mut node = mode_node();
        node.controls[2] = Control::number("seed", 0).with_linked(&["control_after_generate"]);
        node.add_control(Control::combo("control_after_generate", "randomize"));

        let rule = mode_rule();
        rule.bind(&mut node, &ChangeQueue::new());
        rule.apply(&mut node);
        assert!(node.control("seed").unwrap().is_hidden());
        assert!(node.control("control_after_generate").unwrap().is_hidden());

        node.control_mut("mode").unwrap().value.set("random");
        rule.apply(&mut node);
        assert!(node.control("control_after_generate").unwrap().is_visible());
        assert_eq!(
            node.control("control_after_generate").unwrap().kind,
            ControlKind::Combo
        );
    }

    #[test]
    fn test_mutually_linked_controls_terminate() {
        let mut node = Node::new(1, "Test", Pos2::ZERO);
        node.add_control(Control::number("a", 0).with_linked(&["b"]))
            .add_control(Control::number("b", 0).with_linked(&["a"]));

        toggle_control(&mut node, "a", false);
        assert!(node.control("a").unwrap().is_hidden());
        assert!(node.control("b").unwrap().is_hidden());
    }

    #[test]
    fn test_live_linked_slot_is_exempt() {
        let mut node = mode_node();
        node.add_input("seed", DataType::Integer);
        node.input_mut("seed").unwrap().link = Some(5);

        let rule = mode_rule();
        rule.bind(&mut node, &ChangeQueue::new());
        rule.apply(&mut node);
        // mode is manual, but the seed slot is fed by a live link
        assert!(node.control("seed").unwrap().is_visible());

        node.input_mut("seed").unwrap().link = None;
        rule.apply(&mut node);
        assert!(node.control("seed").unwrap().is_hidden());
    }

    #[test]
    fn test_threshold_shows_members_at_or_below_count() {
        let mut node = Node::new(2, "SearchReplace_JN", Pos2::ZERO);
        node.add_control(Control::number("pairs", 2));
        for index in 1..=4 {
            node.add_control(Control::text(format!("search_{}", index), ""));
            node.add_control(Control::text(format!("replace_{}", index), ""));
        }

        let rule = ThresholdVisibility::new("pairs", &["search", "replace"]);
        rule.bind(&mut node, &ChangeQueue::new());
        rule.apply(&mut node);

        for index in 1..=4 {
            let expected = index <= 2;
            for prefix in ["search", "replace"] {
                let name = format!("{}_{}", prefix, index);
                assert_eq!(
                    node.control(&name).unwrap().is_visible(),
                    expected,
                    "{} visibility",
                    name
                );
            }
        }

        node.control_mut("pairs").unwrap().value.set(0i64);
        rule.apply(&mut node);
        assert!(node.controls.iter().skip(1).all(|control| control.is_hidden()));
    }

    #[test]
    fn test_missing_driver_leaves_node_untouched() {
        let mut node = Node::new(3, "Test", Pos2::ZERO);
        node.add_control(Control::number("value", 0));

        let rule = ModeVisibility::new("mode", &["value"], &[]);
        rule.bind(&mut node, &ChangeQueue::new());
        rule.apply(&mut node);
        assert!(node.control("value").unwrap().is_visible());
    }
}
