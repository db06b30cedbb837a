//! Dynamic connector families
//!
//! A connector family is a run of input connectors named
//! `<prefix>_<index>` with 1-based contiguous indices. The family keeps
//! exactly one unlinked spare at the tail: linking the last member grows
//! the family by one, disconnecting shrinks trailing unlinked members
//! back down, and the base member never goes away.

use crate::connector::{family_index, ConnectorSide, DataType};
use crate::defaults::FamilyDefaults;
use crate::node::Node;
use crate::saved::SavedNode;
use log::debug;

/// Configuration for one managed connector family
#[derive(Debug, Clone)]
pub struct ConnectorFamily {
    pub prefix: String,
    pub data_type: DataType,
    pub max_connectors: usize,
}

impl ConnectorFamily {
    /// Creates a family with the default ceiling
    pub fn new(prefix: impl Into<String>, data_type: DataType) -> Self {
        Self {
            prefix: prefix.into(),
            data_type,
            max_connectors: FamilyDefaults::MAX_CONNECTORS,
        }
    }

    /// Overrides the growth ceiling
    pub fn with_max(mut self, max_connectors: usize) -> Self {
        self.max_connectors = max_connectors;
        self
    }

    /// Name of the floor member, `<prefix>_1`
    pub fn base_name(&self) -> String {
        self.slot_name(FamilyDefaults::BASE_INDEX)
    }

    /// Name of the member at the given index
    pub fn slot_name(&self, index: usize) -> String {
        format!("{}_{}", self.prefix, index)
    }

    /// Index of a member name, or `None` for names outside the family
    pub fn member_index(&self, name: &str) -> Option<usize> {
        family_index(name, &self.prefix)
    }

    /// Family members in input order as (index, name, linked)
    fn members(&self, node: &Node) -> Vec<(usize, String, bool)> {
        node.inputs
            .iter()
            .filter_map(|connector| {
                self.member_index(&connector.name)
                    .map(|index| (index, connector.name.clone(), connector.is_linked()))
            })
            .collect()
    }

    /// Removes every family member except `keep`, then resizes.
    ///
    /// Used at node creation to collapse a template's pre-declared run of
    /// members down to the single base connector.
    pub fn normalize(&self, node: &mut Node, keep: &str) {
        let extras: Vec<String> = node
            .inputs
            .iter()
            .filter(|connector| {
                connector.name != keep && self.member_index(&connector.name).is_some()
            })
            .map(|connector| connector.name.clone())
            .collect();
        for name in &extras {
            node.remove_input(name);
        }
        if !extras.is_empty() {
            debug!(
                "normalized {} family on node {}: removed {} members",
                self.prefix,
                node.id,
                extras.len()
            );
        }
        node.apply_computed_size();
    }

    /// Reacts to a connection event on the owning node.
    ///
    /// Output-side events are ignored. Input events grow the family when
    /// its last member just became linked and shrink trailing unlinked
    /// members after a disconnect; either way the node is resized to its
    /// computed footprint.
    pub fn on_connection_changed(&self, node: &mut Node, side: ConnectorSide, connected: bool) {
        if side != ConnectorSide::Input {
            return;
        }
        if connected {
            self.grow(node);
        } else {
            self.shrink(node);
        }
        node.apply_computed_size();
    }

    fn grow(&self, node: &mut Node) {
        let members = self.members(node);
        let Some((last_index, _, last_linked)) = members.last() else {
            return;
        };
        if !last_linked {
            return;
        }
        let next = last_index + 1;
        if next > self.max_connectors {
            return;
        }
        let name = self.slot_name(next);
        node.add_input(name.clone(), self.data_type);
        debug!("grew {} family on node {}: added {}", self.prefix, node.id, name);
    }

    fn shrink(&self, node: &mut Node) {
        let members = self.members(node);
        // Scan backward, keeping the base member no matter what
        for i in (1..members.len()).rev() {
            let (_, name, linked) = &members[i];
            if *linked {
                break;
            }
            if let Some(connector) = node.input_mut(name) {
                connector.label = None;
            }
            node.remove_input(name);
            debug!("shrank {} family on node {}: removed {}", self.prefix, node.id, name);
        }
    }

    /// Recreates family members up to the highest index a saved record
    /// names, so restored links have their connectors waiting.
    ///
    /// Indices beyond the ceiling are clamped; saved names outside the
    /// family are ignored.
    pub fn preallocate(&self, node: &mut Node, saved: &SavedNode) {
        let mut target = 0;
        for connector in &saved.inputs {
            if let Some(index) = self.member_index(&connector.name) {
                target = target.max(index);
            }
        }
        let target = target.min(self.max_connectors);
        let current = self
            .members(node)
            .last()
            .map(|(index, _, _)| *index)
            .unwrap_or(0);
        if target <= current {
            return;
        }
        for index in (current + 1)..=target {
            node.add_input(self.slot_name(index), self.data_type);
        }
        debug!(
            "preallocated {} family on node {} up to index {}",
            self.prefix, node.id, target
        );
        node.apply_computed_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saved::SavedConnector;
    use egui::Pos2;

    fn family() -> ConnectorFamily {
        ConnectorFamily::new("text", DataType::String)
    }

    fn node_with_members(count: usize) -> Node {
        let mut node = Node::new(0, "Picker_JN", Pos2::ZERO);
        for index in 1..=count {
            node.add_input(format!("text_{}", index), DataType::String);
        }
        node
    }

    fn link(node: &mut Node, name: &str, link_id: usize) {
        node.input_mut(name).unwrap().link = Some(link_id);
    }

    fn member_names(node: &Node) -> Vec<String> {
        node.inputs
            .iter()
            .filter(|connector| connector.name.starts_with("text_"))
            .map(|connector| connector.name.clone())
            .collect()
    }

    #[test]
    fn test_linking_last_member_appends_next_index() {
        let mut node = node_with_members(1);
        link(&mut node, "text_1", 10);

        family().on_connection_changed(&mut node, ConnectorSide::Input, true);
        assert_eq!(member_names(&node), vec!["text_1", "text_2"]);
        assert_eq!(node.size, node.compute_size());
    }

    #[test]
    fn test_no_growth_while_last_member_is_unlinked() {
        let mut node = node_with_members(3);
        link(&mut node, "text_1", 10);

        family().on_connection_changed(&mut node, ConnectorSide::Input, true);
        assert_eq!(member_names(&node).len(), 3);
    }

    #[test]
    fn test_growth_stops_at_the_ceiling() {
        let mut node = node_with_members(20);
        for index in 1..=20 {
            link(&mut node, &format!("text_{}", index), index);
        }

        family().on_connection_changed(&mut node, ConnectorSide::Input, true);
        assert_eq!(member_names(&node).len(), 20);
    }

    #[test]
    fn test_disconnect_shrinks_trailing_unlinked_members() {
        let mut node = node_with_members(3);
        link(&mut node, "text_1", 10);
        // text_2 was just disconnected, text_3 is the spare

        family().on_connection_changed(&mut node, ConnectorSide::Input, false);
        assert_eq!(member_names(&node), vec!["text_1"]);
    }

    #[test]
    fn test_shrink_stops_at_the_last_linked_member() {
        let mut node = node_with_members(5);
        link(&mut node, "text_1", 10);
        link(&mut node, "text_3", 11);

        family().on_connection_changed(&mut node, ConnectorSide::Input, false);
        assert_eq!(member_names(&node), vec!["text_1", "text_2", "text_3"]);
    }

    #[test]
    fn test_base_member_survives_disconnect_storm() {
        let mut node = node_with_members(4);
        for _ in 0..6 {
            family().on_connection_changed(&mut node, ConnectorSide::Input, false);
        }
        assert_eq!(member_names(&node), vec!["text_1"]);
    }

    #[test]
    fn test_output_side_events_are_ignored() {
        let mut node = node_with_members(2);
        link(&mut node, "text_1", 10);
        link(&mut node, "text_2", 11);

        family().on_connection_changed(&mut node, ConnectorSide::Output, true);
        assert_eq!(member_names(&node).len(), 2);
    }

    #[test]
    fn test_normalize_keeps_base_and_foreign_inputs() {
        let mut node = node_with_members(20);
        node.add_input("other", DataType::Any);

        family().normalize(&mut node, "text_1");
        assert_eq!(member_names(&node), vec!["text_1"]);
        assert!(node.input("other").is_some());
    }

    #[test]
    fn test_preallocate_recreates_saved_members_contiguously() {
        let mut node = node_with_members(1);
        let saved = SavedNode {
            inputs: vec![
                SavedConnector { name: "text_1".to_string() },
                SavedConnector { name: "text_4".to_string() },
                SavedConnector { name: "other".to_string() },
            ],
            controls: vec![],
        };

        family().preallocate(&mut node, &saved);
        assert_eq!(
            member_names(&node),
            vec!["text_1", "text_2", "text_3", "text_4"]
        );
    }

    #[test]
    fn test_preallocate_clamps_to_the_ceiling() {
        let mut node = node_with_members(1);
        let saved = SavedNode {
            inputs: vec![SavedConnector { name: "text_25".to_string() }],
            controls: vec![],
        };

        family().preallocate(&mut node, &saved);
        assert_eq!(member_names(&node).len(), 20);
    }

    #[test]
    fn test_malformed_names_are_not_members() {
        let mut node = node_with_members(1);
        node.add_input("text_x", DataType::String);
        link(&mut node, "text_1", 10);
        link(&mut node, "text_x", 11);

        family().on_connection_changed(&mut node, ConnectorSide::Input, true);
        // text_x never counts as the last member; text_1 does
        assert!(node.input("text_2").is_some());
        assert_eq!(member_names(&node).len(), 3);
    }
}
