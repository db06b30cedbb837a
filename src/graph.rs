//! Node graph data structures and operations

use crate::node::{Node, NodeId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a link
pub type LinkId = usize;

/// Represents a link between an output connector and an input connector
/// on two different nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from_node: NodeId,
    pub from_connector: String,
    pub to_node: NodeId,
    pub to_connector: String,
}

/// A graph containing nodes and the links between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub links: HashMap<LinkId, Link>,
    next_node_id: NodeId,
    next_link_id: LinkId,
    #[serde(skip)]
    canvas_dirty: bool,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            links: HashMap::new(),
            next_node_id: 0,
            next_link_id: 0,
            canvas_dirty: false,
        }
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        node.id = id;
        self.nodes.insert(id, node);
        self.next_node_id += 1;
        self.mark_canvas_dirty();
        id
    }

    /// Adds a node to the graph with a specific ID (for testing)
    pub fn add_node_with_id(&mut self, id: NodeId, mut node: Node) -> NodeId {
        node.id = id;
        self.nodes.insert(id, node);
        // Keep the id counter ahead of manually chosen ids
        if id >= self.next_node_id {
            self.next_node_id = id + 1;
        }
        id
    }

    /// Removes a node and every link attached to it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        for link_id in self.link_ids_touching(node_id) {
            self.disconnect(link_id);
        }
        let removed = self.nodes.remove(&node_id);
        if removed.is_some() {
            self.mark_canvas_dirty();
        }
        removed
    }

    /// Connects an output connector to an input connector.
    ///
    /// An input already carrying a link has that link replaced; the old
    /// link is removed before the new one is recorded, so the input never
    /// observes an unlinked state.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_connector: &str,
        to_node: NodeId,
        to_connector: &str,
    ) -> Result<LinkId, &'static str> {
        if from_node == to_node {
            return Err("Cannot connect a node to itself");
        }
        if !self.nodes.contains_key(&from_node) {
            return Err("Source node does not exist");
        }
        if !self.nodes.contains_key(&to_node) {
            return Err("Target node does not exist");
        }

        let from_type = self.nodes[&from_node]
            .output(from_connector)
            .map(|connector| connector.data_type)
            .ok_or("Source connector does not exist")?;
        let to_type = self.nodes[&to_node]
            .input(to_connector)
            .map(|connector| connector.data_type)
            .ok_or("Target connector does not exist")?;
        if !from_type.can_connect_to(&to_type) {
            return Err("Incompatible data types");
        }

        // Replace an occupied input rather than stacking links on it
        if let Some(previous) = self.input_link(to_node, to_connector).map(|link| link.id) {
            self.links.remove(&previous);
            debug!(
                "replaced link {} on {}:{}",
                previous, to_node, to_connector
            );
        }

        let id = self.next_link_id;
        self.next_link_id += 1;
        self.links.insert(
            id,
            Link {
                id,
                from_node,
                from_connector: from_connector.to_string(),
                to_node,
                to_connector: to_connector.to_string(),
            },
        );
        if let Some(node) = self.nodes.get_mut(&to_node) {
            if let Some(connector) = node.input_mut(to_connector) {
                connector.link = Some(id);
            }
        }
        self.mark_canvas_dirty();
        Ok(id)
    }

    /// Removes a link and clears the input connector it fed
    pub fn disconnect(&mut self, link_id: LinkId) -> Option<Link> {
        let link = self.links.remove(&link_id)?;
        if let Some(node) = self.nodes.get_mut(&link.to_node) {
            if let Some(connector) = node.input_mut(&link.to_connector) {
                if connector.link == Some(link_id) {
                    connector.link = None;
                }
            }
        }
        self.mark_canvas_dirty();
        Some(link)
    }

    /// Looks up the link feeding an input connector
    pub fn input_link(&self, node: NodeId, connector: &str) -> Option<&Link> {
        let link_id = self.nodes.get(&node)?.input(connector)?.link?;
        self.links.get(&link_id)
    }

    /// Links with either endpoint on the given node
    pub fn links_touching(&self, node: NodeId) -> Vec<Link> {
        self.links
            .values()
            .filter(|link| link.from_node == node || link.to_node == node)
            .cloned()
            .collect()
    }

    fn link_ids_touching(&self, node: NodeId) -> Vec<LinkId> {
        self.links
            .values()
            .filter(|link| link.from_node == node || link.to_node == node)
            .map(|link| link.id)
            .collect()
    }

    /// Flags the canvas for redraw
    pub fn mark_canvas_dirty(&mut self) {
        self.canvas_dirty = true;
    }

    /// Reads and clears the redraw flag
    pub fn take_canvas_dirty(&mut self) -> bool {
        std::mem::take(&mut self.canvas_dirty)
    }

    /// Updates connector positions for all nodes
    pub fn update_all_port_positions(&mut self) {
        for node in self.nodes.values_mut() {
            node.update_port_positions();
        }
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DataType;
    use egui::Pos2;

    fn string_source() -> Node {
        let mut node = Node::new(0, "Source", Pos2::ZERO);
        node.add_output("text", DataType::String);
        node
    }

    fn string_sink() -> Node {
        let mut node = Node::new(0, "Sink", Pos2::ZERO);
        node.add_input("text_1", DataType::String);
        node
    }

    #[test]
    fn test_connect_validates_endpoints() {
        let mut graph = NodeGraph::new();
        let source = graph.add_node(string_source());
        let sink = graph.add_node(string_sink());

        assert_eq!(
            graph.connect(source, "text", source, "text"),
            Err("Cannot connect a node to itself")
        );
        assert_eq!(
            graph.connect(99, "text", sink, "text_1"),
            Err("Source node does not exist")
        );
        assert_eq!(
            graph.connect(source, "missing", sink, "text_1"),
            Err("Source connector does not exist")
        );
        assert_eq!(
            graph.connect(source, "text", sink, "missing"),
            Err("Target connector does not exist")
        );
        assert!(graph.connect(source, "text", sink, "text_1").is_ok());
    }

    #[test]
    fn test_connect_rejects_incompatible_types() {
        let mut graph = NodeGraph::new();
        let mut source = Node::new(0, "Numbers", Pos2::ZERO);
        source.add_output("value", DataType::Integer);
        let source = graph.add_node(source);
        let sink = graph.add_node(string_sink());

        assert_eq!(
            graph.connect(source, "value", sink, "text_1"),
            Err("Incompatible data types")
        );
    }

    #[test]
    fn test_connect_replaces_occupied_input() {
        let mut graph = NodeGraph::new();
        let first = graph.add_node(string_source());
        let second = graph.add_node(string_source());
        let sink = graph.add_node(string_sink());

        let old = graph.connect(first, "text", sink, "text_1").unwrap();
        let new = graph.connect(second, "text", sink, "text_1").unwrap();

        assert!(!graph.links.contains_key(&old));
        assert_eq!(
            graph.nodes[&sink].input("text_1").unwrap().link,
            Some(new)
        );
        assert_eq!(graph.links.len(), 1);
    }

    #[test]
    fn test_disconnect_clears_input_connector() {
        let mut graph = NodeGraph::new();
        let source = graph.add_node(string_source());
        let sink = graph.add_node(string_sink());

        let link = graph.connect(source, "text", sink, "text_1").unwrap();
        let removed = graph.disconnect(link).unwrap();
        assert_eq!(removed.from_node, source);
        assert!(graph.nodes[&sink].input("text_1").unwrap().link.is_none());
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_remove_node_clears_neighbor_links() {
        let mut graph = NodeGraph::new();
        let source = graph.add_node(string_source());
        let sink = graph.add_node(string_sink());

        graph.connect(source, "text", sink, "text_1").unwrap();
        graph.remove_node(source);

        assert!(graph.links.is_empty());
        assert!(graph.nodes[&sink].input("text_1").unwrap().link.is_none());
    }

    #[test]
    fn test_canvas_dirty_flag_reads_once() {
        let mut graph = NodeGraph::new();
        graph.add_node(string_source());
        assert!(graph.take_canvas_dirty());
        assert!(!graph.take_canvas_dirty());
    }
}
