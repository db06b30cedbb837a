//! Behavior dispatch engine
//!
//! The engine is the single entry point the host drives. It routes
//! lifecycle events to the behavior registered for each node's type id,
//! fans connection changes out to both endpoints, and drains the control
//! change queue after every event so reactive visibility updates land
//! before control returns to the host.

use crate::behavior::{BehaviorCtx, ConnectionEvent};
use crate::connector::ConnectorSide;
use crate::control::ControlValue;
use crate::defaults::EngineDefaults;
use crate::graph::{Link, LinkId, NodeGraph};
use crate::node::{Node, NodeId};
use crate::observable::{ChangeQueue, ControlWrite};
use crate::registry::BehaviorRegistry;
use crate::saved::SavedNode;
use crate::schedule::SettleQueue;
use log::{debug, warn};

/// Dispatches host lifecycle events to registered node behaviors
pub struct BehaviorEngine {
    registry: BehaviorRegistry,
    settle: SettleQueue,
    changes: ChangeQueue,
}

impl BehaviorEngine {
    /// Creates an engine with the built-in behaviors registered
    pub fn new() -> Self {
        Self::with_registry(BehaviorRegistry::with_builtins())
    }

    /// Creates an engine over a caller-assembled registry
    pub fn with_registry(registry: BehaviorRegistry) -> Self {
        Self {
            registry,
            settle: SettleQueue::new(),
            changes: ChangeQueue::new(),
        }
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.registry
    }

    /// True while deferred settle tasks are waiting for a `settle` call
    pub fn has_pending_settle(&self) -> bool {
        !self.settle.is_empty()
    }

    /// Reports a freshly constructed node
    pub fn node_created(&mut self, graph: &mut NodeGraph, node_id: NodeId) {
        if let Some(node) = graph.nodes.get_mut(&node_id) {
            if let Some(behavior) = self.registry.get_mut(&node.type_id) {
                let mut ctx = BehaviorCtx::new(&self.changes, &mut self.settle);
                behavior.on_created(node, &mut ctx);
            }
        }
        self.drain_changes(graph);
    }

    /// Restores a node from its saved record.
    ///
    /// The behavior runs first so connectors the saved links expect are
    /// recreated and reactive bindings are re-established; the saved
    /// control values are then written positionally through the value
    /// cells, which routes driver restores through the same reactive
    /// path as live edits.
    pub fn node_configured(&mut self, graph: &mut NodeGraph, node_id: NodeId, saved: &SavedNode) {
        let Some(node) = graph.nodes.get_mut(&node_id) else {
            debug!("configure for missing node {} ignored", node_id);
            return;
        };
        if let Some(behavior) = self.registry.get_mut(&node.type_id) {
            let mut ctx = BehaviorCtx::new(&self.changes, &mut self.settle);
            behavior.on_configure(node, saved, &mut ctx);
        }
        for (control, value) in node.controls.iter_mut().zip(saved.controls.iter()) {
            control.value.set(value.clone());
        }
        self.drain_changes(graph);
    }

    /// Removes a node, cancelling its settle task and notifying the
    /// neighbors whose links died with it
    pub fn node_removed(&mut self, graph: &mut NodeGraph, node_id: NodeId) -> Option<Node> {
        self.settle.cancel(node_id);
        let touching = graph.links_touching(node_id);
        let removed = graph.remove_node(node_id)?;
        for link in touching {
            if link.from_node != node_id {
                self.dispatch_connection(
                    graph,
                    link.from_node,
                    &link.from_connector,
                    ConnectorSide::Output,
                    false,
                );
            }
            if link.to_node != node_id {
                self.dispatch_connection(
                    graph,
                    link.to_node,
                    &link.to_connector,
                    ConnectorSide::Input,
                    false,
                );
            }
        }
        self.drain_changes(graph);
        Some(removed)
    }

    /// Connects two connectors and dispatches the change to both ends.
    ///
    /// When the target input was already linked, the displaced source
    /// receives an output-side disconnect; the input slot itself never
    /// observes an unlinked state during the replace.
    pub fn connect(
        &mut self,
        graph: &mut NodeGraph,
        from_node: NodeId,
        from_connector: &str,
        to_node: NodeId,
        to_connector: &str,
    ) -> Result<LinkId, &'static str> {
        let replaced = graph.input_link(to_node, to_connector).cloned();
        let link_id = graph.connect(from_node, from_connector, to_node, to_connector)?;

        if let Some(old) = replaced {
            self.dispatch_connection(
                graph,
                old.from_node,
                &old.from_connector,
                ConnectorSide::Output,
                false,
            );
        }
        self.dispatch_connection(graph, from_node, from_connector, ConnectorSide::Output, true);
        self.dispatch_connection(graph, to_node, to_connector, ConnectorSide::Input, true);
        self.drain_changes(graph);
        Ok(link_id)
    }

    /// Removes a link and dispatches the change to both ends
    pub fn disconnect(&mut self, graph: &mut NodeGraph, link_id: LinkId) -> Option<Link> {
        let link = graph.disconnect(link_id)?;
        self.dispatch_connection(
            graph,
            link.from_node,
            &link.from_connector,
            ConnectorSide::Output,
            false,
        );
        self.dispatch_connection(
            graph,
            link.to_node,
            &link.to_connector,
            ConnectorSide::Input,
            false,
        );
        self.drain_changes(graph);
        Some(link)
    }

    /// Writes a control value on behalf of the host.
    ///
    /// Watched controls enqueue the write through their cell subscriber;
    /// everything else is enqueued here, so behaviors observe one
    /// uniform change stream either way.
    pub fn set_control_value(
        &mut self,
        graph: &mut NodeGraph,
        node_id: NodeId,
        control: &str,
        value: impl Into<ControlValue>,
    ) {
        let Some(node) = graph.nodes.get_mut(&node_id) else {
            debug!("value write for missing node {} ignored", node_id);
            return;
        };
        let Some(target) = node.control_mut(control) else {
            debug!(
                "value write for missing control {} on node {} ignored",
                control, node_id
            );
            return;
        };
        let watched = target.watched;
        target.value.set(value);
        if !watched {
            self.changes.push(ControlWrite {
                node: node_id,
                control: control.to_string(),
            });
        }
        self.drain_changes(graph);
    }

    /// Reports a button control press
    pub fn press_button(&mut self, graph: &mut NodeGraph, node_id: NodeId, control: &str) {
        let Some(type_id) = graph.nodes.get(&node_id).map(|node| node.type_id.clone()) else {
            debug!("button press for missing node {} ignored", node_id);
            return;
        };
        if let Some(behavior) = self.registry.get_mut(&type_id) {
            behavior.on_button(graph, node_id, control);
        }
        self.drain_changes(graph);
    }

    /// Runs the deferred settle tasks queued by behaviors.
    ///
    /// The host calls this once construction and configuration have
    /// finished for the batch of nodes it was building. Tasks whose node
    /// was torn down in the meantime are skipped.
    pub fn settle(&mut self, graph: &mut NodeGraph) {
        let due = self.settle.drain();
        for node_id in due {
            let Some(node) = graph.nodes.get_mut(&node_id) else {
                debug!("settle task for removed node {} skipped", node_id);
                continue;
            };
            let Some(behavior) = self.registry.get_mut(&node.type_id) else {
                continue;
            };
            let mut ctx = BehaviorCtx::new(&self.changes, &mut self.settle);
            behavior.on_settled(node, &mut ctx);
        }
        self.drain_changes(graph);
    }

    fn dispatch_connection(
        &mut self,
        graph: &mut NodeGraph,
        node_id: NodeId,
        connector: &str,
        side: ConnectorSide,
        connected: bool,
    ) {
        let Some(node) = graph.nodes.get_mut(&node_id) else {
            return;
        };
        let slot = match side {
            ConnectorSide::Input => node.input_slot(connector),
            ConnectorSide::Output => node.output_slot(connector),
        };
        let Some(slot) = slot else {
            return;
        };
        let Some(behavior) = self.registry.get_mut(&node.type_id) else {
            return;
        };
        let mut ctx = BehaviorCtx::new(&self.changes, &mut self.settle);
        behavior.on_connection_changed(
            node,
            ConnectionEvent {
                side,
                slot,
                connected,
            },
            &mut ctx,
        );
    }

    /// Delivers queued control writes to behaviors, in rounds.
    ///
    /// A behavior reacting to a write may produce further writes; those
    /// are picked up by the next round. The round cap breaks feedback
    /// cycles between watched controls.
    fn drain_changes(&mut self, graph: &mut NodeGraph) {
        for _ in 0..EngineDefaults::MAX_CHANGE_ROUNDS {
            let batch = self.changes.take();
            if batch.is_empty() {
                return;
            }
            for write in batch {
                let Some(node) = graph.nodes.get_mut(&write.node) else {
                    debug!("control write for missing node {} dropped", write.node);
                    continue;
                };
                let Some(behavior) = self.registry.get_mut(&node.type_id) else {
                    continue;
                };
                let mut ctx = BehaviorCtx::new(&self.changes, &mut self.settle);
                behavior.on_control_changed(node, &write.control, &mut ctx);
            }
        }
        if !self.changes.is_empty() {
            warn!(
                "control writes still arriving after {} dispatch rounds; dropping {} pending",
                EngineDefaults::MAX_CHANGE_ROUNDS,
                self.changes.len()
            );
            self.changes.clear();
        }
    }
}

impl Default for BehaviorEngine {
    fn default() -> Self {
        Self::new()
    }
}
