//! Node behavior hooks
//!
//! This module provides a trait-based system for node types to manage
//! their own connectors and controls across the node lifecycle. The
//! engine dispatches host events to the behavior registered for a node's
//! type id; every hook defaults to a no-op so behaviors implement only
//! what they need.

use crate::connector::ConnectorSide;
use crate::graph::NodeGraph;
use crate::node::{Node, NodeId};
use crate::observable::ChangeQueue;
use crate::saved::SavedNode;
use crate::schedule::SettleQueue;

/// A connection change as reported to a behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEvent {
    /// Side of the node the changed connector sits on
    pub side: ConnectorSide,
    /// Position of the connector within that side's list
    pub slot: usize,
    /// True for a new link, false for a removal
    pub connected: bool,
}

/// Engine services available to behavior hooks
pub struct BehaviorCtx<'a> {
    changes: &'a ChangeQueue,
    settle: &'a mut SettleQueue,
}

impl<'a> BehaviorCtx<'a> {
    pub fn new(changes: &'a ChangeQueue, settle: &'a mut SettleQueue) -> Self {
        Self { changes, settle }
    }

    /// Queue the reactive bindings feed their writes into
    pub fn changes(&self) -> &ChangeQueue {
        self.changes
    }

    /// Defers a single settled-state pass for the node; runs on the next
    /// `BehaviorEngine::settle` call and no-ops if the node is gone by
    /// then
    pub fn defer_apply(&mut self, node: NodeId) {
        self.settle.schedule(node);
    }
}

/// Trait for node-type-specific lifecycle behavior
pub trait NodeBehavior: Send + Sync {
    /// Called when a node of this type is constructed
    fn on_created(&mut self, _node: &mut Node, _ctx: &mut BehaviorCtx) {
        // Default: no special handling
    }

    /// Called when a node is restored from a saved record, after
    /// `on_created` and before saved control values are written back
    fn on_configure(&mut self, _node: &mut Node, _saved: &SavedNode, _ctx: &mut BehaviorCtx) {
        // Default: no special handling
    }

    /// Called when a link on this node is added or removed
    fn on_connection_changed(
        &mut self,
        _node: &mut Node,
        _event: ConnectionEvent,
        _ctx: &mut BehaviorCtx,
    ) {
        // Default: no special handling
    }

    /// Called once per control write the engine saw, whether the write
    /// came from an edit, a restore, or another behavior
    fn on_control_changed(&mut self, _node: &mut Node, _control: &str, _ctx: &mut BehaviorCtx) {
        // Default: no special handling
    }

    /// Called when the host reports a button control press
    fn on_button(&mut self, _graph: &mut NodeGraph, _node: NodeId, _control: &str) {
        // Default: no special handling
    }

    /// Called when a deferred settle task for the node comes due
    fn on_settled(&mut self, _node: &mut Node, _ctx: &mut BehaviorCtx) {
        // Default: no special handling
    }

    /// Clone the behavior for registration
    fn clone_box(&self) -> Box<dyn NodeBehavior>;
}

/// Default behavior for node types without special handling
#[derive(Clone)]
pub struct DefaultBehavior;

impl NodeBehavior for DefaultBehavior {
    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
