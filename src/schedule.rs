//! Deferred single-shot tasks keyed by node
//!
//! Behaviors queue an "apply once the host settles" task instead of
//! acting during node construction, because companion controls and saved
//! links keep arriving after the creation hook returns. The host drives
//! the queue by calling `BehaviorEngine::settle` once construction,
//! configuration, and link restoration are done.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Pending settle tasks, one per node at most
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettleQueue {
    pending: Vec<NodeId>,
}

impl SettleQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a settle task for the node; scheduling an already queued
    /// node coalesces into the existing task
    pub fn schedule(&mut self, node: NodeId) {
        if !self.pending.contains(&node) {
            self.pending.push(node);
        }
    }

    /// Drops the pending task for a node, if any
    pub fn cancel(&mut self, node: NodeId) {
        self.pending.retain(|pending| *pending != node);
    }

    /// Takes every due task in scheduling order
    pub fn drain(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_scheduled(&self, node: NodeId) -> bool {
        self.pending.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
