//! Observable value storage for controls
//!
//! A `ValueCell` wraps a control value and notifies its subscribers on
//! every write, including writes that store an unchanged value. The
//! subscribers installed by this crate never mutate the owning node
//! directly; they record the write in a shared `ChangeQueue` that the
//! behavior engine drains after each lifecycle event, which keeps
//! reactive updates from recursing into the node mid-mutation.

use crate::control::ControlValue;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type Subscriber = Rc<dyn Fn(&ControlValue)>;

/// A control value with synchronous change notification
///
/// Serializes as the bare value; subscribers are runtime state and are
/// re-installed by behavior bind calls after a load.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueCell {
    value: ControlValue,
    #[serde(skip)]
    subscribers: Vec<Subscriber>,
}

impl ValueCell {
    /// Creates a cell holding the given value with no subscribers
    pub fn new(value: impl Into<ControlValue>) -> Self {
        Self {
            value: value.into(),
            subscribers: Vec::new(),
        }
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> ControlValue {
        self.value.clone()
    }

    /// Borrows the current value
    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// Stores a value and notifies every subscriber before returning
    pub fn set(&mut self, value: impl Into<ControlValue>) {
        self.value = value.into();
        for subscriber in &self.subscribers {
            subscriber(&self.value);
        }
    }

    /// Registers a subscriber invoked on every subsequent write
    pub fn on_change(&mut self, subscriber: impl Fn(&ControlValue) + 'static) {
        self.subscribers.push(Rc::new(subscriber));
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for ValueCell {
    fn default() -> Self {
        Self::new(ControlValue::Null)
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A recorded control write awaiting engine dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ControlWrite {
    pub node: NodeId,
    pub control: String,
}

/// Shared queue of control writes
///
/// Clones share storage, so a queue handed to a cell subscriber feeds the
/// same backlog the engine drains.
#[derive(Clone, Default)]
pub struct ChangeQueue {
    inner: Rc<RefCell<VecDeque<ControlWrite>>>,
}

impl ChangeQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a write to the backlog
    pub fn push(&self, write: ControlWrite) {
        self.inner.borrow_mut().push_back(write);
    }

    /// Takes the current backlog, leaving the queue empty
    pub fn take(&self) -> Vec<ControlWrite> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Discards every pending write
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl fmt::Debug for ChangeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeQueue")
            .field("pending", &self.len())
            .finish()
    }
}
