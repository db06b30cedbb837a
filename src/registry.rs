//! Behavior registration by node type id

use crate::behavior::NodeBehavior;
use crate::behaviors::{LabeledIndexBehavior, PickerBehavior, SearchReplaceBehavior};
use log::debug;
use std::collections::HashMap;

/// Maps node type ids to the behavior dispatched for them
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Box<dyn NodeBehavior>>,
}

impl BehaviorRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in behaviors registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Picker_JN", Box::new(PickerBehavior::new()));
        registry.register("SearchReplace_JN", Box::new(SearchReplaceBehavior::new()));
        registry.register("LabeledIndex_JN", Box::new(LabeledIndexBehavior::new()));
        registry
    }

    /// Registers a behavior for a node type, replacing any previous one
    pub fn register(&mut self, type_id: impl Into<String>, behavior: Box<dyn NodeBehavior>) {
        let type_id = type_id.into();
        debug!("registered behavior for {}", type_id);
        self.behaviors.insert(type_id, behavior);
    }

    /// Looks up the behavior for a node type
    pub fn get(&self, type_id: &str) -> Option<&dyn NodeBehavior> {
        self.behaviors.get(type_id).map(|behavior| behavior.as_ref())
    }

    /// Looks up the behavior for a node type, mutably
    pub fn get_mut(&mut self, type_id: &str) -> Option<&mut Box<dyn NodeBehavior>> {
        self.behaviors.get_mut(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.behaviors.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Clone for BehaviorRegistry {
    fn clone(&self) -> Self {
        Self {
            behaviors: self
                .behaviors
                .iter()
                .map(|(type_id, behavior)| (type_id.clone(), behavior.clone_box()))
                .collect(),
        }
    }
}
