//! Tracks the latest event per creator that has no known child.

use std::collections::HashMap;

use shared_types::{EventDescriptor, EventWindow, Hash, NodeId};

#[derive(Debug, Default)]
pub struct ChildlessEventTracker {
    childless: HashMap<NodeId, EventDescriptor>,
    // Events known to have a child, so a late-arriving parent is not re-added.
    parented: HashMap<Hash, EventDescriptor>,
}

impl ChildlessEventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer event and retire its parents.
    pub fn add_event<'a>(
        &mut self,
        event: &EventDescriptor,
        parents: impl IntoIterator<Item = &'a EventDescriptor>,
    ) {
        for parent in parents {
            self.retire(parent);
        }
        if self.parented.contains_key(&event.hash) {
            return;
        }
        match self.childless.get(&event.creator) {
            Some(existing) if existing.generation >= event.generation => {}
            _ => {
                self.childless.insert(event.creator, *event);
            }
        }
    }

    /// Parents of a self event are no longer candidates.
    pub fn register_self_event_parents<'a>(
        &mut self,
        parents: impl IntoIterator<Item = &'a EventDescriptor>,
    ) {
        for parent in parents {
            self.retire(parent);
        }
    }

    fn retire(&mut self, parent: &EventDescriptor) {
        self.parented.insert(parent.hash, *parent);
        if self
            .childless
            .get(&parent.creator)
            .is_some_and(|current| current.hash == parent.hash)
        {
            self.childless.remove(&parent.creator);
        }
    }

    pub fn childless_events(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.childless.values()
    }

    pub fn set_event_window(&mut self, window: &EventWindow) {
        self.childless.retain(|_, event| !window.is_ancient(event));
        self.parented.retain(|_, event| !window.is_ancient(event));
    }

    pub fn clear(&mut self) {
        self.childless.clear();
        self.parented.clear();
    }

    pub fn len(&self) -> usize {
        self.childless.len()
    }

    pub fn is_empty(&self) -> bool {
        self.childless.is_empty()
    }
}
