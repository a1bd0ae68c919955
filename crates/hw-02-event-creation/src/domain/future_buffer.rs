//! Holds events born in rounds the local window has not reached yet.

use std::collections::BTreeMap;

use shared_types::{EventWindow, PlatformEvent};

#[derive(Debug, Default)]
pub struct FutureEventBuffer {
    pending: BTreeMap<u64, Vec<PlatformEvent>>,
}

impl FutureEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the event back if it may be processed now, `None` if it was
    /// buffered or discarded as ancient.
    pub fn add_event(&mut self, event: PlatformEvent, window: &EventWindow) -> Option<PlatformEvent> {
        if window.is_ancient(&event.descriptor) {
            return None;
        }
        let birth_round = event.descriptor.birth_round;
        if birth_round > window.new_event_birth_round() {
            self.pending.entry(birth_round).or_default().push(event);
            None
        } else {
            Some(event)
        }
    }

    /// Events that are no longer in the future, oldest birth round first.
    pub fn update_event_window(&mut self, window: &EventWindow) -> Vec<PlatformEvent> {
        let still_future = self.pending.split_off(&(window.new_event_birth_round() + 1));
        let released = std::mem::replace(&mut self.pending, still_future);
        released
            .into_values()
            .flatten()
            .filter(|event| !window.is_ancient(&event.descriptor))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
