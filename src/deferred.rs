//! Tick-deadline queue for delayed effects.
//!
//! Actions are plain data, so clearing the queue is enough to guarantee that
//! nothing scheduled by an earlier session ever runs against a new one.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Spawn the grid for the given wave index.
    SpawnWave(u32),
    DismissBanner,
    ClearHitFlash,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredActionQueue {
    pending: BTreeMap<u64, Vec<DeferredAction>>,
}

impl DeferredActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire once the tick counter reaches `deadline`.
    pub fn schedule(&mut self, deadline: u64, action: DeferredAction) {
        self.pending.entry(deadline).or_default().push(action);
    }

    /// Remove and return every action whose deadline is `<= now`, ordered by
    /// deadline and then by scheduling order.
    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let due = match now.checked_add(1) {
            Some(next) => {
                let later = self.pending.split_off(&next);
                std::mem::replace(&mut self.pending, later)
            }
            None => std::mem::take(&mut self.pending),
        };
        due.into_values().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending action without firing it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
