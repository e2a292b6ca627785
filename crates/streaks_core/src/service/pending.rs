//! Cancellable finalize deadlines for two-phase task completion.
//!
//! # Invariants
//! - At most one deadline per task id.
//! - A cancelled entry never fires.

use crate::model::RecordId;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Finalize deadlines keyed by task id.
#[derive(Debug, Default)]
pub struct PendingCompletions {
    deadlines: BTreeMap<RecordId, NaiveDateTime>,
}

impl PendingCompletions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the deadline for `id`.
    pub fn schedule(&mut self, id: RecordId, deadline: NaiveDateTime) -> Option<NaiveDateTime> {
        self.deadlines.insert(id, deadline)
    }

    /// Returns `true` when a pending entry was removed.
    pub fn cancel(&mut self, id: RecordId) -> bool {
        self.deadlines.remove(&id).is_some()
    }

    /// Whether `id` is waiting for its finalize.
    pub fn is_pending(&self, id: RecordId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest registered deadline.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.deadlines.values().min().copied()
    }

    /// Every id whose deadline is at or before `now`, earliest deadline
    /// first. Entries stay registered until [`Self::cancel`] removes them.
    pub fn due_at(&self, now: NaiveDateTime) -> Vec<RecordId> {
        let mut due: Vec<(NaiveDateTime, RecordId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort_unstable();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Number of registered deadlines.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
