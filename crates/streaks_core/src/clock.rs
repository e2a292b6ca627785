//! Injectable time and identifier sources.
//!
//! Services never read the wall clock directly; they take a [`Clock`] and an
//! [`IdGenerator`] so that "today", overdue checks and creation order are
//! deterministic under test.

use crate::model::RecordId;
use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current local date-time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Produces creation-ordered record identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> RecordId;
}

/// Epoch-millisecond ids that never repeat within one generator, even when
/// several records are created in the same millisecond.
pub struct ClockIdGenerator<C: Clock> {
    clock: C,
    last: Cell<RecordId>,
}

impl<C: Clock> ClockIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: Cell::new(0),
        }
    }
}

impl<C: Clock> IdGenerator for ClockIdGenerator<C> {
    fn next_id(&self) -> RecordId {
        let millis = self.clock.now().and_utc().timestamp_millis();
        let id = millis.max(self.last.get().saturating_add(1));
        self.last.set(id);
        id
    }
}

/// Counter starting at a fixed value.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: Cell<RecordId>,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: RecordId) -> Self {
        Self {
            next: Cell::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RecordId {
        let id = self.next.get();
        self.next.set(id.saturating_add(1));
        id
    }
}

/// Draws an id that is unused within `existing`.
///
/// Falls back to one past the current maximum when the generator collides
/// with a record loaded from an older session.
pub fn allocate_id(
    ids: &dyn IdGenerator,
    existing: impl IntoIterator<Item = RecordId>,
) -> RecordId {
    let candidate = ids.next_id();
    let mut max_seen = None;
    let mut collides = false;
    for id in existing {
        collides |= id == candidate;
        max_seen = max_seen.max(Some(id));
    }
    match (collides, max_seen) {
        (true, Some(max)) => max.saturating_add(1),
        _ => candidate,
    }
}
