//! Focus-minute change notifications.
//!
//! # Invariants
//! - Listeners run synchronously, in subscription order, after the store
//!   writes of the operation that published the event.
//! - Listeners may subscribe or unsubscribe from inside a callback; the
//!   change applies from the next publish.

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A change to one day's focus total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusUpdated {
    pub date: NaiveDate,
    /// Positive on completion, negative on un-completion.
    pub delta_minutes: i64,
}

/// Handle returned by [`FocusBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&FocusUpdated)>;

/// Single-threaded observer registry for [`FocusUpdated`].
#[derive(Default)]
pub struct FocusBus {
    listeners: RefCell<BTreeMap<SubscriptionId, Listener>>,
    next_id: Cell<u64>,
}

impl FocusBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&FocusUpdated) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(listener));
        id
    }

    /// Returns `false` when the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    /// Delivers `event` to every listener and returns how many ran.
    pub fn publish(&self, event: FocusUpdated) -> usize {
        let snapshot: Vec<Listener> = self.listeners.borrow().values().cloned().collect();
        for listener in &snapshot {
            listener(&event);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}
