//! Habit use-case service.
//!
//! # Responsibility
//! - Create, rename, toggle and soft-delete habits.
//! - Build the visible list: search filter, open habits before done ones.
//!
//! # Invariants
//! - Deleted habits are skipped by every mutation except raw listing.
//! - Toggling the same habit twice on one day restores its history.

use crate::clock::{allocate_id, Clock, IdGenerator};
use crate::model::habit::Habit;
use crate::model::validation::{required_text, ValidationError};
use crate::model::RecordId;
use crate::repo::collection_repo::HabitRepository;
use crate::service::{matches_search, ServiceResult};
use log::info;
use std::rc::Rc;

/// One row of the habit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitView {
    pub habit: Habit,
    pub done_today: bool,
    pub streak: usize,
}

/// Habit list operations. "Today" always comes from the injected clock.
pub struct HabitService<R: HabitRepository> {
    repo: R,
    clock: Rc<dyn Clock>,
    ids: Rc<dyn IdGenerator>,
}

impl<R: HabitRepository> HabitService<R> {
    /// Creates a service over `repo`; `ids` issues new habit ids.
    pub fn new(repo: R, clock: Rc<dyn Clock>, ids: Rc<dyn IdGenerator>) -> Self {
        Self { repo, clock, ids }
    }

    /// Appends a new habit with an empty history.
    pub fn create(&self, name: &str) -> ServiceResult<Habit> {
        let name = required_text(name, ValidationError::EmptyHabitName)?;
        let mut habits = self.repo.load_habits();
        let id = allocate_id(&*self.ids, habits.iter().map(|h| h.id));
        let habit = Habit::new(id, name);
        habits.push(habit.clone());
        self.repo.save_habits(&habits)?;

        info!("event=habit_create module=habits status=ok id={id}");
        Ok(habit)
    }

    /// Renames an active habit. Returns `false` when `id` is unknown.
    pub fn rename(&self, id: RecordId, name: &str) -> ServiceResult<bool> {
        let name = required_text(name, ValidationError::EmptyHabitName)?;
        self.update_active(id, "habit_rename", |habit| {
            habit.name = name;
        })
    }

    /// Flips today's completion. `None` when `id` is unknown, otherwise
    /// whether the habit is now done today.
    pub fn toggle_today(&self, id: RecordId) -> ServiceResult<Option<bool>> {
        let today = self.clock.today();
        let mut done = None;
        self.update_active(id, "habit_toggle", |habit| {
            done = Some(habit.toggle_on(today));
        })?;
        Ok(done)
    }

    /// Clears today's completion on every habit. Returns how many changed.
    pub fn reset_today(&self) -> ServiceResult<usize> {
        let today = self.clock.today();
        let mut habits = self.repo.load_habits();
        let changed = habits
            .iter_mut()
            .map(|habit| habit.clear_on(today))
            .filter(|cleared| *cleared)
            .count();
        if changed > 0 {
            self.repo.save_habits(&habits)?;
        }

        info!("event=habit_reset_today module=habits status=ok changed={changed}");
        Ok(changed)
    }

    /// Tombstones an active habit. The record stays in storage.
    pub fn soft_delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.update_active(id, "habit_delete", Habit::soft_delete)
    }

    /// Active habits matching `search`, open-today first, done-today last,
    /// each group in collection order.
    pub fn list_visible(&self, search: &str) -> Vec<HabitView> {
        let today = self.clock.today();
        let (open, done): (Vec<HabitView>, Vec<HabitView>) = self
            .repo
            .load_habits()
            .into_iter()
            .filter(|habit| habit.is_active() && matches_search(&habit.name, search))
            .map(|habit| HabitView {
                done_today: habit.is_done_on(today),
                streak: habit.streak(),
                habit,
            })
            .partition(|view| !view.done_today);
        open.into_iter().chain(done).collect()
    }

    /// Active habit by id.
    pub fn get(&self, id: RecordId) -> Option<Habit> {
        self.repo
            .load_habits()
            .into_iter()
            .find(|habit| habit.id == id && habit.is_active())
    }

    /// Raw collection, tombstones included.
    pub fn list_all(&self) -> Vec<Habit> {
        self.repo.load_habits()
    }

    fn update_active(
        &self,
        id: RecordId,
        event: &str,
        apply: impl FnOnce(&mut Habit),
    ) -> ServiceResult<bool> {
        let mut habits = self.repo.load_habits();
        let Some(habit) = habits.iter_mut().find(|h| h.id == id && h.is_active()) else {
            info!("event={event} module=habits status=skipped reason=not_found id={id}");
            return Ok(false);
        };
        apply(habit);
        self.repo.save_habits(&habits)?;

        info!("event={event} module=habits status=ok id={id}");
        Ok(true)
    }
}
