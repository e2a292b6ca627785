//! Reminder use-case service.
//!
//! # Invariants
//! - The visible list keeps insertion order; chronological order is a
//!   separate view.
//! - Deleted and past-dated reminders never appear in either view.

use crate::clock::{allocate_id, Clock, IdGenerator};
use crate::model::reminder::{Reminder, ReminderDraft};
use crate::model::RecordId;
use crate::repo::collection_repo::ReminderRepository;
use crate::service::ServiceResult;
use chrono::NaiveDate;
use log::info;
use std::rc::Rc;

/// Reminder operations with soft delete.
pub struct ReminderService<R: ReminderRepository> {
    repo: R,
    clock: Rc<dyn Clock>,
    ids: Rc<dyn IdGenerator>,
}

impl<R: ReminderRepository> ReminderService<R> {
    /// Creates a service over `repo`; `ids` issues new reminder ids.
    pub fn new(repo: R, clock: Rc<dyn Clock>, ids: Rc<dyn IdGenerator>) -> Self {
        Self { repo, clock, ids }
    }

    /// Validates `draft` and appends an active reminder.
    pub fn create(&self, draft: &ReminderDraft) -> ServiceResult<Reminder> {
        let (title, date) = draft.validate()?;
        let mut reminders = self.repo.load_reminders();
        let id = allocate_id(&*self.ids, reminders.iter().map(|r| r.id));
        let reminder = Reminder {
            id,
            title,
            date: Some(date),
            time: draft.time,
            deleted: false,
        };
        reminders.push(reminder.clone());
        self.repo.save_reminders(&reminders)?;

        info!(
            "event=reminder_create module=reminders status=ok id={id} timed={}",
            reminder.time.is_some()
        );
        Ok(reminder)
    }

    /// Replaces title, date and time of an active reminder.
    /// `Ok(None)` when `id` is unknown or deleted.
    pub fn update(&self, id: RecordId, draft: &ReminderDraft) -> ServiceResult<Option<Reminder>> {
        let (title, date) = draft.validate()?;
        let mut reminders = self.repo.load_reminders();
        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id && r.is_active()) else {
            return Ok(None);
        };
        reminder.title = title;
        reminder.date = Some(date);
        reminder.time = draft.time;
        let updated = reminder.clone();
        self.repo.save_reminders(&reminders)?;

        info!("event=reminder_update module=reminders status=ok id={id}");
        Ok(Some(updated))
    }

    /// Tombstones an active reminder; the record stays in storage.
    pub fn soft_delete(&self, id: RecordId) -> ServiceResult<bool> {
        let mut reminders = self.repo.load_reminders();
        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id && r.is_active()) else {
            return Ok(false);
        };
        reminder.soft_delete();
        self.repo.save_reminders(&reminders)?;

        info!("event=reminder_delete module=reminders status=ok id={id}");
        Ok(true)
    }

    /// Active reminders dated today or later, in insertion order.
    pub fn list_visible(&self) -> Vec<Reminder> {
        visible_reminders(self.repo.load_reminders(), self.clock.today())
    }

    /// Same records as [`Self::list_visible`], earliest moment first.
    pub fn list_chronological(&self) -> Vec<Reminder> {
        let mut reminders = self.list_visible();
        reminders.sort_by(Reminder::chronological_cmp);
        reminders
    }

    /// Whether the reminder's moment has passed relative to the clock.
    pub fn is_overdue(&self, reminder: &Reminder) -> bool {
        reminder.is_overdue(self.clock.now())
    }

    /// Active reminder by id.
    pub fn get(&self, id: RecordId) -> Option<Reminder> {
        self.repo
            .load_reminders()
            .into_iter()
            .find(|r| r.id == id && r.is_active())
    }

    /// Raw collection, tombstones included.
    pub fn list_all(&self) -> Vec<Reminder> {
        self.repo.load_reminders()
    }
}

/// Filters a raw collection down to the upcoming, active reminders.
pub fn visible_reminders(reminders: Vec<Reminder>, today: NaiveDate) -> Vec<Reminder> {
    reminders
        .into_iter()
        .filter(|r| r.is_active() && r.is_upcoming(today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ReminderService;
    use crate::clock::{FixedClock, SequentialIdGenerator};
    use crate::model::reminder::ReminderDraft;
    use crate::store::kv::MemoryKvStore;
    use crate::store::record_store::RecordStore;
    use chrono::{NaiveDate, NaiveTime};
    use std::rc::Rc;

    fn service() -> ReminderService<RecordStore<MemoryKvStore>> {
        let now = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ReminderService::new(
            RecordStore::new(MemoryKvStore::new()),
            Rc::new(FixedClock::new(now)),
            Rc::new(SequentialIdGenerator::default()),
        )
    }

    fn draft(title: &str, day: u32, time: Option<(u32, u32)>) -> ReminderDraft {
        ReminderDraft {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, day),
            time: time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
        }
    }

    #[test]
    fn chronological_view_sorts_without_touching_insertion_order() {
        let reminders = service();
        reminders.create(&draft("Later", 20, None)).unwrap();
        reminders.create(&draft("Anytime today", 18, None)).unwrap();
        reminders.create(&draft("Morning", 18, Some((8, 0)))).unwrap();

        let inserted: Vec<_> = reminders
            .list_visible()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(inserted, ["Later", "Anytime today", "Morning"]);

        let sorted: Vec<_> = reminders
            .list_chronological()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(sorted, ["Morning", "Anytime today", "Later"]);
    }

    #[test]
    fn today_reminder_earlier_than_now_is_visible_and_overdue() {
        let reminders = service();
        let r = reminders.create(&draft("Standup", 18, Some((9, 30)))).unwrap();
        assert_eq!(reminders.list_visible().len(), 1);
        assert!(reminders.is_overdue(&r));
    }

    #[test]
    fn update_ignores_deleted_records() {
        let reminders = service();
        let r = reminders.create(&draft("Pay rent", 25, None)).unwrap();
        assert!(reminders.soft_delete(r.id).unwrap());
        assert!(!reminders.soft_delete(r.id).unwrap());
        assert!(reminders.update(r.id, &draft("Pay", 25, None)).unwrap().is_none());
    }
}
