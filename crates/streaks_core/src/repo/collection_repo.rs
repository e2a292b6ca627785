//! Repository traits and their [`RecordStore`] implementation.

use crate::model::credential::Credential;
use crate::model::focus::FocusLedger;
use crate::model::habit::Habit;
use crate::model::reminder::Reminder;
use crate::model::task::Task;
use crate::store::kv::KvStore;
use crate::store::record_store::RecordStore;
use crate::store::{Collection, StoreResult};

pub type RepoResult<T> = StoreResult<T>;

pub trait HabitRepository {
    fn load_habits(&self) -> Vec<Habit>;
    fn save_habits(&self, habits: &[Habit]) -> RepoResult<()>;
}

pub trait TaskRepository {
    fn load_tasks(&self) -> Vec<Task>;
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
}

pub trait ReminderRepository {
    fn load_reminders(&self) -> Vec<Reminder>;
    fn save_reminders(&self, reminders: &[Reminder]) -> RepoResult<()>;
}

pub trait FocusRepository {
    fn load_focus(&self) -> FocusLedger;
    fn save_focus(&self, ledger: &FocusLedger) -> RepoResult<()>;
}

pub trait CredentialRepository {
    fn load_credential(&self) -> Option<Credential>;
    fn save_credential(&self, credential: &Credential) -> RepoResult<()>;
}

impl<S: KvStore> HabitRepository for RecordStore<S> {
    fn load_habits(&self) -> Vec<Habit> {
        self.load(Collection::Habits)
    }

    fn save_habits(&self, habits: &[Habit]) -> RepoResult<()> {
        self.save(Collection::Habits, habits)
    }
}

impl<S: KvStore> TaskRepository for RecordStore<S> {
    fn load_tasks(&self) -> Vec<Task> {
        self.load(Collection::Tasks)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        self.save(Collection::Tasks, tasks)
    }
}

impl<S: KvStore> ReminderRepository for RecordStore<S> {
    fn load_reminders(&self) -> Vec<Reminder> {
        self.load(Collection::Reminders)
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> RepoResult<()> {
        self.save(Collection::Reminders, reminders)
    }
}

impl<S: KvStore> FocusRepository for RecordStore<S> {
    fn load_focus(&self) -> FocusLedger {
        self.load_object(Collection::FocusHours).unwrap_or_default()
    }

    fn save_focus(&self, ledger: &FocusLedger) -> RepoResult<()> {
        self.save_object(Collection::FocusHours, ledger)
    }
}

impl<S: KvStore> CredentialRepository for RecordStore<S> {
    fn load_credential(&self) -> Option<Credential> {
        self.load_object(Collection::User)
    }

    fn save_credential(&self, credential: &Credential) -> RepoResult<()> {
        self.save_object(Collection::User, credential)
    }
}
