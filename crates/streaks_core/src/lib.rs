//! Core state and derived views for the Streaks productivity tracker.
//! This crate is the single source of truth for habit, task, reminder and
//! focus-time invariants; presentation layers only render what it returns.

pub mod clock;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, ClockIdGenerator, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock};
pub use config::CoreConfig;
pub use events::{FocusBus, FocusUpdated, SubscriptionId};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::credential::{display_name, Credential};
pub use model::focus::{FocusDay, FocusLedger};
pub use model::habit::Habit;
pub use model::reminder::{Reminder, ReminderDraft};
pub use model::task::{Quadrant, Task, TaskDraft, TaskPhase};
pub use model::validation::ValidationError;
pub use model::RecordId;
pub use repo::collection_repo::{
    CredentialRepository, FocusRepository, HabitRepository, ReminderRepository, RepoResult,
    TaskRepository,
};
pub use service::dashboard_service::{DashboardService, DashboardSummary, HabitStreak};
pub use service::habit_service::{HabitService, HabitView};
pub use service::reminder_service::ReminderService;
pub use service::task_service::{QuadrantGroup, TaskFilter, TaskService, TaskView};
pub use service::{ServiceError, ServiceResult};
pub use store::kv::{KvStore, MemoryKvStore, SqliteKvStore};
pub use store::record_store::RecordStore;
pub use store::{Collection, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
