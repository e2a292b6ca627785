//! Read-only dashboard composition.
//!
//! Every call reloads all collections; nothing is cached between reads.

use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::model::focus::FocusDay;
use crate::model::reminder::Reminder;
use crate::model::RecordId;
use crate::repo::collection_repo::{
    CredentialRepository, FocusRepository, HabitRepository, ReminderRepository, TaskRepository,
};
use crate::service::reminder_service::visible_reminders;
use chrono::{NaiveDate, Timelike};
use std::rc::Rc;

const FALLBACK_DISPLAY_NAME: &str = "user";

/// Streak figures of one active habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitStreak {
    pub id: RecordId,
    pub name: String,
    /// Distinct completed days.
    pub streak: usize,
    /// Consecutive days ending today.
    pub current_run: usize,
}

/// Everything the dashboard page renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub greeting: &'static str,
    pub date_heading: String,
    pub display_name: String,
    pub open_task_count: usize,
    pub habits_done_today: usize,
    pub habits_total: usize,
    pub upcoming_reminder_count: usize,
    pub upcoming_preview: Vec<Reminder>,
    pub habit_streaks: Vec<HabitStreak>,
    pub focus_week: Vec<FocusDay>,
}

/// Any storage that can serve every collection the dashboard reads.
pub trait DashboardSource:
    HabitRepository + TaskRepository + ReminderRepository + FocusRepository + CredentialRepository
{
}

impl<T> DashboardSource for T where
    T: HabitRepository + TaskRepository + ReminderRepository + FocusRepository + CredentialRepository
{
}

/// Read-only aggregation across all collections.
pub struct DashboardService<R: DashboardSource> {
    repo: R,
    clock: Rc<dyn Clock>,
    config: CoreConfig,
}

impl<R: DashboardSource> DashboardService<R> {
    /// Creates a service; `config` sets the preview limit and focus window.
    pub fn new(repo: R, clock: Rc<dyn Clock>, config: CoreConfig) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// Reloads every collection and builds the summary for the current moment.
    pub fn summary(&self) -> DashboardSummary {
        let now = self.clock.now();
        let today = now.date();

        let habits: Vec<_> = self
            .repo
            .load_habits()
            .into_iter()
            .filter(|h| h.is_active())
            .collect();
        let upcoming = visible_reminders(self.repo.load_reminders(), today);

        DashboardSummary {
            greeting: greeting(now.hour()),
            date_heading: date_heading(today),
            display_name: self.display_name(),
            open_task_count: self.open_task_count(),
            habits_done_today: habits.iter().filter(|h| h.is_done_on(today)).count(),
            habits_total: habits.len(),
            upcoming_reminder_count: upcoming.len(),
            upcoming_preview: upcoming
                .into_iter()
                .take(self.config.upcoming_preview_limit)
                .collect(),
            habit_streaks: habits
                .iter()
                .map(|h| HabitStreak {
                    id: h.id,
                    name: h.name.clone(),
                    streak: h.streak(),
                    current_run: h.current_run(today),
                })
                .collect(),
            focus_week: self.focus_series(),
        }
    }

    /// Tasks not yet completed, including ones waiting to finalize.
    pub fn open_task_count(&self) -> usize {
        self.repo
            .load_tasks()
            .iter()
            .filter(|t| !t.completed)
            .count()
    }

    /// Trailing focus series ending today, `focus_window_days` long.
    pub fn focus_series(&self) -> Vec<FocusDay> {
        self.repo
            .load_focus()
            .last_n_days(self.clock.today(), self.config.focus_window_days)
            .collect()
    }

    /// Greeting name from the stored credential, or `user`.
    pub fn display_name(&self) -> String {
        self.repo
            .load_credential()
            .and_then(|credential| credential.display_name())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
    }
}

/// Time-of-day greeting for a local hour `0..=23`.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Heading such as `Sunday, 18 October`.
pub fn date_heading(date: NaiveDate) -> String {
    date.format("%A, %-d %B").to_string()
}
