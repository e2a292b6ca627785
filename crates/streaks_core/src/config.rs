//! Tunables shared by the services.

use chrono::TimeDelta;

/// Delay between the optimistic "removing" mark and the final completion.
pub const DEFAULT_FINALIZE_DELAY_MS: i64 = 600;
pub const DEFAULT_UPCOMING_PREVIEW_LIMIT: usize = 5;
pub const DEFAULT_FOCUS_WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// How long a completed task stays visible before it is finalized.
    pub finalize_delay: TimeDelta,
    /// Number of reminders shown in the dashboard preview.
    pub upcoming_preview_limit: usize,
    /// Length of the dashboard focus series, ending today.
    pub focus_window_days: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            finalize_delay: TimeDelta::milliseconds(DEFAULT_FINALIZE_DELAY_MS),
            upcoming_preview_limit: DEFAULT_UPCOMING_PREVIEW_LIMIT,
            focus_window_days: DEFAULT_FOCUS_WINDOW_DAYS,
        }
    }
}
