//! Habit record and its per-day completion history.
//!
//! # Invariants
//! - `completed_dates` holds each date at most once.
//! - The streak is the number of distinct completed dates, not a run length.
//! - `deleted` is a permanent tombstone.

use super::serde_fmt::unique_dates;
use super::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: RecordId,
    pub name: String,
    /// Days on which the habit was done, in the order they were marked.
    #[serde(default, deserialize_with = "unique_dates::deserialize")]
    pub completed_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub deleted: bool,
}

impl Habit {
    /// Creates an active habit with no history. `name` is stored as given.
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed_dates: Vec::new(),
            deleted: false,
        }
    }

    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Flips completion for `date`. Returns whether the habit is now done.
    pub fn toggle_on(&mut self, date: NaiveDate) -> bool {
        if self.is_done_on(date) {
            self.completed_dates.retain(|d| *d != date);
            false
        } else {
            self.completed_dates.push(date);
            true
        }
    }

    /// Removes `date` from the history. Returns whether anything changed.
    pub fn clear_on(&mut self, date: NaiveDate) -> bool {
        let before = self.completed_dates.len();
        self.completed_dates.retain(|d| *d != date);
        before != self.completed_dates.len()
    }

    /// Count of distinct completed days.
    pub fn streak(&self) -> usize {
        let mut dates = self.completed_dates.clone();
        dates.sort_unstable();
        dates.dedup();
        dates.len()
    }

    /// Consecutive completed days ending today.
    ///
    /// An open today does not break the run: counting then starts from
    /// yesterday.
    pub fn current_run(&self, today: NaiveDate) -> usize {
        let mut dates: Vec<NaiveDate> = self
            .completed_dates
            .iter()
            .copied()
            .filter(|d| *d <= today)
            .collect();
        dates.sort_unstable();
        dates.dedup();

        let mut expected = if dates.last() == Some(&today) {
            Some(today)
        } else {
            today.pred_opt()
        };
        let mut run = 0;
        for date in dates.iter().rev() {
            if Some(*date) != expected {
                break;
            }
            run += 1;
            expected = date.pred_opt();
        }
        run
    }

    pub fn soft_delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}
