//! Prioritized task record and its completion lifecycle.
//!
//! # Invariants
//! - `removing == true` only ever precedes `completed == true`; it is never
//!   set on the way back to active.
//! - Tasks are hard-deleted; there is no tombstone.

use super::serde_fmt::{lenient_minutes, optional_date};
use super::validation::{required_text, ValidationError};
use super::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Eisenhower priority bucket, persisted as `1..=4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quadrant {
    #[default]
    UrgentImportant,
    Important,
    Urgent,
    Neither,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UrgentImportant,
        Quadrant::Important,
        Quadrant::Urgent,
        Quadrant::Neither,
    ];

    pub fn number(self) -> u8 {
        match self {
            Self::UrgentImportant => 1,
            Self::Important => 2,
            Self::Urgent => 3,
            Self::Neither => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Urgent & Important",
            Self::Important => "Not Urgent & Important",
            Self::Urgent => "Urgent & Not Important",
            Self::Neither => "Not Urgent & Not Important",
        }
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::UrgentImportant),
            2 => Ok(Self::Important),
            3 => Ok(Self::Urgent),
            4 => Ok(Self::Neither),
            other => Err(ValidationError::InvalidQuadrant(other)),
        }
    }
}

impl From<Quadrant> for u8 {
    fn from(value: Quadrant) -> Self {
        value.number()
    }
}

/// Lifecycle state derived from the persisted `completed`/`removing` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Active,
    /// Marked done; still listed until the finalize delay elapses.
    PendingComplete,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    /// Minutes credited to the focus ledger on completion.
    #[serde(default, deserialize_with = "lenient_minutes::deserialize")]
    pub duration: u32,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub quadrant: Quadrant,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub removing: bool,
}

impl Task {
    pub fn phase(&self) -> TaskPhase {
        match (self.completed, self.removing) {
            (_, true) => TaskPhase::PendingComplete,
            (true, false) => TaskPhase::Completed,
            (false, false) => TaskPhase::Active,
        }
    }

    /// Due strictly before `today` and not yet completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.due_date == Some(today)
    }

    /// Hidden from the matrix once completion is final.
    pub fn is_listed(&self) -> bool {
        !(self.completed && !self.removing)
    }

    /// Short due label such as `18 Oct`, or `-` without a date.
    pub fn due_label(&self) -> String {
        self.due_date
            .map(|due| due.format("%d %b").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Editable task fields as entered in the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub duration_minutes: i64,
    pub due_date: Option<NaiveDate>,
    pub quadrant: Quadrant,
}

/// Draft fields after every rule passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    pub title: String,
    pub duration: u32,
    pub due_date: NaiveDate,
    pub quadrant: Quadrant,
}

impl TaskDraft {
    /// Checks title, duration, date presence, then date not before `today`.
    /// The first failing rule is reported.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidTask, ValidationError> {
        let title = required_text(&self.title, ValidationError::EmptyTaskTitle)?;
        let duration = u32::try_from(self.duration_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ValidationError::InvalidDuration)?;
        let due_date = self.due_date.ok_or(ValidationError::MissingDueDate)?;
        if due_date < today {
            return Err(ValidationError::DueDateInPast);
        }
        Ok(ValidTask {
            title,
            duration,
            due_date,
            quadrant: self.quadrant,
        })
    }
}

impl ValidTask {
    pub fn into_task(self, id: RecordId) -> Task {
        Task {
            id,
            title: self.title,
            duration: self.duration,
            due_date: Some(self.due_date),
            quadrant: self.quadrant,
            completed: false,
            removing: false,
        }
    }

    /// Overwrites the editable fields, keeping completion state.
    pub fn apply_to(self, task: &mut Task) {
        task.title = self.title;
        task.duration = self.duration;
        task.due_date = Some(self.due_date);
        task.quadrant = self.quadrant;
    }
}
