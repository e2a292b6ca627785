//! Dated reminder record.

use super::serde_fmt::{optional_date, optional_time};
use super::validation::{required_text, ValidationError};
use super::RecordId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: RecordId,
    pub title: String,
    /// Required for new reminders; documents from older builds may lack it.
    #[serde(default, with = "optional_date")]
    pub date: Option<NaiveDate>,
    /// `None` means "anytime" on `date`.
    #[serde(default, with = "optional_time")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub deleted: bool,
}

impl Reminder {
    /// Past its moment. Without a time the whole day counts, so an anytime
    /// reminder is overdue only from the following day.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match (self.date, self.time) {
            (Some(date), Some(time)) => date.and_time(time) < now,
            (Some(date), None) => date < now.date(),
            (None, _) => false,
        }
    }

    /// Dated today or later.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date.is_some_and(|date| date >= today)
    }

    /// Timed reminders sort before anytime ones on the same day.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date).then_with(|| match (self.time, other.time) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    }

    /// Renders `18 Oct 2026, 09:30` or `18 Oct 2026, anytime`.
    pub fn when_label(&self) -> String {
        let date = self
            .date
            .map(|d| d.format("%d %b %Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        match self.time {
            Some(time) => format!("{date}, {}", time.format("%H:%M")),
            None => format!("{date}, anytime"),
        }
    }

    pub fn soft_delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Reminder fields as entered in the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl ReminderDraft {
    /// Title first, then date presence.
    pub fn validate(&self) -> Result<(String, NaiveDate), ValidationError> {
        let title = required_text(&self.title, ValidationError::EmptyReminderTitle)?;
        let date = self.date.ok_or(ValidationError::MissingReminderDate)?;
        Ok((title, date))
    }
}
