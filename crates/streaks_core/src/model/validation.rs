//! User-input validation failures.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// A field rule rejected user input. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyHabitName,
    EmptyTaskTitle,
    InvalidDuration,
    MissingDueDate,
    DueDateInPast,
    EmptyReminderTitle,
    MissingReminderDate,
    InvalidQuadrant(u8),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHabitName => write!(f, "Habit name is required"),
            Self::EmptyTaskTitle => write!(f, "Task name is required"),
            Self::InvalidDuration => {
                write!(f, "Duration must be a whole number of minutes greater than 0")
            }
            Self::MissingDueDate => write!(f, "Due date is required"),
            Self::DueDateInPast => write!(f, "Due date cannot be in the past"),
            Self::EmptyReminderTitle => write!(f, "Reminder title is required"),
            Self::MissingReminderDate => write!(f, "Reminder date is required"),
            Self::InvalidQuadrant(value) => {
                write!(f, "Quadrant must be between 1 and 4, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value`, rejecting it with `error` when nothing is left.
pub(crate) fn required_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{required_text, ValidationError};

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(
            required_text("  Read  ", ValidationError::EmptyHabitName).unwrap(),
            "Read"
        );
        assert_eq!(
            required_text(" \t ", ValidationError::EmptyHabitName).unwrap_err(),
            ValidationError::EmptyHabitName
        );
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ValidationError::DueDateInPast.to_string(),
            "Due date cannot be in the past"
        );
        assert!(ValidationError::InvalidQuadrant(7).to_string().contains('7'));
    }
}
