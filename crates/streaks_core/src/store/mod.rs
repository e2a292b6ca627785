//! Collection persistence over a flat key/value medium.
//!
//! # Responsibility
//! - Map each named collection to one key holding a JSON document.
//! - Hide medium failures on the read path (fallback to empty).
//!
//! # Invariants
//! - A save replaces the whole collection in one key write.
//! - Reads never fail; writes report `StoreError`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod record_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failure of the persisted medium.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "storage write failed: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Named keys of the persisted medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Habits,
    Tasks,
    Reminders,
    FocusHours,
    User,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Habits,
        Collection::Tasks,
        Collection::Reminders,
        Collection::FocusHours,
        Collection::User,
    ];

    /// Storage key; matches the names used by earlier builds of the app.
    pub fn key(self) -> &'static str {
        match self {
            Self::Habits => "habits",
            Self::Tasks => "tasks",
            Self::Reminders => "reminders",
            Self::FocusHours => "focusHours",
            Self::User => "user",
        }
    }
}
