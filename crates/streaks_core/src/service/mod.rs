//! Use-case services behind every feature surface.
//!
//! # Responsibility
//! - Run one user action to completion: load, compute the next snapshot,
//!   persist it, then notify.
//! - Own the derived views (visible lists, filters, dashboard summary).
//!
//! # Invariants
//! - Each collection has exactly one writing service.
//! - Input is validated before anything is written.

use crate::model::validation::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dashboard_service;
pub mod habit_service;
pub mod pending;
pub mod reminder_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; the message is meant for the user.
    Validation(ValidationError),
    /// The snapshot could not be written.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl ServiceError {
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(err) => Some(*err),
            Self::Store(_) => None,
        }
    }
}

/// Case-insensitive substring match used by every search box. The needle
/// is taken verbatim, whitespace included.
pub(crate) fn matches_search(text: &str, search: &str) -> bool {
    let needle = search.to_lowercase();
    needle.is_empty() || text.to_lowercase().contains(&needle)
}
