//! Domain records for habits, tasks, reminders and focus time.
//!
//! # Responsibility
//! - Define the persisted record shapes and their pure lifecycle helpers.
//! - Keep JSON field names compatible with documents written by earlier
//!   builds (camelCase keys, empty strings for absent dates).
//!
//! # Invariants
//! - `id` is unique within its own collection only.
//! - Habits and reminders are soft-deleted; the flag is permanent and there
//!   is no reclamation of deleted records.

pub mod credential;
pub mod focus;
pub mod habit;
pub mod reminder;
mod serde_fmt;
pub mod task;
pub mod validation;

/// Creation-ordered identifier, epoch milliseconds in production.
pub type RecordId = i64;
