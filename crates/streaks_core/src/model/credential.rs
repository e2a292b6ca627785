//! Credential record owned by the external sign-up/login forms.
//!
//! The core only reads it to derive a greeting name; nothing here is an
//! identity or security contract.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\P{L}+").expect("valid non-letter regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn display_name(&self) -> Option<String> {
        display_name(&self.email)
    }
}

/// Greeting name from an email: local part, letters only, first letter
/// upper-cased. `None` when no letters remain.
pub fn display_name(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default();
    let letters = NON_LETTER_RE.replace_all(local, "");
    let mut chars = letters.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
