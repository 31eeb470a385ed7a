//! Notebook domain model.
//!
//! # Responsibility
//! - Define the named, colored grouping container for notes.
//! - Validate the display name and color token on construction and write.
//!
//! # Invariants
//! - `id` is stable and never reused for another notebook.
//! - Only `name`, `color` and `updated_at` ever change after creation.
//! - "Cannot delete a non-empty notebook" is a service-layer rule; storage
//!   knows nothing about it.

use crate::model::{next_updated_at, now_ms, ValidationError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static COLOR_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color token regex"));

/// A named, colored grouping container for notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: Uuid,
    /// Non-empty display string (trimmed).
    pub name: String,
    /// Display color token, `#rrggbb`.
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notebook {
    /// Creates a notebook with a generated id and current timestamps.
    ///
    /// # Errors
    /// - Empty (after trim) name.
    /// - Color token not of the form `#rrggbb`.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, ValidationError> {
        let now = now_ms();
        let notebook = Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        };
        notebook.validate()?;
        Ok(notebook)
    }

    /// Validates display fields and the timestamp invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyNotebookName);
        }
        if !COLOR_TOKEN_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidColorToken(self.color.clone()));
        }
        if self.updated_at < self.created_at {
            return Err(ValidationError::TimestampOrder {
                collection: "notebook",
                id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Refreshes `updated_at`; strictly increases even on a stalled clock.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, now_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::Notebook;
    use crate::model::ValidationError;

    #[test]
    fn new_trims_name_and_rejects_empty() {
        let notebook = Notebook::new("  Work  ", "#3b82f6").unwrap();
        assert_eq!(notebook.name, "Work");

        let err = Notebook::new("   ", "#3b82f6").unwrap_err();
        assert_eq!(err, ValidationError::EmptyNotebookName);
    }

    #[test]
    fn color_token_must_be_six_digit_hex() {
        assert!(Notebook::new("Home", "#10B981").is_ok());
        for bad in ["10b981", "#10b98", "#10b9811", "red", "#10b98g"] {
            assert!(matches!(
                Notebook::new("Home", bad),
                Err(ValidationError::InvalidColorToken(_))
            ));
        }
    }

    #[test]
    fn touch_strictly_increases_updated_at() {
        let mut notebook = Notebook::new("Work", "#3b82f6").unwrap();
        let before = notebook.updated_at;
        notebook.touch();
        assert!(notebook.updated_at > before);
    }
}
