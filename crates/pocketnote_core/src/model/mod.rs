//! Domain records for the four store collections.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Own record-level validation and the `updated_at` lifecycle.
//!
//! # Invariants
//! - Every record is identified by a stable id that is never reused.
//! - `updated_at >= created_at` at all times; every mutation refreshes
//!   `updated_at` through [`next_updated_at`], which strictly increases.
//! - JSON shape is the portable-document shape: camelCase fields, lowercase
//!   enum values, RFC 3339 timestamps, UUID string ids.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note;
pub mod notebook;
pub mod settings;
pub mod task;

/// Record-level validation failure, rejected before any store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyNotebookName,
    InvalidColorToken(String),
    EmptyTaskTitle,
    TimestampOrder {
        collection: &'static str,
        id: String,
    },
    DuplicateRecordingId {
        note_id: String,
        recording_id: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNotebookName => write!(f, "notebook name must not be empty"),
            Self::InvalidColorToken(value) => {
                write!(f, "invalid color token `{value}`; expected `#rrggbb`")
            }
            Self::EmptyTaskTitle => write!(f, "task title must not be empty"),
            Self::TimestampOrder { collection, id } => write!(
                f,
                "{collection} record {id} has updated_at earlier than created_at"
            ),
            Self::DuplicateRecordingId {
                note_id,
                recording_id,
            } => write!(
                f,
                "note {note_id} carries recording id {recording_id} more than once"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Current time clamped to storage granularity (epoch milliseconds), so an
/// in-memory record compares equal to its own re-read.
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

/// Computes the next `updated_at` for a mutated record.
///
/// Returns `now`, or `current + 1ms` when the wall clock has not advanced
/// past `current` at storage granularity (epoch milliseconds), so repeated
/// mutations strictly increase the persisted timestamp.
pub fn next_updated_at(current: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now.timestamp_millis() > current.timestamp_millis() {
        now
    } else {
        current + Duration::milliseconds(1)
    }
}

/// Normalizes a tag list: trims entries, drops empties, deduplicates.
///
/// Tags are a set; insertion order is irrelevant and the result is sorted.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        let trimmed = tag.trim();
        if !trimmed.is_empty() {
            unique.insert(trimmed.to_string());
        }
    }
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{next_updated_at, normalize_tags};
    use chrono::{Duration, Utc};

    #[test]
    fn next_updated_at_strictly_increases_on_stalled_clock() {
        let now = Utc::now();
        let bumped = next_updated_at(now, now);
        assert!(bumped > now);

        let advanced = now + Duration::seconds(5);
        assert_eq!(next_updated_at(now, advanced), advanced);
    }

    #[test]
    fn normalize_tags_trims_dedups_and_drops_empty() {
        let tags = vec![
            " work ".to_string(),
            "work".to_string(),
            String::new(),
            "  ".to_string(),
            "home".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["home", "work"]);
    }
}
