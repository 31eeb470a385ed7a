//! Note domain model and its owned audio recordings.
//!
//! # Responsibility
//! - Define the note record with tags, flags and the weak notebook link.
//! - Define the audio recording attachment owned exclusively by its note.
//!
//! # Invariants
//! - `updated_at >= created_at`; every mutation goes through [`Note::touch`].
//! - `notebook_id` is lookup-only: a dangling reference means "no notebook".
//! - Recording ids are unique within their parent note; recordings are
//!   append-only from the editor's perspective and the raw buffer is never
//!   mutated. Attaching a transcription is the single post-hoc exception.
//! - Raw audio bytes never enter the portable JSON document (`data` is
//!   `#[serde(skip)]`); recordings round-trip as metadata only.

use crate::model::{next_updated_at, now_ms, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A captured voice attachment, owned by exactly one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRecording {
    /// Unique within the parent note.
    pub id: Uuid,
    /// Raw audio byte buffer. Excluded from the portable document.
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Container/codec label of the captured buffer, e.g. `audio/webm`.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    /// Set once by a successful transcription; absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    /// Elapsed capture time in whole seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

fn default_mime_type() -> String {
    "audio/webm".to_string()
}

impl AudioRecording {
    /// Wraps a finalized capture buffer into a new attachment.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            mime_type: mime_type.into(),
            created_at: now_ms(),
            transcription: None,
            duration: Some(duration_secs),
        }
    }
}

/// A free-form note with tags, display flags and voice attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Flagged for priority display above other notes.
    pub pinned: bool,
    /// Hidden from default views but not deleted.
    pub archived: bool,
    /// Weak reference to a notebook; dangling ids mean "no notebook".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_id: Option<Uuid>,
    /// Ordered attachments, owned exclusively by this note.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_recordings: Vec<AudioRecording>,
}

impl Note {
    /// Creates a note with a generated id and current timestamps.
    ///
    /// Tags are normalized through [`crate::model::normalize_tags`].
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        notebook_id: Option<Uuid>,
    ) -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            tags: crate::model::normalize_tags(&tags),
            created_at: now,
            updated_at: now,
            pinned: false,
            archived: false,
            notebook_id,
            audio_recordings: Vec::new(),
        }
    }

    /// Validates the timestamp invariant and recording-id uniqueness.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.updated_at < self.created_at {
            return Err(ValidationError::TimestampOrder {
                collection: "note",
                id: self.id.to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for recording in &self.audio_recordings {
            if !seen.insert(recording.id) {
                return Err(ValidationError::DuplicateRecordingId {
                    note_id: self.id.to_string(),
                    recording_id: recording.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Refreshes `updated_at`; strictly increases even on a stalled clock.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, now_ms());
    }

    /// Whether both title and content are blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioRecording, Note};
    use crate::model::ValidationError;

    #[test]
    fn new_note_normalizes_tags() {
        let note = Note::new(
            "Groceries",
            "milk",
            vec![" shopping ".to_string(), "shopping".to_string()],
            None,
        );
        assert_eq!(note.tags, vec!["shopping"]);
        assert!(!note.pinned);
        assert!(!note.archived);
    }

    #[test]
    fn duplicate_recording_ids_are_rejected() {
        let mut note = Note::new("Voice memo", "", vec![], None);
        let recording = AudioRecording::new(vec![1, 2, 3], "audio/webm", 3);
        note.audio_recordings.push(recording.clone());
        note.audio_recordings.push(recording);

        assert!(matches!(
            note.validate(),
            Err(ValidationError::DuplicateRecordingId { .. })
        ));
    }

    #[test]
    fn is_blank_requires_both_fields_empty() {
        let mut note = Note::new("  ", "  ", vec![], None);
        assert!(note.is_blank());
        note.content = "text".to_string();
        assert!(!note.is_blank());
    }

    #[test]
    fn recording_buffer_is_not_serialized() {
        let mut note = Note::new("Voice memo", "", vec![], None);
        note.audio_recordings
            .push(AudioRecording::new(vec![9; 64], "audio/webm", 2));

        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("audioRecordings"));
        assert!(!json.contains("\"data\""));

        let parsed: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.audio_recordings.len(), 1);
        assert!(parsed.audio_recordings[0].data.is_empty());
        assert_eq!(parsed.audio_recordings[0].duration, Some(2));
    }
}
