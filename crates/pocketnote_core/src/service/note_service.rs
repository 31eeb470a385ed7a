//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/toggle/delete APIs.
//! - Derive the pinned/other overview partitions and the notebook-scoped
//!   view (with an explicit not-found signal for a bad notebook id).
//! - Attach voice recordings and merge transcription results.
//!
//! # Invariants
//! - A note with blank title AND blank content is never persisted.
//! - Every successful mutation refreshes `updated_at` (strictly increasing).
//! - Transcription failure leaves the recording attached and untouched.

use crate::model::normalize_tags;
use crate::model::note::{AudioRecording, Note};
use crate::repo::note_repo::{NoteListQuery, NoteRepository};
use crate::repo::notebook_repo::NotebookRepository;
use crate::repo::{RepoError, RepoResult};
use crate::transcribe::{TranscribeError, Transcriber};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Both title and content blank; nothing worth saving.
    EmptyNote,
    NoteNotFound(Uuid),
    RecordingNotFound { note_id: Uuid, recording_id: Uuid },
    /// Scoped view requested for a notebook id that does not resolve.
    NotebookNotFound(Uuid),
    /// Transcription collaborator failed; the recording is unaffected.
    Transcription(TranscribeError),
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note needs a title or content before saving"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::RecordingNotFound {
                note_id,
                recording_id,
            } => write!(f, "recording {recording_id} not found on note {note_id}"),
            Self::NotebookNotFound(id) => write!(f, "notebook not found: {id}"),
            Self::Transcription(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transcription(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Non-archived notes partitioned for the overview screen.
///
/// `pinned` and `other` are disjoint; their union is exactly the set of
/// non-archived notes in scope, each half ordered `updated_at` descending.
#[derive(Debug, Clone, Default)]
pub struct NotesOverview {
    pub pinned: Vec<Note>,
    pub other: Vec<Note>,
}

impl NotesOverview {
    /// Splits an ordered, non-archived note list on the pinned flag.
    /// Filtering preserves order, so both halves stay sorted.
    pub fn partition(notes: Vec<Note>) -> Self {
        let mut overview = Self::default();
        for note in notes {
            if note.pinned {
                overview.pinned.push(note);
            } else {
                overview.other.push(note);
            }
        }
        overview
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note; rejects a fully blank draft before any mutation.
    pub fn create_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        notebook_id: Option<Uuid>,
    ) -> Result<Note, NoteServiceError> {
        let note = Note::new(title, content, tags, notebook_id);
        if note.is_blank() {
            return Err(NoteServiceError::EmptyNote);
        }
        self.repo.put(&note)?;
        Ok(note)
    }

    /// Replaces editable fields; existing recordings are untouched.
    pub fn update_content(
        &self,
        id: Uuid,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.load(id)?;
        note.title = title.into();
        note.content = content.into();
        note.tags = normalize_tags(&tags);
        if note.is_blank() {
            return Err(NoteServiceError::EmptyNote);
        }
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    /// Moves the note into a notebook, or out of any (`None`). The target
    /// id is not resolved: the reference is weak by design.
    pub fn set_notebook(
        &self,
        id: Uuid,
        notebook_id: Option<Uuid>,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.load(id)?;
        note.notebook_id = notebook_id;
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    pub fn toggle_pinned(&self, id: Uuid) -> Result<Note, NoteServiceError> {
        let mut note = self.load(id)?;
        note.pinned = !note.pinned;
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    pub fn toggle_archived(&self, id: Uuid) -> Result<Note, NoteServiceError> {
        let mut note = self.load(id)?;
        note.archived = !note.archived;
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    pub fn delete_note(&self, id: Uuid) -> Result<(), NoteServiceError> {
        match self.repo.delete(id) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound { .. }) => Err(NoteServiceError::NoteNotFound(id)),
            Err(other) => Err(other.into()),
        }
    }

    pub fn get_note(&self, id: Uuid) -> RepoResult<Option<Note>> {
        self.repo.get(id)
    }

    /// Appends a finished recording to the note.
    pub fn attach_recording(
        &self,
        note_id: Uuid,
        recording: AudioRecording,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.load(note_id)?;
        note.audio_recordings.push(recording);
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    /// Runs the transcription collaborator against one attached recording.
    ///
    /// On success the text lands on the recording. On any failure (timeout,
    /// cancellation, service error) the recording stays attached with no
    /// transcription set and the error is returned to the caller.
    pub fn transcribe_recording(
        &self,
        transcriber: &dyn Transcriber,
        note_id: Uuid,
        recording_id: Uuid,
        timeout: Duration,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.load(note_id)?;
        let recording = note
            .audio_recordings
            .iter_mut()
            .find(|recording| recording.id == recording_id)
            .ok_or(NoteServiceError::RecordingNotFound {
                note_id,
                recording_id,
            })?;

        let result = transcriber
            .transcribe(&recording.data, timeout)
            .map_err(NoteServiceError::Transcription)?;

        recording.transcription = Some(result.text);
        note.touch();
        self.repo.put(&note)?;
        Ok(note)
    }

    /// All non-archived notes, partitioned into pinned and other.
    pub fn overview(&self) -> Result<NotesOverview, NoteServiceError> {
        let notes = self.repo.list(&NoteListQuery::default())?;
        Ok(NotesOverview::partition(notes))
    }

    /// The overview scoped to one notebook. A notebook id that does not
    /// resolve is a reportable not-found, never a silent empty view.
    pub fn notebook_overview<NB: NotebookRepository>(
        &self,
        notebooks: &NB,
        notebook_id: Uuid,
    ) -> Result<NotesOverview, NoteServiceError> {
        if notebooks.get(notebook_id)?.is_none() {
            return Err(NoteServiceError::NotebookNotFound(notebook_id));
        }

        let notes = self.repo.list(&NoteListQuery {
            include_archived: false,
            notebook: Some(notebook_id),
        })?;
        Ok(NotesOverview::partition(notes))
    }

    /// Every note including archived ones, for search and export.
    pub fn all_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.list(&NoteListQuery {
            include_archived: true,
            notebook: None,
        })
    }

    fn load(&self, id: Uuid) -> Result<Note, NoteServiceError> {
        self.repo
            .get(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }
}
