//! Core domain logic for PocketNote.
//!
//! The local data layer of a notes/tasks/notebooks app with voice capture:
//! embedded versioned store, read views, import/export merge, the recorder
//! state machine and the transcription seam. Presentation (routing, screens,
//! toasts, theming) lives outside and only consumes these APIs.

pub mod db;
pub mod logging;
pub mod model;
pub mod recorder;
pub mod repo;
pub mod search;
pub mod seed;
pub mod service;
pub mod sync;
pub mod transcribe;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{AudioRecording, Note};
pub use model::notebook::Notebook;
pub use model::settings::{Settings, Theme};
pub use model::task::{Priority, Status, Task};
pub use model::ValidationError;
pub use recorder::{
    AudioClip, AudioEncoding, CaptureError, ManualClock, MonotonicClock, PlaybackError, Recorder,
    RecorderError, RecorderPhase, SimulatedMicrophone, SimulatedPlayback,
};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use repo::notebook_repo::{NotebookRepository, SqliteNotebookRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use search::scan::{search_records, SearchResults};
pub use seed::{seed_demo_data, SeedOutcome};
pub use service::note_service::{NoteService, NoteServiceError, NotesOverview};
pub use service::notebook_service::{NotebookService, NotebookServiceError};
pub use service::settings_service::SettingsService;
pub use service::task_service::{TaskDraft, TaskService, TaskServiceError};
pub use sync::import::{import_json, ImportError, ImportSummary};
pub use sync::portable::{export_file_name, export_store, PortableDocument};
pub use transcribe::{SimulatedTranscriber, TranscribeError, Transcriber, Transcription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
