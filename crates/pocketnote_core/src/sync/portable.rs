//! Export document assembly.
//!
//! # Invariants
//! - The document carries all four collections plus an ISO-8601 export date.
//! - Raw audio bytes never enter the document (see `model::note`); recording
//!   metadata still round-trips.
//! - A successful export stamps `settings.last_export`.

use crate::model::note::Note;
use crate::model::notebook::Notebook;
use crate::model::settings::Settings;
use crate::model::task::Task;
use crate::repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
use crate::repo::notebook_repo::{NotebookRepository, SqliteNotebookRepository};
use crate::repo::settings_repo::{save_settings, SettingsRepository, SqliteSettingsRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use crate::repo::RepoResult;
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// The complete portable state of one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableDocument {
    pub notebooks: Vec<Notebook>,
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub settings: Vec<Settings>,
    /// ISO-8601 timestamp of the export.
    pub export_date: DateTime<Utc>,
}

impl PortableDocument {
    /// Renders the document the way the file on disk looks.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshots the whole store into a portable document and stamps
/// `settings.last_export`.
pub fn export_store(conn: &Connection) -> RepoResult<PortableDocument> {
    let notes = SqliteNoteRepository::try_new(conn)?.list(&NoteListQuery {
        include_archived: true,
        notebook: None,
    })?;

    let notebooks = SqliteNotebookRepository::try_new(conn)?.list()?;
    let tasks = SqliteTaskRepository::try_new(conn)?.list(&TaskListQuery::default())?;
    let mut settings = SqliteSettingsRepository::try_new(conn)?
        .load()?
        .unwrap_or_default();

    // Storage granularity, so the stamped value re-reads exactly.
    let export_date = crate::model::now_ms();
    settings.last_export = Some(export_date);
    settings.touch();
    save_settings(conn, &settings)?;

    info!(
        "event=export module=sync status=ok notebooks={} notes={} tasks={}",
        notebooks.len(),
        notes.len(),
        tasks.len()
    );

    Ok(PortableDocument {
        notebooks,
        notes,
        tasks,
        settings: vec![settings],
        export_date,
    })
}

/// Suggested download name with the export date embedded.
pub fn export_file_name(export_date: DateTime<Utc>) -> String {
    format!("pocketnote-export-{}.json", export_date.format("%Y-%m-%d"))
}
