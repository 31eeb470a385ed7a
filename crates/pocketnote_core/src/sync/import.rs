//! Import merge with last-write-wins semantics.
//!
//! # Invariants
//! - Validate fully, then apply: a document that fails parsing or record
//!   validation produces zero writes.
//! - All merges of one import run inside a single immediate transaction;
//!   any mid-apply failure rolls everything back.
//! - Per record: same id stored -> replace only if the incoming
//!   `updated_at` is strictly later (equal keeps the stored record);
//!   unknown id -> insert unconditionally.
//! - Settings: only the first incoming record is considered.

use crate::repo::note_repo::{get_note, put_note};
use crate::repo::notebook_repo::{get_notebook, put_notebook};
use crate::repo::settings_repo::{load_settings, save_settings};
use crate::repo::task_repo::{get_task, put_task};
use crate::repo::RepoError;
use crate::sync::portable::PortableDocument;
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Import failure; no partial writes have occurred in any case.
#[derive(Debug)]
pub enum ImportError {
    /// Document not parseable or missing expected top-level keys.
    Parse(String),
    /// A record failed validation before anything was applied.
    InvalidRecord {
        collection: &'static str,
        id: String,
        reason: String,
    },
    /// Persistence failure during apply; the transaction rolled back.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(reason) => write!(f, "import document is not valid: {reason}"),
            Self::InvalidRecord {
                collection,
                id,
                reason,
            } => write!(f, "import rejected: {collection} record {id}: {reason}"),
            Self::Repo(err) => write!(f, "import failed and was rolled back: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Merge counters for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub inserted: u32,
    pub replaced: u32,
    pub skipped: u32,
}

/// What one import did, per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub notebooks: CollectionCounts,
    pub notes: CollectionCounts,
    pub tasks: CollectionCounts,
    pub settings: CollectionCounts,
}

/// Parses raw JSON into a portable document.
pub fn parse_document(raw: &str) -> Result<PortableDocument, ImportError> {
    serde_json::from_str(raw).map_err(|err| ImportError::Parse(err.to_string()))
}

/// Parses, validates and merges a raw JSON document in one call.
pub fn import_json(conn: &mut Connection, raw: &str) -> Result<ImportSummary, ImportError> {
    let document = parse_document(raw)?;
    import_document(conn, &document)
}

/// Validates the whole document, then applies every merge in one
/// transaction.
pub fn import_document(
    conn: &mut Connection,
    document: &PortableDocument,
) -> Result<ImportSummary, ImportError> {
    validate_document(document)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut summary = ImportSummary::default();

    for notebook in &document.notebooks {
        match get_notebook(&tx, notebook.id)? {
            Some(existing) if notebook.updated_at > existing.updated_at => {
                put_notebook(&tx, notebook)?;
                summary.notebooks.replaced += 1;
            }
            Some(_) => summary.notebooks.skipped += 1,
            None => {
                put_notebook(&tx, notebook)?;
                summary.notebooks.inserted += 1;
            }
        }
    }

    for note in &document.notes {
        match get_note(&tx, note.id)? {
            Some(existing) if note.updated_at > existing.updated_at => {
                put_note(&tx, note)?;
                summary.notes.replaced += 1;
            }
            Some(_) => summary.notes.skipped += 1,
            None => {
                put_note(&tx, note)?;
                summary.notes.inserted += 1;
            }
        }
    }

    for task in &document.tasks {
        match get_task(&tx, task.id)? {
            Some(existing) if task.updated_at > existing.updated_at => {
                put_task(&tx, task)?;
                summary.tasks.replaced += 1;
            }
            Some(_) => summary.tasks.skipped += 1,
            None => {
                put_task(&tx, task)?;
                summary.tasks.inserted += 1;
            }
        }
    }

    // Only the first settings record counts; the rest are ignored outright.
    if let Some(incoming) = document.settings.first() {
        match load_settings(&tx)? {
            Some(existing) if incoming.updated_at > existing.updated_at => {
                if existing.id != incoming.id {
                    tx.execute("DELETE FROM settings WHERE id = ?1;", [existing.id.as_str()])?;
                }
                save_settings(&tx, incoming)?;
                summary.settings.replaced += 1;
            }
            Some(_) => summary.settings.skipped += 1,
            None => {
                save_settings(&tx, incoming)?;
                summary.settings.inserted += 1;
            }
        }
    }
    if document.settings.len() > 1 {
        warn!(
            "event=import module=sync status=partial detail=extra_settings_ignored count={}",
            document.settings.len() - 1
        );
    }

    tx.commit()?;

    info!(
        "event=import module=sync status=ok notebooks={}/{}/{} notes={}/{}/{} tasks={}/{}/{}",
        summary.notebooks.inserted,
        summary.notebooks.replaced,
        summary.notebooks.skipped,
        summary.notes.inserted,
        summary.notes.replaced,
        summary.notes.skipped,
        summary.tasks.inserted,
        summary.tasks.replaced,
        summary.tasks.skipped,
    );

    Ok(summary)
}

fn validate_document(document: &PortableDocument) -> Result<(), ImportError> {
    for notebook in &document.notebooks {
        notebook
            .validate()
            .map_err(|err| ImportError::InvalidRecord {
                collection: "notebook",
                id: notebook.id.to_string(),
                reason: err.to_string(),
            })?;
    }
    for note in &document.notes {
        note.validate().map_err(|err| ImportError::InvalidRecord {
            collection: "note",
            id: note.id.to_string(),
            reason: err.to_string(),
        })?;
    }
    for task in &document.tasks {
        task.validate().map_err(|err| ImportError::InvalidRecord {
            collection: "task",
            id: task.id.to_string(),
            reason: err.to_string(),
        })?;
    }
    Ok(())
}
