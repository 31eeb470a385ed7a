//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes together with their owned audio recordings.
//! - Serve the list shapes the read views need (archived filter, notebook
//!   scope) without exposing SQL upward.
//!
//! # Invariants
//! - `put` rewrites the note row and its `audio_recordings` child rows in a
//!   single immediate transaction; a note and its recordings never diverge.
//! - Recording order is preserved via the `seq` column.
//! - Deleting a note removes its recordings (`ON DELETE CASCADE`).

use crate::model::note::{AudioRecording, Note};
use crate::repo::{
    bool_to_int, datetime_from_ms, decode_tags, encode_tags, ensure_collection_ready, epoch_ms,
    int_to_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::{params, params_from_iter, types::Value, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    tags,
    created_at,
    updated_at,
    pinned,
    archived,
    notebook_id
FROM notes";

/// Query options for note lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteListQuery {
    /// Include archived notes (default views hide them).
    pub include_archived: bool,
    /// Restrict to notes referencing this notebook.
    pub notebook: Option<Uuid>,
}

/// Repository interface for note records.
pub trait NoteRepository {
    /// Inserts or replaces one note and its recordings, keyed by id.
    fn put(&self, note: &Note) -> RepoResult<()>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Note>>;
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
    fn clear(&self) -> RepoResult<()>;
    /// Notes matching the query, most recently updated first.
    fn list(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Number of notes referencing the given notebook.
    fn count_in_notebook(&self, notebook_id: Uuid) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collection_ready(conn, "notes")?;
        ensure_collection_ready(conn, "audio_recordings")?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn put(&self, note: &Note) -> RepoResult<()> {
        // Unchecked: repositories share one connection in a single-threaded
        // process, so the borrow cannot observe a competing transaction.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        put_note(&tx, note)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Note>> {
        get_note(self.conn, id)
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: "note",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM notes;", [])?;
        Ok(())
    }

    fn list(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_archived {
            sql.push_str(" AND archived = 0");
        }
        if let Some(notebook_id) = query.notebook {
            sql.push_str(" AND notebook_id = ?");
            bind_values.push(Value::Text(notebook_id.to_string()));
        }
        sql.push_str(" ORDER BY updated_at DESC, rowid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let mut note = parse_note_row(row)?;
            note.audio_recordings = load_recordings(self.conn, note.id)?;
            note.validate()?;
            notes.push(note);
        }
        Ok(notes)
    }

    fn count_in_notebook(&self, notebook_id: Uuid) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE notebook_id = ?1;",
            [notebook_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}

/// Writes one note and rewrites its recording rows. The caller owns the
/// transaction; [`NoteRepository::put`] and the importer both route here.
pub(crate) fn put_note(conn: &Connection, note: &Note) -> RepoResult<()> {
    note.validate()?;

    conn.execute(
        "INSERT INTO notes (
            id, title, content, tags, created_at, updated_at, pinned, archived, notebook_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            content = excluded.content,
            tags = excluded.tags,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at,
            pinned = excluded.pinned,
            archived = excluded.archived,
            notebook_id = excluded.notebook_id;",
        params![
            note.id.to_string(),
            note.title.as_str(),
            note.content.as_str(),
            encode_tags(&note.tags)?,
            epoch_ms(note.created_at),
            epoch_ms(note.updated_at),
            bool_to_int(note.pinned),
            bool_to_int(note.archived),
            note.notebook_id.map(|id| id.to_string()),
        ],
    )?;

    conn.execute(
        "DELETE FROM audio_recordings WHERE note_id = ?1;",
        [note.id.to_string()],
    )?;
    for (seq, recording) in note.audio_recordings.iter().enumerate() {
        conn.execute(
            "INSERT INTO audio_recordings (
                note_id, id, seq, data, mime_type, created_at, transcription, duration_secs
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                note.id.to_string(),
                recording.id.to_string(),
                seq as i64,
                recording.data.as_slice(),
                recording.mime_type.as_str(),
                epoch_ms(recording.created_at),
                recording.transcription.as_deref(),
                recording.duration.map(i64::from),
            ],
        )?;
    }

    Ok(())
}

pub(crate) fn get_note(conn: &Connection, id: Uuid) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        let mut note = parse_note_row(row)?;
        note.audio_recordings = load_recordings(conn, note.id)?;
        note.validate()?;
        return Ok(Some(note));
    }
    Ok(None)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let tags_text: String = row.get("tags")?;
    let notebook_id = match row.get::<_, Option<String>>("notebook_id")? {
        Some(value) => Some(parse_uuid(&value, "notes.notebook_id")?),
        None => None,
    };

    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: decode_tags(&tags_text, "notes.tags")?,
        created_at: datetime_from_ms(row.get("created_at")?, "notes.created_at")?,
        updated_at: datetime_from_ms(row.get("updated_at")?, "notes.updated_at")?,
        pinned: int_to_bool(row.get("pinned")?, "notes.pinned")?,
        archived: int_to_bool(row.get("archived")?, "notes.archived")?,
        notebook_id,
        audio_recordings: Vec::new(),
    })
}

fn load_recordings(conn: &Connection, note_id: Uuid) -> RepoResult<Vec<AudioRecording>> {
    let mut stmt = conn.prepare(
        "SELECT id, data, mime_type, created_at, transcription, duration_secs
         FROM audio_recordings
         WHERE note_id = ?1
         ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([note_id.to_string()])?;
    let mut recordings = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let duration = match row.get::<_, Option<i64>>("duration_secs")? {
            Some(value) => Some(u32::try_from(value).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid duration `{value}` in audio_recordings.duration_secs"
                ))
            })?),
            None => None,
        };
        recordings.push(AudioRecording {
            id: parse_uuid(&id_text, "audio_recordings.id")?,
            data: row.get("data")?,
            mime_type: row.get("mime_type")?,
            created_at: datetime_from_ms(row.get("created_at")?, "audio_recordings.created_at")?,
            transcription: row.get("transcription")?,
            duration,
        });
    }
    Ok(recordings)
}
