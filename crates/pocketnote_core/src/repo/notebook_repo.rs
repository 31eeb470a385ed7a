//! Notebook repository contract and SQLite implementation.

use crate::model::notebook::Notebook;
use crate::repo::{
    datetime_from_ms, ensure_collection_ready, epoch_ms, parse_uuid, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTEBOOK_SELECT_SQL: &str = "SELECT id, name, color, created_at, updated_at FROM notebooks";

/// Repository interface for notebook records.
pub trait NotebookRepository {
    /// Inserts or replaces one notebook keyed by id.
    fn put(&self, notebook: &Notebook) -> RepoResult<()>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Notebook>>;
    /// Deletes one notebook; the "must be empty" rule lives in the service.
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
    fn clear(&self) -> RepoResult<()>;
    /// All notebooks, most recently updated first.
    fn list(&self) -> RepoResult<Vec<Notebook>>;
}

/// SQLite-backed notebook repository.
pub struct SqliteNotebookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotebookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collection_ready(conn, "notebooks")?;
        Ok(Self { conn })
    }
}

impl NotebookRepository for SqliteNotebookRepository<'_> {
    fn put(&self, notebook: &Notebook) -> RepoResult<()> {
        put_notebook(self.conn, notebook)
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Notebook>> {
        get_notebook(self.conn, id)
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notebooks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: "notebook",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notebooks;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM notebooks;", [])?;
        Ok(())
    }

    fn list(&self) -> RepoResult<Vec<Notebook>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTEBOOK_SELECT_SQL} ORDER BY updated_at DESC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notebooks = Vec::new();
        while let Some(row) = rows.next()? {
            notebooks.push(parse_notebook_row(row)?);
        }
        Ok(notebooks)
    }
}

pub(crate) fn put_notebook(conn: &Connection, notebook: &Notebook) -> RepoResult<()> {
    notebook.validate()?;

    conn.execute(
        "INSERT INTO notebooks (id, name, color, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            color = excluded.color,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at;",
        params![
            notebook.id.to_string(),
            notebook.name.as_str(),
            notebook.color.as_str(),
            epoch_ms(notebook.created_at),
            epoch_ms(notebook.updated_at),
        ],
    )?;
    Ok(())
}

pub(crate) fn get_notebook(conn: &Connection, id: Uuid) -> RepoResult<Option<Notebook>> {
    let mut stmt = conn.prepare(&format!("{NOTEBOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_notebook_row(row)?));
    }
    Ok(None)
}

fn parse_notebook_row(row: &Row<'_>) -> RepoResult<Notebook> {
    let id_text: String = row.get("id")?;
    let notebook = Notebook {
        id: parse_uuid(&id_text, "notebooks.id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        created_at: datetime_from_ms(row.get("created_at")?, "notebooks.created_at")?,
        updated_at: datetime_from_ms(row.get("updated_at")?, "notebooks.updated_at")?,
    };
    notebook.validate()?;
    Ok(notebook)
}
