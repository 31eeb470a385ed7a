//! Task repository contract and SQLite implementation.

use crate::model::task::{Priority, Status, Task};
use crate::repo::{
    datetime_from_ms, decode_tags, encode_tags, ensure_collection_ready, epoch_ms, parse_uuid,
    RepoError, RepoResult,
};
use rusqlite::{params, params_from_iter, types::Value, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    due_date,
    priority,
    status,
    tags,
    created_at,
    updated_at
FROM tasks";

/// Query options for task lists. `None` means "all" for either filter;
/// both filters combine as a logical AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListQuery {
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

/// Repository interface for task records.
pub trait TaskRepository {
    /// Inserts or replaces one task keyed by id.
    fn put(&self, task: &Task) -> RepoResult<()>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Task>>;
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
    fn clear(&self) -> RepoResult<()>;
    /// Tasks matching the query, most recently updated first.
    fn list(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collection_ready(conn, "tasks")?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn put(&self, task: &Task) -> RepoResult<()> {
        put_task(self.conn, task)
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Task>> {
        get_task(self.conn, id)
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: "task",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM tasks;", [])?;
        Ok(())
    }

    fn list(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        sql.push_str(" ORDER BY updated_at DESC, rowid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

pub(crate) fn put_task(conn: &Connection, task: &Task) -> RepoResult<()> {
    task.validate()?;

    conn.execute(
        "INSERT INTO tasks (
            id, title, description, due_date, priority, status, tags, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            due_date = excluded.due_date,
            priority = excluded.priority,
            status = excluded.status,
            tags = excluded.tags,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at;",
        params![
            task.id.to_string(),
            task.title.as_str(),
            task.description.as_deref(),
            task.due_date.map(epoch_ms),
            task.priority.as_str(),
            task.status.as_str(),
            encode_tags(&task.tags)?,
            epoch_ms(task.created_at),
            epoch_ms(task.updated_at),
        ],
    )?;
    Ok(())
}

pub(crate) fn get_task(conn: &Connection, id: Uuid) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let priority_text: String = row.get("priority")?;
    let status_text: String = row.get("status")?;
    let tags_text: String = row.get("tags")?;

    let due_date = match row.get::<_, Option<i64>>("due_date")? {
        Some(ms) => Some(datetime_from_ms(ms, "tasks.due_date")?),
        None => None,
    };

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date,
        priority: Priority::parse(&priority_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
        })?,
        status: Status::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
        })?,
        tags: decode_tags(&tags_text, "tasks.tags")?,
        created_at: datetime_from_ms(row.get("created_at")?, "tasks.created_at")?,
        updated_at: datetime_from_ms(row.get("updated_at")?, "tasks.updated_at")?,
    };
    task.validate()?;
    Ok(task)
}
