//! Settings repository contract and SQLite implementation.
//!
//! The settings collection holds at most a handful of rows in practice;
//! [`SettingsRepository::load`] always resolves the singleton as the first
//! row in insertion order, matching the original application's behavior.

use crate::model::settings::{Settings, Theme};
use crate::repo::{
    datetime_from_ms, ensure_collection_ready, epoch_ms, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const SETTINGS_SELECT_SQL: &str = "SELECT id, theme, last_export, updated_at FROM settings";

/// Repository interface for the settings singleton.
pub trait SettingsRepository {
    /// First settings record in insertion order, or `None` on a fresh store.
    fn load(&self) -> RepoResult<Option<Settings>>;
    /// Inserts or replaces the settings record keyed by id.
    fn save(&self, settings: &Settings) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collection_ready(conn, "settings")?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> RepoResult<Option<Settings>> {
        load_settings(self.conn)
    }

    fn save(&self, settings: &Settings) -> RepoResult<()> {
        save_settings(self.conn, settings)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM settings;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM settings;", [])?;
        Ok(())
    }
}

pub(crate) fn load_settings(conn: &Connection) -> RepoResult<Option<Settings>> {
    let mut stmt = conn.prepare(&format!("{SETTINGS_SELECT_SQL} ORDER BY rowid ASC LIMIT 1;"))?;
    let mut rows = stmt.query([])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_settings_row(row)?));
    }
    Ok(None)
}

pub(crate) fn save_settings(conn: &Connection, settings: &Settings) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO settings (id, theme, last_export, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            theme = excluded.theme,
            last_export = excluded.last_export,
            updated_at = excluded.updated_at;",
        params![
            settings.id.as_str(),
            settings.theme.as_str(),
            settings.last_export.map(epoch_ms),
            epoch_ms(settings.updated_at),
        ],
    )?;
    Ok(())
}

fn parse_settings_row(row: &Row<'_>) -> RepoResult<Settings> {
    let theme_text: String = row.get("theme")?;
    let last_export = match row.get::<_, Option<i64>>("last_export")? {
        Some(ms) => Some(datetime_from_ms(ms, "settings.last_export")?),
        None => None,
    };

    Ok(Settings {
        id: row.get("id")?,
        theme: Theme::parse(&theme_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid theme `{theme_text}` in settings.theme"))
        })?,
        last_export,
        updated_at: datetime_from_ms(row.get("updated_at")?, "settings.updated_at")?,
    })
}
