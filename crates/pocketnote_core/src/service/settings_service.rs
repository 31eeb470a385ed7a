//! Settings use-case service.
//!
//! Theme reads fall back to defaults on a fresh store; the singleton row is
//! created lazily on the first write, mirroring the original application.

use crate::model::settings::{Settings, Theme};
use crate::repo::note_repo::NoteRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;

/// Settings service facade over a repository implementation.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current settings, or defaults when the store has none yet.
    pub fn current(&self) -> RepoResult<Settings> {
        Ok(self.repo.load()?.unwrap_or_default())
    }

    /// Persists a theme change on the singleton record.
    pub fn set_theme(&self, theme: Theme) -> RepoResult<Settings> {
        let mut settings = self.current()?;
        settings.theme = theme;
        settings.touch();
        self.repo.save(&settings)?;
        Ok(settings)
    }

    /// Deletes every note and task; notebooks and settings survive.
    /// Irreversible, confirmed by the presentation layer beforehand.
    pub fn clear_user_data<N: NoteRepository, T: TaskRepository>(
        &self,
        notes: &N,
        tasks: &T,
    ) -> RepoResult<()> {
        notes.clear()?;
        tasks.clear()?;
        Ok(())
    }
}
