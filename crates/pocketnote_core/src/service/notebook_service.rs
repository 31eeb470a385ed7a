//! Notebook use-case service.
//!
//! # Responsibility
//! - Provide notebook create/update/delete/list APIs.
//! - Enforce "cannot delete a non-empty notebook" as an explicit pre-check;
//!   storage itself has no referential integrity for the weak reference.

use crate::model::notebook::Notebook;
use crate::model::ValidationError;
use crate::repo::note_repo::NoteRepository;
use crate::repo::notebook_repo::NotebookRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for notebook use-cases.
#[derive(Debug)]
pub enum NotebookServiceError {
    /// Name/color rejected before any store mutation.
    Validation(ValidationError),
    NotebookNotFound(Uuid),
    /// Deletion blocked while notes still reference the notebook.
    NotebookNotEmpty { name: String, note_count: u64 },
    Repo(RepoError),
}

impl Display for NotebookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotebookNotFound(id) => write!(f, "notebook not found: {id}"),
            Self::NotebookNotEmpty { name, note_count } => write!(
                f,
                "notebook `{name}` still contains {note_count} note(s); move or delete them first"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for NotebookServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for NotebookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Notebook service facade over a repository implementation.
pub struct NotebookService<R: NotebookRepository> {
    repo: R,
}

impl<R: NotebookRepository> NotebookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a notebook from a display name and color token.
    pub fn create_notebook(
        &self,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Notebook, NotebookServiceError> {
        let notebook = Notebook::new(name, color)?;
        self.repo.put(&notebook)?;
        Ok(notebook)
    }

    /// Replaces name and color; only those fields and `updated_at` change.
    pub fn update_notebook(
        &self,
        id: Uuid,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Notebook, NotebookServiceError> {
        let mut notebook = self
            .repo
            .get(id)?
            .ok_or(NotebookServiceError::NotebookNotFound(id))?;

        notebook.name = name.into().trim().to_string();
        notebook.color = color.into();
        notebook.validate()?;
        notebook.touch();
        self.repo.put(&notebook)?;
        Ok(notebook)
    }

    /// Deletes an empty notebook; a non-empty one is rejected with the
    /// referencing note count before any mutation.
    pub fn delete_notebook<N: NoteRepository>(
        &self,
        notes: &N,
        id: Uuid,
    ) -> Result<(), NotebookServiceError> {
        let notebook = self
            .repo
            .get(id)?
            .ok_or(NotebookServiceError::NotebookNotFound(id))?;

        let note_count = notes.count_in_notebook(id)?;
        if note_count > 0 {
            return Err(NotebookServiceError::NotebookNotEmpty {
                name: notebook.name,
                note_count,
            });
        }

        self.repo.delete(id)?;
        Ok(())
    }

    pub fn get_notebook(&self, id: Uuid) -> RepoResult<Option<Notebook>> {
        self.repo.get(id)
    }

    /// All notebooks, most recently updated first.
    pub fn list_notebooks(&self) -> RepoResult<Vec<Notebook>> {
        self.repo.list()
    }
}
