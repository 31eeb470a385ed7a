//! Task use-case service.
//!
//! # Responsibility
//! - Provide task create/update/toggle/delete APIs with title validation.
//! - Serve the filtered task view (priority AND status, default all/all).

use crate::model::normalize_tags;
use crate::model::task::{Priority, Status, Task};
use crate::model::ValidationError;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Editable task fields as the editor submits them.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    /// Explicitly nullable: `None` clears the deadline.
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    pub tags: Vec<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            status: Status::Open,
            tags: Vec::new(),
        }
    }
}

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title rejected before any store mutation.
    Validation(ValidationError),
    TaskNotFound(Uuid),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for TaskServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task from an editor draft.
    pub fn create_task(&self, draft: TaskDraft) -> Result<Task, TaskServiceError> {
        let mut task = Task::new(draft.title, draft.priority, draft.due_date)?;
        task.description = draft.description;
        task.status = draft.status;
        task.tags = normalize_tags(&draft.tags);
        task.validate()?;
        self.repo.put(&task)?;
        Ok(task)
    }

    /// Replaces editable fields of an existing task.
    pub fn update_task(&self, id: Uuid, draft: TaskDraft) -> Result<Task, TaskServiceError> {
        let mut task = self.load(id)?;
        task.title = draft.title.trim().to_string();
        task.description = draft.description;
        task.due_date = draft.due_date;
        task.priority = draft.priority;
        task.status = draft.status;
        task.tags = normalize_tags(&draft.tags);
        task.validate()?;
        task.touch();
        self.repo.put(&task)?;
        Ok(task)
    }

    /// Flips open <-> done.
    pub fn toggle_status(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        let mut task = self.load(id)?;
        task.status = task.status.toggled();
        task.touch();
        self.repo.put(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: Uuid) -> Result<(), TaskServiceError> {
        match self.repo.delete(id) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound { .. }) => Err(TaskServiceError::TaskNotFound(id)),
            Err(other) => Err(other.into()),
        }
    }

    pub fn get_task(&self, id: Uuid) -> RepoResult<Option<Task>> {
        self.repo.get(id)
    }

    /// Tasks filtered by priority and status (logical AND; `None` = all),
    /// most recently updated first.
    pub fn list_tasks(
        &self,
        priority: Option<Priority>,
        status: Option<Status>,
    ) -> RepoResult<Vec<Task>> {
        self.repo.list(&TaskListQuery { priority, status })
    }

    fn load(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        self.repo.get(id)?.ok_or(TaskServiceError::TaskNotFound(id))
    }
}
