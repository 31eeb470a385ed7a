//! Task domain model.
//!
//! # Responsibility
//! - Define the actionable task record with priority/status metadata.
//! - Own the overdue determination used by list views.

use crate::model::{next_updated_at, now_ms, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Flips open <-> done.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Open => Self::Done,
            Self::Done => Self::Open,
        }
    }
}

/// An actionable task with optional due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Non-empty after trim.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicitly nullable: `None` is a task without a deadline.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task with a generated id and current timestamps.
    ///
    /// # Errors
    /// - Empty (after trim) title.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let now = now_ms();
        let task = Self {
            id: Uuid::new_v4(),
            title: title.into().trim().to_string(),
            description: None,
            due_date,
            priority,
            status: Status::Open,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        task.validate()?;
        Ok(task)
    }

    /// Validates the title and timestamp invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTaskTitle);
        }
        if self.updated_at < self.created_at {
            return Err(ValidationError::TimestampOrder {
                collection: "task",
                id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Refreshes `updated_at`; strictly increases even on a stalled clock.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, now_ms());
    }

    /// A task is overdue when a due date is set, lies strictly in the past,
    /// and the task is not done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != Status::Done,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Status, Task};
    use crate::model::ValidationError;
    use chrono::{Duration, Utc};

    #[test]
    fn empty_title_is_rejected() {
        let err = Task::new("   ", Priority::Low, None).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTaskTitle);
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let now = Utc::now();
        let mut task = Task::new("Pay rent", Priority::High, Some(now - Duration::days(1))).unwrap();
        assert!(task.is_overdue(now));

        task.status = Status::Done;
        assert!(!task.is_overdue(now));

        task.status = Status::Open;
        task.due_date = None;
        assert!(!task.is_overdue(now));

        task.due_date = Some(now + Duration::days(1));
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn status_toggle_round_trips() {
        assert_eq!(Status::Open.toggled(), Status::Done);
        assert_eq!(Status::Done.toggled(), Status::Open);
    }

    #[test]
    fn priority_and_status_db_labels_round_trip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::parse(priority.as_str()), Some(priority));
        }
        for status in [Status::Open, Status::Done] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Priority::parse("urgent"), None);
    }
}
