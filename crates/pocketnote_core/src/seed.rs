//! First-run demo content.
//!
//! Populates an empty store with a small set of notes and tasks so the app
//! has something to show. Runs at most once: any existing note or task
//! means the store belongs to the user and is left alone.

use crate::model::note::Note;
use crate::model::task::{Priority, Status, Task};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use chrono::{DateTime, Duration, Utc};
use log::info;
use rusqlite::Connection;

/// What the bootstrap call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { notes: u32, tasks: u32 },
    AlreadyPopulated,
}

/// Seeds demo notes and tasks into an empty store.
pub fn seed_demo_data(conn: &Connection) -> RepoResult<SeedOutcome> {
    let notes_repo = SqliteNoteRepository::try_new(conn)?;
    let tasks_repo = SqliteTaskRepository::try_new(conn)?;

    if notes_repo.count()? > 0 || tasks_repo.count()? > 0 {
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let now = crate::model::now_ms();
    let notes = demo_notes(now);
    let tasks = demo_tasks(now)?;

    for note in &notes {
        notes_repo.put(note)?;
    }
    for task in &tasks {
        tasks_repo.put(task)?;
    }

    info!(
        "event=seed module=seed status=ok notes={} tasks={}",
        notes.len(),
        tasks.len()
    );

    Ok(SeedOutcome::Seeded {
        notes: notes.len() as u32,
        tasks: tasks.len() as u32,
    })
}

fn demo_notes(now: DateTime<Utc>) -> Vec<Note> {
    let mut welcome = Note::new(
        "Welcome to PocketNote",
        "This is a demo note to help you get started. You can edit or delete this note anytime.",
        vec!["welcome".to_string(), "demo".to_string()],
        None,
    );
    welcome.pinned = true;
    welcome.created_at = now;
    welcome.updated_at = now;

    let mut meeting = Note::new(
        "Meeting Notes",
        "Discussed project timeline and deliverables. Key points:\n\
         - MVP due in 2 weeks\n\
         - Design review next Friday\n\
         - Backend API ready by Wednesday",
        vec!["meeting".to_string(), "work".to_string()],
        None,
    );
    meeting.created_at = now - Duration::days(1);
    meeting.updated_at = now - Duration::days(1);

    let mut shopping = Note::new(
        "Shopping List",
        "- Milk\n- Eggs\n- Bread\n- Fruits\n- Vegetables",
        vec!["shopping".to_string(), "personal".to_string()],
        None,
    );
    shopping.created_at = now - Duration::days(2);
    shopping.updated_at = now - Duration::days(2);

    vec![welcome, meeting, shopping]
}

fn demo_tasks(now: DateTime<Utc>) -> RepoResult<Vec<Task>> {
    let mut proposal = Task::new(
        "Complete project proposal",
        Priority::High,
        Some(now + Duration::days(3)),
    )?;
    proposal.description = Some("Finish the project proposal document and send to client".to_string());
    proposal.tags = vec!["important".to_string(), "work".to_string()];
    proposal.created_at = now;
    proposal.updated_at = now;

    let mut groceries = Task::new(
        "Buy groceries",
        Priority::Medium,
        Some(now + Duration::days(1)),
    )?;
    groceries.description =
        Some("Get milk, eggs, bread, and fruits from the supermarket".to_string());
    groceries.tags = vec!["personal".to_string(), "shopping".to_string()];
    groceries.created_at = now - Duration::days(1);
    groceries.updated_at = now - Duration::days(1);

    let mut dentist = Task::new("Call dentist", Priority::Low, None)?;
    dentist.description = Some("Schedule annual checkup appointment".to_string());
    dentist.status = Status::Done;
    dentist.tags = vec!["health".to_string(), "personal".to_string()];
    dentist.created_at = now - Duration::days(2);
    dentist.updated_at = now - Duration::days(1);

    Ok(vec![proposal, groceries, dentist])
}
