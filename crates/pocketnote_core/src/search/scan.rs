//! Substring scan over notes and tasks.
//!
//! # Invariants
//! - Matching is a pure case-insensitive substring test: no tokenization,
//!   no ranking, no minimum query length.
//! - A blank query returns the full unfiltered lists, never an empty result.
//! - Input order is preserved; archived notes are searched like any other.

use crate::model::note::Note;
use crate::model::task::Task;

/// Matching notes and tasks for one query, in input order.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.tasks.is_empty()
    }
}

/// Filters the given records by a free-text query.
///
/// Notes match on title, content and every tag; tasks match on title,
/// description and every tag.
pub fn search_records(notes: Vec<Note>, tasks: Vec<Task>, query: &str) -> SearchResults {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults { notes, tasks };
    }

    SearchResults {
        notes: notes
            .into_iter()
            .filter(|note| note_matches(note, &needle))
            .collect(),
        tasks: tasks
            .into_iter()
            .filter(|task| task_matches(task, &needle))
            .collect(),
    }
}

fn note_matches(note: &Note, needle: &str) -> bool {
    contains(&note.title, needle)
        || contains(&note.content, needle)
        || note.tags.iter().any(|tag| contains(tag, needle))
}

fn task_matches(task: &Task, needle: &str) -> bool {
    contains(&task.title, needle)
        || task
            .description
            .as_deref()
            .is_some_and(|description| contains(description, needle))
        || task.tags.iter().any(|tag| contains(tag, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
