use pocketnote_core::db::open_db_in_memory;
use pocketnote_core::{
    search_records, NoteService, Priority, SqliteNoteRepository, SqliteTaskRepository, Status,
    TaskDraft, TaskService,
};

#[test]
fn empty_query_returns_the_full_unfiltered_lists() {
    let conn = open_db_in_memory().unwrap();
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    notes.create_note("One", "body", vec![], None).unwrap();
    notes.create_note("Two", "body", vec![], None).unwrap();
    tasks
        .create_task(TaskDraft {
            title: "Only task".to_string(),
            ..TaskDraft::default()
        })
        .unwrap();

    let results = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "",
    );
    assert_eq!(results.notes.len(), 2);
    assert_eq!(results.tasks.len(), 1);

    let whitespace = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "   \t",
    );
    assert_eq!(whitespace.notes.len(), 2);
    assert_eq!(whitespace.tasks.len(), 1);
}

#[test]
fn search_matches_titles_content_tags_and_descriptions_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    notes
        .create_note("Meeting Notes", "Discussed the ROADMAP", vec![], None)
        .unwrap();
    notes
        .create_note("Groceries", "eggs", vec!["Shopping".to_string()], None)
        .unwrap();
    tasks
        .create_task(TaskDraft {
            title: "Call dentist".to_string(),
            description: Some("Schedule annual checkup".to_string()),
            priority: Priority::Low,
            status: Status::Open,
            ..TaskDraft::default()
        })
        .unwrap();

    let by_content = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "roadmap",
    );
    assert_eq!(by_content.notes.len(), 1);
    assert!(by_content.tasks.is_empty());

    let by_tag = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "SHOPPING",
    );
    assert_eq!(by_tag.notes.len(), 1);
    assert_eq!(by_tag.notes[0].title, "Groceries");

    let by_description = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "Checkup",
    );
    assert!(by_description.notes.is_empty());
    assert_eq!(by_description.tasks.len(), 1);
}

#[test]
fn unmatched_query_returns_empty_results_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    notes.create_note("Something", "here", vec![], None).unwrap();

    let results = search_records(
        notes.all_notes().unwrap(),
        tasks.list_tasks(None, None).unwrap(),
        "quetzalcoatl",
    );
    assert!(results.is_empty());
}

#[test]
fn archived_notes_are_still_searchable() {
    let conn = open_db_in_memory().unwrap();
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let note = notes
        .create_note("Old project", "retired plans", vec![], None)
        .unwrap();
    notes.toggle_archived(note.id).unwrap();

    // Hidden from the overview...
    let overview = notes.overview().unwrap();
    assert!(overview.pinned.is_empty() && overview.other.is_empty());

    // ...but still reachable through search.
    let results = search_records(notes.all_notes().unwrap(), Vec::new(), "retired");
    assert_eq!(results.notes.len(), 1);
    assert_eq!(results.notes[0].id, note.id);
}
