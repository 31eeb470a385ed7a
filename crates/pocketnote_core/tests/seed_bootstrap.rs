use pocketnote_core::db::open_db_in_memory;
use pocketnote_core::{
    seed_demo_data, NoteService, Priority, SeedOutcome, SqliteNoteRepository, SqliteTaskRepository,
    Status, TaskDraft, TaskService,
};

#[test]
fn fresh_store_is_seeded_exactly_once() {
    let conn = open_db_in_memory().unwrap();

    let outcome = seed_demo_data(&conn).unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded { notes: 3, tasks: 3 });

    // Second run finds data and backs off.
    assert_eq!(seed_demo_data(&conn).unwrap(), SeedOutcome::AlreadyPopulated);

    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let overview = notes.overview().unwrap();
    assert_eq!(overview.pinned.len(), 1);
    assert_eq!(overview.pinned[0].title, "Welcome to PocketNote");
    assert_eq!(overview.other.len(), 2);

    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let all = tasks.list_tasks(None, None).unwrap();
    assert_eq!(all.len(), 3);

    let done = tasks.list_tasks(None, Some(Status::Done)).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].title, "Call dentist");
    assert_eq!(done[0].due_date, None);

    let high = tasks.list_tasks(Some(Priority::High), None).unwrap();
    assert_eq!(high.len(), 1);
    assert!(high[0].due_date.is_some());
}

#[test]
fn stores_with_user_data_are_never_reseeded() {
    let conn = open_db_in_memory().unwrap();
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    tasks
        .create_task(TaskDraft {
            title: "Mine".to_string(),
            ..TaskDraft::default()
        })
        .unwrap();

    assert_eq!(seed_demo_data(&conn).unwrap(), SeedOutcome::AlreadyPopulated);
    assert_eq!(tasks.list_tasks(None, None).unwrap().len(), 1);
}
