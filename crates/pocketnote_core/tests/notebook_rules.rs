use pocketnote_core::db::open_db_in_memory;
use pocketnote_core::{
    NotebookService, NotebookServiceError, NoteService, RepoError, SqliteNotebookRepository,
    SqliteNoteRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_update_and_list_notebooks() {
    let conn = open_db_in_memory().unwrap();
    let service = NotebookService::new(SqliteNotebookRepository::try_new(&conn).unwrap());

    let work = service.create_notebook("Work", "#3b82f6").unwrap();
    let home = service.create_notebook("Home", "#10b981").unwrap();
    assert_ne!(work.id, home.id);

    let renamed = service
        .update_notebook(work.id, "Work projects", "#ef4444")
        .unwrap();
    assert_eq!(renamed.name, "Work projects");
    assert_eq!(renamed.color, "#ef4444");
    assert!(renamed.updated_at > work.updated_at);
    assert_eq!(renamed.created_at, work.created_at);

    // Most recently updated first.
    let listed = service.list_notebooks().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, work.id);
    assert_eq!(listed[1].id, home.id);
}

#[test]
fn invalid_name_and_color_are_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let service = NotebookService::new(SqliteNotebookRepository::try_new(&conn).unwrap());

    let err = service.create_notebook("   ", "#3b82f6").unwrap_err();
    assert!(matches!(
        err,
        NotebookServiceError::Validation(ValidationError::EmptyNotebookName)
    ));

    let err = service.create_notebook("Travel", "blue").unwrap_err();
    assert!(matches!(
        err,
        NotebookServiceError::Validation(ValidationError::InvalidColorToken(_))
    ));

    assert!(service.list_notebooks().unwrap().is_empty());
}

#[test]
fn updating_or_deleting_missing_notebook_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NotebookService::new(SqliteNotebookRepository::try_new(&conn).unwrap());
    let notes = SqliteNoteRepository::try_new(&conn).unwrap();

    let ghost = Uuid::new_v4();
    assert!(matches!(
        service.update_notebook(ghost, "Ghost", "#3b82f6").unwrap_err(),
        NotebookServiceError::NotebookNotFound(id) if id == ghost
    ));
    assert!(matches!(
        service.delete_notebook(&notes, ghost).unwrap_err(),
        NotebookServiceError::NotebookNotFound(id) if id == ghost
    ));
}

#[test]
fn non_empty_notebook_cannot_be_deleted_until_its_notes_are_gone() {
    let conn = open_db_in_memory().unwrap();
    let notebooks = NotebookService::new(SqliteNotebookRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note_repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let work = notebooks.create_notebook("Work", "#3b82f6").unwrap();
    let first = notes
        .create_note("Standup", "notes", vec![], Some(work.id))
        .unwrap();
    let second = notes
        .create_note("Retro", "more notes", vec![], Some(work.id))
        .unwrap();

    let err = notebooks.delete_notebook(&note_repo, work.id).unwrap_err();
    match err {
        NotebookServiceError::NotebookNotEmpty { name, note_count } => {
            assert_eq!(name, "Work");
            assert_eq!(note_count, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Move one note out, delete the other; deletion then succeeds.
    notes.set_notebook(first.id, None).unwrap();
    notes.delete_note(second.id).unwrap();
    notebooks.delete_notebook(&note_repo, work.id).unwrap();
    assert!(notebooks.get_notebook(work.id).unwrap().is_none());
}

#[test]
fn dangling_notebook_reference_is_tolerated_on_notes() {
    let conn = open_db_in_memory().unwrap();
    let notebooks = NotebookService::new(SqliteNotebookRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note_repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let temp = notebooks.create_notebook("Temp", "#8b5cf6").unwrap();
    let note = notes
        .create_note("Orphan-to-be", "body", vec![], Some(temp.id))
        .unwrap();

    notes.set_notebook(note.id, None).unwrap();
    notebooks.delete_notebook(&note_repo, temp.id).unwrap();

    // Re-point the note at the now-deleted notebook id: storage accepts the
    // weak reference, and the note still loads.
    let dangling = notes.set_notebook(note.id, Some(temp.id)).unwrap();
    assert_eq!(dangling.notebook_id, Some(temp.id));
    let loaded = notes.get_note(note.id).unwrap().unwrap();
    assert_eq!(loaded.notebook_id, Some(temp.id));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteNotebookRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
