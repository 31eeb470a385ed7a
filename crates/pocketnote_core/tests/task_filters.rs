use chrono::{Duration, Utc};
use pocketnote_core::db::open_db_in_memory;
use pocketnote_core::{
    Priority, SqliteTaskRepository, Status, TaskDraft, TaskService, TaskServiceError,
    ValidationError,
};
use rusqlite::params;
use uuid::Uuid;

fn draft(title: &str, priority: Priority, status: Status) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        priority,
        status,
        ..TaskDraft::default()
    }
}

#[test]
fn low_priority_filter_includes_buy_milk_and_high_excludes_it() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let buy_milk = service
        .create_task(draft("Buy milk", Priority::Low, Status::Open))
        .unwrap();
    assert_eq!(buy_milk.due_date, None);

    let low = service.list_tasks(Some(Priority::Low), None).unwrap();
    assert!(low.iter().any(|task| task.id == buy_milk.id));

    let high = service.list_tasks(Some(Priority::High), None).unwrap();
    assert!(high.iter().all(|task| task.id != buy_milk.id));
}

#[test]
fn priority_and_status_filters_combine_as_logical_and() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let high_open = service
        .create_task(draft("Ship release", Priority::High, Status::Open))
        .unwrap();
    service
        .create_task(draft("Write blog post", Priority::High, Status::Done))
        .unwrap();
    service
        .create_task(draft("Water plants", Priority::Low, Status::Open))
        .unwrap();

    let filtered = service
        .list_tasks(Some(Priority::High), Some(Status::Open))
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, high_open.id);

    // Default all/all returns everything.
    let all = service.list_tasks(None, None).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn task_list_orders_by_updated_at_descending() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let older = service
        .create_task(draft("Older", Priority::Medium, Status::Open))
        .unwrap();
    let newer = service
        .create_task(draft("Newer", Priority::Medium, Status::Open))
        .unwrap();

    conn.execute(
        "UPDATE tasks SET created_at = 1000, updated_at = 1000 WHERE id = ?1;",
        params![older.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE tasks SET created_at = 2000, updated_at = 2000 WHERE id = ?1;",
        params![newer.id.to_string()],
    )
    .unwrap();

    let listed = service.list_tasks(None, None).unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

#[test]
fn toggle_status_flips_and_bumps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let task = service
        .create_task(draft("Call dentist", Priority::Low, Status::Open))
        .unwrap();

    let done = service.toggle_status(task.id).unwrap();
    assert_eq!(done.status, Status::Done);
    assert!(done.updated_at > task.updated_at);

    let reopened = service.toggle_status(task.id).unwrap();
    assert_eq!(reopened.status, Status::Open);
    assert!(reopened.updated_at > done.updated_at);
}

#[test]
fn empty_title_is_rejected_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let err = service
        .create_task(draft("   ", Priority::Medium, Status::Open))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(ValidationError::EmptyTaskTitle)
    ));
    assert!(service.list_tasks(None, None).unwrap().is_empty());

    let task = service
        .create_task(draft("Valid", Priority::Medium, Status::Open))
        .unwrap();
    let err = service
        .update_task(task.id, draft("  ", Priority::Medium, Status::Open))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(ValidationError::EmptyTaskTitle)
    ));
    assert_eq!(
        service.get_task(task.id).unwrap().unwrap().title,
        "Valid"
    );
}

#[test]
fn update_replaces_editable_fields_and_clears_due_date() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let due = Utc::now() + Duration::days(2);
    let task = service
        .create_task(TaskDraft {
            title: "Prepare slides".to_string(),
            description: Some("for the demo".to_string()),
            due_date: Some(due),
            priority: Priority::High,
            status: Status::Open,
            tags: vec!["work".to_string()],
        })
        .unwrap();
    assert!(task.due_date.is_some());

    let updated = service
        .update_task(
            task.id,
            TaskDraft {
                title: "Prepare slides".to_string(),
                description: None,
                due_date: None,
                priority: Priority::Medium,
                status: Status::Open,
                tags: vec!["work".to_string(), "demo".to_string()],
            },
        )
        .unwrap();
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.description, None);
    assert_eq!(updated.priority, Priority::Medium);
    assert_eq!(updated.tags, vec!["demo", "work"]);
}

#[test]
fn overdue_is_due_in_past_and_not_done() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let now = Utc::now();

    let overdue = service
        .create_task(TaskDraft {
            title: "Late".to_string(),
            due_date: Some(now - Duration::hours(1)),
            ..TaskDraft::default()
        })
        .unwrap();
    assert!(overdue.is_overdue(now));

    let closed = service.toggle_status(overdue.id).unwrap();
    assert!(!closed.is_overdue(now));
}

#[test]
fn deleting_missing_task_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let ghost = Uuid::new_v4();
    assert!(matches!(
        service.delete_task(ghost).unwrap_err(),
        TaskServiceError::TaskNotFound(id) if id == ghost
    ));
}
