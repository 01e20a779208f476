use gradtrack_core::model::task::{NewTask, TaskPatch, TaskPriority, TaskStatus};
use gradtrack_core::model::university::{NewUniversity, UniversityCategory};
use gradtrack_core::model::user::{NewUser, UserId};
use gradtrack_core::open_db_in_memory;
use gradtrack_core::repo::task_repo::{SqliteTaskRepository, TaskListFilter};
use gradtrack_core::repo::university_repo::{SqliteUniversityRepository, UniversityRepository};
use gradtrack_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gradtrack_core::service::task_service::TaskService;
use gradtrack_core::RepoError;
use rusqlite::Connection;
use uuid::Uuid;

fn setup() -> (Connection, UserId) {
    let conn = open_db_in_memory().unwrap();
    let user = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "applicant@example.com".to_string(),
            name: None,
        })
        .unwrap();
    (conn, user.id)
}

#[test]
fn completed_at_follows_status_across_toggles() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service
        .create_task(user_id, &NewTask::new("essay"))
        .unwrap();
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.completed_at, None);

    let completed = service
        .update_task(user_id, created.id, &TaskPatch::status(TaskStatus::Completed))
        .unwrap();
    assert!(completed.completed_at.is_some());

    // Completing an already completed task keeps the original timestamp.
    let first_completed_at = completed.completed_at;
    let again = service
        .update_task(user_id, created.id, &TaskPatch::status(TaskStatus::Completed))
        .unwrap();
    assert_eq!(again.completed_at, first_completed_at);

    let reopened = service
        .update_task(user_id, created.id, &TaskPatch::status(TaskStatus::InProgress))
        .unwrap();
    assert_eq!(reopened.completed_at, None);
}

#[test]
fn creating_directly_completed_sets_completed_at() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut new = NewTask::new("already done");
    new.status = TaskStatus::Completed;
    let created = service.create_task(user_id, &new).unwrap();

    assert!(created.completed_at.is_some());
}

#[test]
fn foreign_university_reference_is_rejected() {
    let (conn, user_id) = setup();
    let stranger = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "other@example.com".to_string(),
            name: None,
        })
        .unwrap();
    let foreign = SqliteUniversityRepository::new(&conn)
        .create(
            stranger.id,
            &NewUniversity::new("Theirs", UniversityCategory::Target),
        )
        .unwrap();

    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut new = NewTask::new("essay");
    new.university_id = Some(foreign.id);
    let err = service.create_task(user_id, &new).unwrap_err();
    assert!(matches!(err, RepoError::InvalidReference { .. }));

    let mut unknown = NewTask::new("essay");
    unknown.university_id = Some(Uuid::new_v4());
    let err = service.create_task(user_id, &unknown).unwrap_err();
    assert!(matches!(err, RepoError::InvalidReference { .. }));
}

#[test]
fn list_groups_kanban_columns_and_skips_cancelled() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    for status in [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ] {
        let mut new = NewTask::new("t");
        new.status = status;
        service.create_task(user_id, &new).unwrap();
    }

    let result = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();

    assert_eq!(result.tasks.len(), 4);
    assert_eq!(result.kanban_tasks.pending.len(), 1);
    assert_eq!(result.kanban_tasks.in_progress.len(), 1);
    assert_eq!(result.kanban_tasks.completed.len(), 1);
}

#[test]
fn list_orders_by_priority_then_due_date() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut low = NewTask::new("low");
    low.priority = TaskPriority::Low;
    low.due_date = Some("2026-01-01".parse().unwrap());
    service.create_task(user_id, &low).unwrap();

    let mut urgent_late = NewTask::new("urgent-late");
    urgent_late.priority = TaskPriority::Urgent;
    urgent_late.due_date = Some("2026-06-01".parse().unwrap());
    service.create_task(user_id, &urgent_late).unwrap();

    let mut urgent_soon = NewTask::new("urgent-soon");
    urgent_soon.priority = TaskPriority::Urgent;
    urgent_soon.due_date = Some("2026-02-01".parse().unwrap());
    service.create_task(user_id, &urgent_soon).unwrap();

    let mut urgent_undated = NewTask::new("urgent-undated");
    urgent_undated.priority = TaskPriority::Urgent;
    service.create_task(user_id, &urgent_undated).unwrap();

    let result = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();
    let titles: Vec<&str> = result.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["urgent-soon", "urgent-late", "urgent-undated", "low"]
    );
}

#[test]
fn move_task_only_changes_status() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut new = NewTask::new("essay");
    new.description = Some("first draft".to_string());
    let created = service.create_task(user_id, &new).unwrap();

    let moved = service
        .move_task(user_id, created.id, TaskStatus::InProgress)
        .unwrap();
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert_eq!(moved.description.as_deref(), Some("first draft"));
    assert_eq!(moved.title, "essay");
}

#[test]
fn cross_user_update_is_not_found() {
    let (conn, owner) = setup();
    let stranger = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "other@example.com".to_string(),
            name: None,
        })
        .unwrap();

    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let created = service.create_task(owner, &NewTask::new("essay")).unwrap();

    let err = service
        .update_task(
            stranger.id,
            created.id,
            &TaskPatch::status(TaskStatus::Completed),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}
