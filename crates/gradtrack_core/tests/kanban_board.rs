use chrono::NaiveDate;
use gradtrack_core::board::{BoardFilters, BoardSort, BoardState, SortDirection, SortKey};
use gradtrack_core::model::task::{NewTask, TaskPriority, TaskStatus};
use gradtrack_core::model::university::{NewUniversity, UniversityCategory};
use gradtrack_core::model::user::{NewUser, UserId};
use gradtrack_core::open_db_in_memory;
use gradtrack_core::repo::task_repo::{SqliteTaskRepository, TaskListFilter};
use gradtrack_core::repo::university_repo::{SqliteUniversityRepository, UniversityRepository};
use gradtrack_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gradtrack_core::service::task_service::TaskService;
use rusqlite::Connection;

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

fn date(text: &str) -> NaiveDate {
    text.parse().unwrap()
}

#[test]
fn board_renders_service_listing_into_columns() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut pending = NewTask::new("write essay");
    pending.due_date = Some(date("2026-02-01"));
    service.create_task(user_id, &pending).unwrap();

    let mut in_progress = NewTask::new("request transcripts");
    in_progress.status = TaskStatus::InProgress;
    service.create_task(user_id, &in_progress).unwrap();

    let listing = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();
    let board = BoardState::new(listing.tasks);
    let view = board.render(date("2026-03-01"));

    assert_eq!(view.visible_total, 2);
    assert_eq!(view.pending.len(), 1);
    assert_eq!(view.in_progress.len(), 1);
    assert!(view.pending[0].overdue);
    assert_eq!(view.pending[0].due_label.as_deref(), Some("28 days overdue"));
}

#[test]
fn filters_and_sort_combine_and_rendering_is_repeatable() {
    let (conn, user_id) = setup();
    let university = SqliteUniversityRepository::new(&conn)
        .create(user_id, &NewUniversity::new("MIT", UniversityCategory::Reach))
        .unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut linked_high = NewTask::new("Alpha essay");
    linked_high.priority = TaskPriority::High;
    linked_high.university_id = Some(university.id);
    service.create_task(user_id, &linked_high).unwrap();

    let mut linked_low = NewTask::new("Beta forms");
    linked_low.priority = TaskPriority::Low;
    linked_low.university_id = Some(university.id);
    service.create_task(user_id, &linked_low).unwrap();

    service
        .create_task(user_id, &NewTask::new("Unlinked chore"))
        .unwrap();

    let listing = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();
    let mut board = BoardState::new(listing.tasks);
    board.filters = BoardFilters {
        university: Some(university.id),
        ..BoardFilters::default()
    };
    board.sort = BoardSort {
        key: SortKey::Title,
        direction: SortDirection::Asc,
    };

    let today = date("2026-03-01");
    let first = board.render(today);
    let second = board.render(today);
    assert_eq!(first, second);

    assert_eq!(first.visible_total, 2);
    assert_eq!(first.pending[0].title, "Alpha essay");
    assert_eq!(first.pending[1].title, "Beta forms");

    // Flipping direction reverses the column order.
    board.sort.direction = SortDirection::Desc;
    let flipped = board.render(today);
    assert_eq!(flipped.pending[0].title, "Beta forms");

    board.clear_filters();
    assert_eq!(board.render(today).visible_total, 3);
}

#[test]
fn successful_move_persists_through_the_service() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(user_id, &NewTask::new("essay")).unwrap();
    let listing = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();
    let mut board = BoardState::new(listing.tasks);

    board
        .move_task(created.id, TaskStatus::Completed, |task, status| {
            service.move_task(user_id, task.id, status)
        })
        .unwrap();

    // Cache holds the persisted row, completed_at included.
    assert_eq!(board.tasks()[0].status, TaskStatus::Completed);
    assert!(board.tasks()[0].completed_at.is_some());

    let stored = service.get_task(user_id, created.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
}

#[test]
fn failed_move_leaves_cache_and_storage_untouched() {
    let (conn, user_id) = setup();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(user_id, &NewTask::new("essay")).unwrap();
    let listing = service
        .list_tasks(user_id, &TaskListFilter::default())
        .unwrap();
    let mut board = BoardState::new(listing.tasks);

    // Persist against a stranger's scope fails with not-found.
    let stranger = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "other@example.com".to_string(),
            name: None,
        })
        .unwrap();

    let result = board.move_task(created.id, TaskStatus::Completed, |task, status| {
        service.move_task(stranger.id, task.id, status)
    });

    assert!(result.is_err());
    assert_eq!(board.tasks()[0].status, TaskStatus::Pending);
    let stored = service.get_task(user_id, created.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Pending);
}
