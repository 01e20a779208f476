//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `gradtrack_core` linkage.
//! - Exercise one full path: open storage, seed a user with data, print the
//!   dashboard summary.

use chrono::Utc;
use gradtrack_core::model::deadline::NewDeadline;
use gradtrack_core::model::task::NewTask;
use gradtrack_core::model::university::{NewUniversity, UniversityCategory};
use gradtrack_core::model::user::NewUser;
use gradtrack_core::repo::dashboard_repo::SqliteDashboardRepository;
use gradtrack_core::repo::deadline_repo::SqliteDeadlineRepository;
use gradtrack_core::repo::task_repo::SqliteTaskRepository;
use gradtrack_core::repo::university_repo::SqliteUniversityRepository;
use gradtrack_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gradtrack_core::service::dashboard_service::DashboardService;
use gradtrack_core::service::deadline_service::DeadlineService;
use gradtrack_core::service::task_service::TaskService;
use gradtrack_core::service::university_service::UniversityService;
use gradtrack_core::{core_version, open_db_in_memory};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("gradtrack_core version={}", core_version());

    let conn = open_db_in_memory()?;
    let today = Utc::now().date_naive();

    let user = SqliteUserRepository::new(&conn).create(&NewUser {
        email: "applicant@example.com".to_string(),
        name: Some("Applicant".to_string()),
    })?;

    let universities = UniversityService::new(SqliteUniversityRepository::new(&conn));
    let university = universities.create_university(
        user.id,
        &NewUniversity::new("Example University", UniversityCategory::Target),
    )?;

    let tasks = TaskService::new(SqliteTaskRepository::new(&conn));
    let mut new_task = NewTask::new("Draft statement of purpose");
    new_task.university_id = Some(university.id);
    tasks.create_task(user.id, &new_task)?;

    let deadlines = DeadlineService::new(SqliteDeadlineRepository::new(&conn));
    let mut new_deadline = NewDeadline::new(
        "Application due",
        gradtrack_core::DeadlineType::Application,
        today + chrono::Days::new(14),
    );
    new_deadline.university_id = Some(university.id);
    deadlines.create_deadline(user.id, &new_deadline)?;

    let dashboard = DashboardService::new(SqliteDashboardRepository::new(&conn));
    let summary = dashboard.summary(user.id, today)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
