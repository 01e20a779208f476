//! Core domain logic for GradTrack.
//! This crate is the single source of truth for business invariants.

pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::{BoardFilters, BoardMoveError, BoardSort, BoardState, BoardView, TaskCard};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::deadline::{Deadline, DeadlineId, DeadlineType};
pub use model::document::{Document, DocumentId, DocumentType};
pub use model::task::{Task, TaskId, TaskPriority, TaskStatus};
pub use model::university::{University, UniversityCategory, UniversityId, UniversityStatus};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::dashboard_service::DashboardService;
pub use service::deadline_service::DeadlineService;
pub use service::document_service::DocumentService;
pub use service::task_service::TaskService;
pub use service::university_service::UniversityService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
