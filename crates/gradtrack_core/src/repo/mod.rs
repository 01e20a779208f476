//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Every statement filters by the owning `user_id`; a row belonging to a
//!   different user is indistinguishable from a missing row (`NotFound`).
//! - Write paths validate inputs before SQL mutations.
//! - Referenced universities are verified to belong to the caller before the
//!   reference is persisted.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod dashboard_repo;
pub mod deadline_repo;
pub mod document_repo;
pub mod task_repo;
pub mod university_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed field-level validation.
    Validation(ValidationError),
    /// Unknown id, or an id owned by a different user. The two cases are
    /// deliberately indistinguishable.
    NotFound { entity: &'static str, id: Uuid },
    /// A related-entity id does not resolve to a row owned by the caller.
    InvalidReference { field: &'static str, id: Uuid },
    /// Transport-level database failure.
    Db(DbError),
    /// Persisted row violates the domain model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidReference { field, id } => {
                write!(f, "invalid reference in {field}: {id}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, context: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {context}")))
}

pub(crate) fn parse_date(value: &str, context: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {context}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64, context: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {context}"
        ))),
    }
}

/// Date serialization used for TEXT date columns.
pub(crate) fn date_to_db(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Verifies that `university_id` resolves to a row owned by `user_id`.
///
/// Returns `InvalidReference` otherwise; used by task/deadline write paths.
pub(crate) fn ensure_university_owned(
    conn: &Connection,
    user_id: Uuid,
    university_id: Uuid,
    field: &'static str,
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM universities
            WHERE id = ?1
              AND user_id = ?2
        );",
        [university_id.to_string(), user_id.to_string()],
        |row| row.get(0),
    )?;

    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::InvalidReference {
            field,
            id: university_id,
        })
    }
}
