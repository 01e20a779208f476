//! Dashboard aggregation queries.
//!
//! # Responsibility
//! - Own the count/group-by/recent-row SQL the dashboard service assembles
//!   into summary and activity payloads.
//!
//! # Invariants
//! - Every query is scoped to the owning `user_id`.
//! - Group-by maps are sparse: only values present in storage appear, keyed
//!   by the lowercased enum name.

use crate::model::deadline::{DeadlineId, DeadlineType};
use crate::model::document::{DocumentId, DocumentType};
use crate::model::task::{TaskId, TaskStatus};
use crate::model::university::{UniversityCategory, UniversityId, UniversityStatus};
use crate::model::user::UserId;
use crate::repo::deadline_repo::DateWindow;
use crate::repo::{date_to_db, int_to_bool, parse_date, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{Connection, Row};
use std::collections::BTreeMap;

/// Rows pulled per entity type for the activity feed.
pub const RECENT_ROWS_PER_ENTITY: u32 = 5;

/// Rows returned by the upcoming-deadlines widget.
pub const UPCOMING_WIDGET_LIMIT: u32 = 5;

/// Recent-activity read model for universities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentUniversity {
    pub id: UniversityId,
    pub name: String,
    pub status: UniversityStatus,
    pub category: UniversityCategory,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Recent-activity read model for documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDocument {
    pub id: DocumentId,
    pub name: String,
    pub doc_type: DocumentType,
    pub version: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Recent-activity read model for tasks, with the related university name
/// resolved for feed descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTask {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub completed_at: Option<i64>,
    pub university_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Recent-activity read model for deadlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDeadline {
    pub id: DeadlineId,
    pub title: String,
    pub deadline_type: DeadlineType,
    pub completed: bool,
    pub university_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Read model for the upcoming-deadlines widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingDeadlineRow {
    pub id: DeadlineId,
    pub title: String,
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    pub university_name: Option<String>,
}

/// Aggregation queries backing the dashboard service.
pub trait DashboardRepository {
    fn count_universities(&self, user_id: UserId) -> RepoResult<u32>;
    fn universities_by_status(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>>;
    fn universities_by_category(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>>;

    fn count_documents(&self, user_id: UserId) -> RepoResult<u32>;
    fn documents_by_type(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>>;

    fn count_tasks(&self, user_id: UserId) -> RepoResult<u32>;
    /// PENDING and IN_PROGRESS tasks.
    fn count_pending_tasks(&self, user_id: UserId) -> RepoResult<u32>;
    /// Not COMPLETED, with a due date strictly before `today`.
    fn count_overdue_tasks(&self, user_id: UserId, today: NaiveDate) -> RepoResult<u32>;
    /// Not COMPLETED, priority HIGH or URGENT.
    fn count_high_priority_tasks(&self, user_id: UserId) -> RepoResult<u32>;

    /// Not-completed deadlines dated inside the inclusive window.
    fn count_deadlines_in_window(&self, user_id: UserId, window: DateWindow) -> RepoResult<u32>;

    fn recent_universities(&self, user_id: UserId) -> RepoResult<Vec<RecentUniversity>>;
    fn recent_documents(&self, user_id: UserId) -> RepoResult<Vec<RecentDocument>>;
    fn recent_tasks(&self, user_id: UserId) -> RepoResult<Vec<RecentTask>>;
    fn recent_deadlines(&self, user_id: UserId) -> RepoResult<Vec<RecentDeadline>>;

    /// Soonest not-completed deadlines inside the window, ascending by date.
    fn upcoming_deadlines(
        &self,
        user_id: UserId,
        window: DateWindow,
    ) -> RepoResult<Vec<UpcomingDeadlineRow>>;
}

/// SQLite-backed dashboard aggregation queries.
pub struct SqliteDashboardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDashboardRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn count_scoped(&self, sql: &str, user_id: UserId) -> RepoResult<u32> {
        let count = self
            .conn
            .query_row(sql, [user_id.to_string()], |row| row.get::<_, u32>(0))?;
        Ok(count)
    }

    fn group_by_column(&self, sql: &str, user_id: UserId) -> RepoResult<BTreeMap<String, u32>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut counts = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let count: u32 = row.get(1)?;
            counts.insert(key.to_lowercase(), count);
        }
        Ok(counts)
    }
}

impl DashboardRepository for SqliteDashboardRepository<'_> {
    fn count_universities(&self, user_id: UserId) -> RepoResult<u32> {
        self.count_scoped(
            "SELECT COUNT(*) FROM universities WHERE user_id = ?1;",
            user_id,
        )
    }

    fn universities_by_status(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>> {
        self.group_by_column(
            "SELECT status, COUNT(*)
             FROM universities
             WHERE user_id = ?1
             GROUP BY status;",
            user_id,
        )
    }

    fn universities_by_category(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>> {
        self.group_by_column(
            "SELECT category, COUNT(*)
             FROM universities
             WHERE user_id = ?1
             GROUP BY category;",
            user_id,
        )
    }

    fn count_documents(&self, user_id: UserId) -> RepoResult<u32> {
        self.count_scoped(
            "SELECT COUNT(*) FROM documents WHERE user_id = ?1;",
            user_id,
        )
    }

    fn documents_by_type(&self, user_id: UserId) -> RepoResult<BTreeMap<String, u32>> {
        self.group_by_column(
            "SELECT type, COUNT(*)
             FROM documents
             WHERE user_id = ?1
             GROUP BY type;",
            user_id,
        )
    }

    fn count_tasks(&self, user_id: UserId) -> RepoResult<u32> {
        self.count_scoped("SELECT COUNT(*) FROM tasks WHERE user_id = ?1;", user_id)
    }

    fn count_pending_tasks(&self, user_id: UserId) -> RepoResult<u32> {
        self.count_scoped(
            "SELECT COUNT(*)
             FROM tasks
             WHERE user_id = ?1
               AND status IN ('PENDING', 'IN_PROGRESS');",
            user_id,
        )
    }

    fn count_overdue_tasks(&self, user_id: UserId, today: NaiveDate) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM tasks
             WHERE user_id = ?1
               AND status != 'COMPLETED'
               AND due_date < ?2;",
            [user_id.to_string(), date_to_db(today)],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn count_high_priority_tasks(&self, user_id: UserId) -> RepoResult<u32> {
        self.count_scoped(
            "SELECT COUNT(*)
             FROM tasks
             WHERE user_id = ?1
               AND status != 'COMPLETED'
               AND priority IN ('HIGH', 'URGENT');",
            user_id,
        )
    }

    fn count_deadlines_in_window(&self, user_id: UserId, window: DateWindow) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM deadlines
             WHERE user_id = ?1
               AND completed = 0
               AND date >= ?2
               AND date <= ?3;",
            [
                user_id.to_string(),
                date_to_db(window.from),
                date_to_db(window.to),
            ],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn recent_universities(&self, user_id: UserId) -> RepoResult<Vec<RecentUniversity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, status, category, created_at, updated_at
             FROM universities
             WHERE user_id = ?1
             ORDER BY updated_at DESC, id ASC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            RECENT_ROWS_PER_ENTITY
        ])?;
        let mut recent = Vec::new();
        while let Some(row) = rows.next()? {
            recent.push(parse_recent_university(row)?);
        }
        Ok(recent)
    }

    fn recent_documents(&self, user_id: UserId) -> RepoResult<Vec<RecentDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, version, created_at, updated_at
             FROM documents
             WHERE user_id = ?1
             ORDER BY updated_at DESC, id ASC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            RECENT_ROWS_PER_ENTITY
        ])?;
        let mut recent = Vec::new();
        while let Some(row) = rows.next()? {
            recent.push(parse_recent_document(row)?);
        }
        Ok(recent)
    }

    fn recent_tasks(&self, user_id: UserId) -> RepoResult<Vec<RecentTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.title, t.status, t.completed_at, u.name AS university_name,
                    t.created_at, t.updated_at
             FROM tasks t
             LEFT JOIN universities u ON u.id = t.university_id
             WHERE t.user_id = ?1
             ORDER BY t.updated_at DESC, t.id ASC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            RECENT_ROWS_PER_ENTITY
        ])?;
        let mut recent = Vec::new();
        while let Some(row) = rows.next()? {
            recent.push(parse_recent_task(row)?);
        }
        Ok(recent)
    }

    fn recent_deadlines(&self, user_id: UserId) -> RepoResult<Vec<RecentDeadline>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.title, d.type, d.completed, u.name AS university_name,
                    d.created_at, d.updated_at
             FROM deadlines d
             LEFT JOIN universities u ON u.id = d.university_id
             WHERE d.user_id = ?1
             ORDER BY d.updated_at DESC, d.id ASC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            RECENT_ROWS_PER_ENTITY
        ])?;
        let mut recent = Vec::new();
        while let Some(row) = rows.next()? {
            recent.push(parse_recent_deadline(row)?);
        }
        Ok(recent)
    }

    fn upcoming_deadlines(
        &self,
        user_id: UserId,
        window: DateWindow,
    ) -> RepoResult<Vec<UpcomingDeadlineRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.title, d.type, d.date, u.name AS university_name
             FROM deadlines d
             LEFT JOIN universities u ON u.id = d.university_id
             WHERE d.user_id = ?1
               AND d.completed = 0
               AND d.date >= ?2
               AND d.date <= ?3
             ORDER BY d.date ASC, d.id ASC
             LIMIT ?4;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            date_to_db(window.from),
            date_to_db(window.to),
            UPCOMING_WIDGET_LIMIT
        ])?;
        let mut upcoming = Vec::new();
        while let Some(row) = rows.next()? {
            upcoming.push(parse_upcoming_deadline(row)?);
        }
        Ok(upcoming)
    }
}

fn parse_recent_university(row: &Row<'_>) -> RepoResult<RecentUniversity> {
    let id_text: String = row.get("id")?;
    let status_text: String = row.get("status")?;
    let category_text: String = row.get("category")?;

    Ok(RecentUniversity {
        id: parse_uuid(&id_text, "universities.id")?,
        name: row.get("name")?,
        status: UniversityStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{status_text}` in universities.status"
            ))
        })?,
        category: UniversityCategory::parse(&category_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid category `{category_text}` in universities.category"
            ))
        })?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_recent_document(row: &Row<'_>) -> RepoResult<RecentDocument> {
    let id_text: String = row.get("id")?;
    let type_text: String = row.get("type")?;

    Ok(RecentDocument {
        id: parse_uuid(&id_text, "documents.id")?,
        name: row.get("name")?,
        doc_type: DocumentType::parse(&type_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid type `{type_text}` in documents.type"))
        })?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_recent_task(row: &Row<'_>) -> RepoResult<RecentTask> {
    let id_text: String = row.get("id")?;
    let status_text: String = row.get("status")?;

    Ok(RecentTask {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        status: TaskStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
        })?,
        completed_at: row.get("completed_at")?,
        university_name: row.get("university_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_recent_deadline(row: &Row<'_>) -> RepoResult<RecentDeadline> {
    let id_text: String = row.get("id")?;
    let type_text: String = row.get("type")?;

    Ok(RecentDeadline {
        id: parse_uuid(&id_text, "deadlines.id")?,
        title: row.get("title")?,
        deadline_type: DeadlineType::parse(&type_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid type `{type_text}` in deadlines.type"))
        })?,
        completed: int_to_bool(row.get("completed")?, "deadlines.completed")?,
        university_name: row.get("university_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_upcoming_deadline(row: &Row<'_>) -> RepoResult<UpcomingDeadlineRow> {
    let id_text: String = row.get("id")?;
    let type_text: String = row.get("type")?;
    let date_text: String = row.get("date")?;

    Ok(UpcomingDeadlineRow {
        id: parse_uuid(&id_text, "deadlines.id")?,
        title: row.get("title")?,
        deadline_type: DeadlineType::parse(&type_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid type `{type_text}` in deadlines.type"))
        })?,
        date: parse_date(&date_text, "deadlines.date")?,
        university_name: row.get("university_name")?,
    })
}
