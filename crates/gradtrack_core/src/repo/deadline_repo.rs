//! Deadline repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD over the `deadlines` table.
//! - Support the optional date-window filter used by "upcoming" queries.

use crate::model::deadline::{Deadline, DeadlineId, DeadlinePatch, DeadlineType, NewDeadline};
use crate::model::user::UserId;
use crate::model::university::UniversityId;
use crate::repo::university_repo::option_text;
use crate::repo::{
    bool_to_int, date_to_db, ensure_university_owned, int_to_bool, parse_date, parse_uuid,
    RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

const DEADLINE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    type,
    date,
    completed,
    university_id,
    created_at,
    updated_at
FROM deadlines";

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Filters for deadline list queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineListFilter {
    pub deadline_type: Option<DeadlineType>,
    pub completed: Option<bool>,
    pub university_id: Option<UniversityId>,
    /// Restricts to not-completed deadlines dated inside the window.
    pub window: Option<DateWindow>,
}

/// Repository interface for deadline CRUD operations.
pub trait DeadlineRepository {
    fn create(&self, user_id: UserId, new: &NewDeadline) -> RepoResult<Deadline>;
    fn get(&self, user_id: UserId, id: DeadlineId) -> RepoResult<Option<Deadline>>;
    fn list(&self, user_id: UserId, filter: &DeadlineListFilter) -> RepoResult<Vec<Deadline>>;
    fn update(&self, user_id: UserId, id: DeadlineId, patch: &DeadlinePatch)
        -> RepoResult<Deadline>;
    fn delete(&self, user_id: UserId, id: DeadlineId) -> RepoResult<()>;
}

/// SQLite-backed deadline repository.
pub struct SqliteDeadlineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeadlineRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_existing(&self, user_id: UserId, id: DeadlineId) -> RepoResult<Deadline> {
        self.get(user_id, id)?.ok_or(RepoError::NotFound {
            entity: "deadline",
            id,
        })
    }
}

impl DeadlineRepository for SqliteDeadlineRepository<'_> {
    fn create(&self, user_id: UserId, new: &NewDeadline) -> RepoResult<Deadline> {
        new.validate()?;

        if let Some(university_id) = new.university_id {
            ensure_university_owned(self.conn, user_id, university_id, "universityId")?;
        }

        let id: DeadlineId = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO deadlines (
                id, user_id, title, type, date, university_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            rusqlite::params![
                id.to_string(),
                user_id.to_string(),
                new.title.trim(),
                new.deadline_type.as_str(),
                date_to_db(new.date),
                new.university_id.map(|value| value.to_string()),
            ],
        )?;

        self.get_existing(user_id, id)
    }

    fn get(&self, user_id: UserId, id: DeadlineId) -> RepoResult<Option<Deadline>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DEADLINE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query([id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_deadline_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, user_id: UserId, filter: &DeadlineListFilter) -> RepoResult<Vec<Deadline>> {
        let mut sql = format!("{DEADLINE_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(deadline_type) = filter.deadline_type {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(deadline_type.as_str().to_string()));
        }
        if let Some(completed) = filter.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(university_id) = filter.university_id {
            sql.push_str(" AND university_id = ?");
            bind_values.push(Value::Text(university_id.to_string()));
        }
        if let Some(window) = filter.window {
            sql.push_str(" AND completed = 0 AND date >= ? AND date <= ?");
            bind_values.push(Value::Text(date_to_db(window.from)));
            bind_values.push(Value::Text(date_to_db(window.to)));
        }

        sql.push_str(" ORDER BY date ASC, created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut deadlines = Vec::new();
        while let Some(row) = rows.next()? {
            deadlines.push(parse_deadline_row(row)?);
        }

        Ok(deadlines)
    }

    fn update(
        &self,
        user_id: UserId,
        id: DeadlineId,
        patch: &DeadlinePatch,
    ) -> RepoResult<Deadline> {
        patch.validate()?;

        if let Some(Some(university_id)) = patch.university_id {
            ensure_university_owned(self.conn, user_id, university_id, "universityId")?;
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_deref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.trim().to_string()));
        }
        if let Some(deadline_type) = patch.deadline_type {
            assignments.push("type = ?");
            bind_values.push(Value::Text(deadline_type.as_str().to_string()));
        }
        if let Some(date) = patch.date {
            assignments.push("date = ?");
            bind_values.push(Value::Text(date_to_db(date)));
        }
        if let Some(completed) = patch.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(university_id) = &patch.university_id {
            assignments.push("university_id = ?");
            bind_values.push(option_text(
                university_id.map(|value| value.to_string()).as_deref(),
            ));
        }

        let mut sql = String::from("UPDATE deadlines SET ");
        for assignment in &assignments {
            sql.push_str(assignment);
            sql.push_str(", ");
        }
        sql.push_str("updated_at = (strftime('%s', 'now') * 1000) WHERE id = ? AND user_id = ?;");
        bind_values.push(Value::Text(id.to_string()));
        bind_values.push(Value::Text(user_id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "deadline",
                id,
            });
        }

        self.get_existing(user_id, id)
    }

    fn delete(&self, user_id: UserId, id: DeadlineId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM deadlines WHERE id = ?1 AND user_id = ?2;",
            [id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "deadline",
                id,
            });
        }

        Ok(())
    }
}

fn parse_deadline_row(row: &Row<'_>) -> RepoResult<Deadline> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    let type_text: String = row.get("type")?;
    let deadline_type = DeadlineType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid type `{type_text}` in deadlines.type"))
    })?;

    let date_text: String = row.get("date")?;
    let completed = int_to_bool(row.get("completed")?, "deadlines.completed")?;

    let university_id = row
        .get::<_, Option<String>>("university_id")?
        .map(|value| parse_uuid(&value, "deadlines.university_id"))
        .transpose()?;

    Ok(Deadline {
        id: parse_uuid(&id_text, "deadlines.id")?,
        user_id: parse_uuid(&user_text, "deadlines.user_id")?,
        title: row.get("title")?,
        deadline_type,
        date: parse_date(&date_text, "deadlines.date")?,
        completed,
        university_id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
