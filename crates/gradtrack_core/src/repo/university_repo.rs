//! University repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD over the `universities` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate inputs before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::university::{
    NewUniversity, University, UniversityCategory, UniversityId, UniversityPatch, UniversityStatus,
};
use crate::model::user::UserId;
use crate::repo::{date_to_db, parse_date, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

const UNIVERSITY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    url,
    status,
    category,
    deadline,
    lor_deadline,
    notes,
    created_at,
    updated_at
FROM universities";

/// Equality filters for university list queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversityListFilter {
    pub status: Option<UniversityStatus>,
    pub category: Option<UniversityCategory>,
}

/// Repository interface for university CRUD operations.
pub trait UniversityRepository {
    fn create(&self, user_id: UserId, new: &NewUniversity) -> RepoResult<University>;
    fn get(&self, user_id: UserId, id: UniversityId) -> RepoResult<Option<University>>;
    fn list(&self, user_id: UserId, filter: &UniversityListFilter) -> RepoResult<Vec<University>>;
    fn update(
        &self,
        user_id: UserId,
        id: UniversityId,
        patch: &UniversityPatch,
    ) -> RepoResult<University>;
    fn delete(&self, user_id: UserId, id: UniversityId) -> RepoResult<()>;
}

/// SQLite-backed university repository.
pub struct SqliteUniversityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUniversityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_existing(&self, user_id: UserId, id: UniversityId) -> RepoResult<University> {
        self.get(user_id, id)?.ok_or(RepoError::NotFound {
            entity: "university",
            id,
        })
    }
}

impl UniversityRepository for SqliteUniversityRepository<'_> {
    fn create(&self, user_id: UserId, new: &NewUniversity) -> RepoResult<University> {
        new.validate()?;

        let id: UniversityId = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO universities (
                id, user_id, name, url, status, category, deadline, lor_deadline, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            rusqlite::params![
                id.to_string(),
                user_id.to_string(),
                new.name.trim(),
                new.url.as_deref(),
                new.status.as_str(),
                new.category.as_str(),
                new.deadline.map(date_to_db),
                new.lor_deadline.map(date_to_db),
                new.notes.as_deref(),
            ],
        )?;

        self.get_existing(user_id, id)
    }

    fn get(&self, user_id: UserId, id: UniversityId) -> RepoResult<Option<University>> {
        let mut stmt = self.conn.prepare(&format!(
            "{UNIVERSITY_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query([id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_university_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, user_id: UserId, filter: &UniversityListFilter) -> RepoResult<Vec<University>> {
        let mut sql = format!("{UNIVERSITY_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(category) = filter.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut universities = Vec::new();
        while let Some(row) = rows.next()? {
            universities.push(parse_university_row(row)?);
        }

        Ok(universities)
    }

    fn update(
        &self,
        user_id: UserId,
        id: UniversityId,
        patch: &UniversityPatch,
    ) -> RepoResult<University> {
        patch.validate()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = patch.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.trim().to_string()));
        }
        if let Some(url) = &patch.url {
            assignments.push("url = ?");
            bind_values.push(option_text(url.as_deref()));
        }
        if let Some(status) = patch.status {
            assignments.push("status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(category) = patch.category {
            assignments.push("category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }
        if let Some(deadline) = &patch.deadline {
            assignments.push("deadline = ?");
            bind_values.push(option_text(deadline.map(date_to_db).as_deref()));
        }
        if let Some(lor_deadline) = &patch.lor_deadline {
            assignments.push("lor_deadline = ?");
            bind_values.push(option_text(lor_deadline.map(date_to_db).as_deref()));
        }
        if let Some(notes) = &patch.notes {
            assignments.push("notes = ?");
            bind_values.push(option_text(notes.as_deref()));
        }

        let mut sql = String::from("UPDATE universities SET ");
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
                entity: "university",
                id,
            });
        }

        self.get_existing(user_id, id)
    }

    fn delete(&self, user_id: UserId, id: UniversityId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM universities WHERE id = ?1 AND user_id = ?2;",
            [id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "university",
                id,
            });
        }

        Ok(())
    }
}

pub(crate) fn option_text(value: Option<&str>) -> Value {
    match value {
        Some(text) => Value::Text(text.to_string()),
        None => Value::Null,
    }
}

fn parse_university_row(row: &Row<'_>) -> RepoResult<University> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    let status_text: String = row.get("status")?;
    let status = UniversityStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in universities.status"
        ))
    })?;

    let category_text: String = row.get("category")?;
    let category = UniversityCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in universities.category"
        ))
    })?;

    let deadline = row
        .get::<_, Option<String>>("deadline")?
        .map(|value| parse_date(&value, "universities.deadline"))
        .transpose()?;
    let lor_deadline = row
        .get::<_, Option<String>>("lor_deadline")?
        .map(|value| parse_date(&value, "universities.lor_deadline"))
        .transpose()?;

    Ok(University {
        id: parse_uuid(&id_text, "universities.id")?,
        user_id: parse_uuid(&user_text, "universities.user_id")?,
        name: row.get("name")?,
        url: row.get("url")?,
        status,
        category,
        deadline,
        lor_deadline,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
