//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD over the `tasks` table.
//! - Own the `completed_at` transition rule on write paths.
//!
//! # Invariants
//! - `completed_at` is set exactly when status transitions into `Completed`
//!   and cleared whenever status leaves it.
//! - A supplied `university_id` must belong to the same user.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
use crate::model::university::UniversityId;
use crate::model::user::UserId;
use crate::repo::university_repo::option_text;
use crate::repo::{
    date_to_db, ensure_university_owned, parse_date, parse_uuid, RepoError, RepoResult,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    status,
    priority,
    due_date,
    completed_at,
    university_id,
    created_at,
    updated_at
FROM tasks";

// Urgent first, then earliest due date (missing dates last), newest created.
const TASK_ORDER_SQL: &str = " ORDER BY
    CASE priority
        WHEN 'URGENT' THEN 0
        WHEN 'HIGH' THEN 1
        WHEN 'MEDIUM' THEN 2
        ELSE 3
    END ASC,
    due_date IS NULL ASC,
    due_date ASC,
    created_at DESC,
    id ASC";

/// Equality filters for task list queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub university_id: Option<UniversityId>,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create(&self, user_id: UserId, new: &NewTask) -> RepoResult<Task>;
    fn get(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>>;
    fn list(&self, user_id: UserId, filter: &TaskListFilter) -> RepoResult<Vec<Task>>;
    fn update(&self, user_id: UserId, id: TaskId, patch: &TaskPatch) -> RepoResult<Task>;
    fn delete(&self, user_id: UserId, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_existing(&self, user_id: UserId, id: TaskId) -> RepoResult<Task> {
        self.get(user_id, id)?.ok_or(RepoError::NotFound {
            entity: "task",
            id,
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, user_id: UserId, new: &NewTask) -> RepoResult<Task> {
        new.validate()?;

        if let Some(university_id) = new.university_id {
            ensure_university_owned(self.conn, user_id, university_id, "universityId")?;
        }

        // Tasks created directly in Completed still satisfy the iff-invariant.
        let completed_at = (new.status == TaskStatus::Completed)
            .then(|| Utc::now().timestamp_millis());

        let id: TaskId = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (
                id, user_id, title, description, status, priority, due_date,
                completed_at, university_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            rusqlite::params![
                id.to_string(),
                user_id.to_string(),
                new.title.trim(),
                new.description.as_deref(),
                new.status.as_str(),
                new.priority.as_str(),
                new.due_date.map(date_to_db),
                completed_at,
                new.university_id.map(|value| value.to_string()),
            ],
        )?;

        self.get_existing(user_id, id)
    }

    fn get(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query([id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, user_id: UserId, filter: &TaskListFilter) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(university_id) = filter.university_id {
            sql.push_str(" AND university_id = ?");
            bind_values.push(Value::Text(university_id.to_string()));
        }

        sql.push_str(TASK_ORDER_SQL);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn update(&self, user_id: UserId, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        patch.validate()?;

        let existing = self.get_existing(user_id, id)?;

        if let Some(Some(university_id)) = patch.university_id {
            ensure_university_owned(self.conn, user_id, university_id, "universityId")?;
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_deref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.trim().to_string()));
        }
        if let Some(description) = &patch.description {
            assignments.push("description = ?");
            bind_values.push(option_text(description.as_deref()));
        }
        if let Some(status) = patch.status {
            assignments.push("status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));

            if status == TaskStatus::Completed {
                if existing.status != TaskStatus::Completed {
                    assignments.push("completed_at = ?");
                    bind_values.push(Value::Integer(Utc::now().timestamp_millis()));
                }
            } else {
                assignments.push("completed_at = NULL");
            }
        }
        if let Some(priority) = patch.priority {
            assignments.push("priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ?");
            bind_values.push(option_text(due_date.map(date_to_db).as_deref()));
        }
        if let Some(university_id) = &patch.university_id {
            assignments.push("university_id = ?");
            bind_values.push(option_text(
                university_id.map(|value| value.to_string()).as_deref(),
            ));
        }

        let mut sql = String::from("UPDATE tasks SET ");
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
                entity: "task",
                id,
            });
        }

        self.get_existing(user_id, id)
    }

    fn delete(&self, user_id: UserId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2;",
            [id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id,
            });
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let due_date = row
        .get::<_, Option<String>>("due_date")?
        .map(|value| parse_date(&value, "tasks.due_date"))
        .transpose()?;

    let university_id = row
        .get::<_, Option<String>>("university_id")?
        .map(|value| parse_uuid(&value, "tasks.university_id"))
        .transpose()?;

    let completed_at: Option<i64> = row.get("completed_at")?;
    if completed_at.is_some() != (status == TaskStatus::Completed) {
        return Err(RepoError::InvalidData(format!(
            "tasks.completed_at disagrees with status `{status_text}`"
        )));
    }

    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        user_id: parse_uuid(&user_text, "tasks.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        due_date,
        completed_at,
        university_id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
