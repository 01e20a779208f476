//! User repository.
//!
//! Minimal surface: user rows exist to anchor ownership scoping; credential
//! handling lives in the external auth collaborator.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{Connection, Row};
use uuid::Uuid;

/// Repository interface for user rows.
pub trait UserRepository {
    fn create(&self, new: &NewUser) -> RepoResult<User>;
    fn get(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create(&self, new: &NewUser) -> RepoResult<User> {
        new.validate()?;

        let id: UserId = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO users (id, email, name) VALUES (?1, ?2, ?3);",
            rusqlite::params![id.to_string(), new.email.trim(), new.name.as_deref()],
        )?;

        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "user",
            id,
        })
    }

    fn get(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, name, created_at
             FROM users
             WHERE id = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
