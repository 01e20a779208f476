//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD over the `documents` table.
//! - Expose the latest-version lookup used by "auto" versioning.

use crate::model::document::{Document, DocumentId, DocumentPatch, DocumentType, NewDocument};
use crate::model::user::UserId;
use crate::repo::university_repo::option_text;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    type,
    version,
    file_url,
    content,
    created_at,
    updated_at
FROM documents";

/// Equality filters for document list queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentListFilter {
    pub doc_type: Option<DocumentType>,
}

/// Repository interface for document CRUD operations.
pub trait DocumentRepository {
    fn create(&self, user_id: UserId, new: &NewDocument) -> RepoResult<Document>;
    fn get(&self, user_id: UserId, id: DocumentId) -> RepoResult<Option<Document>>;
    fn list(&self, user_id: UserId, filter: &DocumentListFilter) -> RepoResult<Vec<Document>>;
    fn update(&self, user_id: UserId, id: DocumentId, patch: &DocumentPatch)
        -> RepoResult<Document>;
    fn delete(&self, user_id: UserId, id: DocumentId) -> RepoResult<()>;
    /// Version label of the most recently created document with the same
    /// user, type, and name. `None` when no such document exists.
    fn latest_version_label(
        &self,
        user_id: UserId,
        doc_type: DocumentType,
        name: &str,
    ) -> RepoResult<Option<String>>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_existing(&self, user_id: UserId, id: DocumentId) -> RepoResult<Document> {
        self.get(user_id, id)?.ok_or(RepoError::NotFound {
            entity: "document",
            id,
        })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create(&self, user_id: UserId, new: &NewDocument) -> RepoResult<Document> {
        new.validate()?;

        let id: DocumentId = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO documents (
                id, user_id, name, type, version, file_url, content
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            rusqlite::params![
                id.to_string(),
                user_id.to_string(),
                new.name.trim(),
                new.doc_type.as_str(),
                new.version.trim(),
                new.file_url.as_deref(),
                new.content.as_deref(),
            ],
        )?;

        self.get_existing(user_id, id)
    }

    fn get(&self, user_id: UserId, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query([id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, user_id: UserId, filter: &DocumentListFilter) -> RepoResult<Vec<Document>> {
        let mut sql = format!("{DOCUMENT_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(doc_type) = filter.doc_type {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(doc_type.as_str().to_string()));
        }

        sql.push_str(" ORDER BY type ASC, created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }

        Ok(documents)
    }

    fn update(
        &self,
        user_id: UserId,
        id: DocumentId,
        patch: &DocumentPatch,
    ) -> RepoResult<Document> {
        patch.validate()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = patch.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.trim().to_string()));
        }
        if let Some(doc_type) = patch.doc_type {
            assignments.push("type = ?");
            bind_values.push(Value::Text(doc_type.as_str().to_string()));
        }
        if let Some(version) = patch.version.as_deref() {
            assignments.push("version = ?");
            bind_values.push(Value::Text(version.trim().to_string()));
        }
        if let Some(file_url) = &patch.file_url {
            assignments.push("file_url = ?");
            bind_values.push(option_text(file_url.as_deref()));
        }
        if let Some(content) = &patch.content {
            assignments.push("content = ?");
            bind_values.push(option_text(content.as_deref()));
        }

        let mut sql = String::from("UPDATE documents SET ");
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
                entity: "document",
                id,
            });
        }

        self.get_existing(user_id, id)
    }

    fn delete(&self, user_id: UserId, id: DocumentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE id = ?1 AND user_id = ?2;",
            [id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "document",
                id,
            });
        }

        Ok(())
    }

    fn latest_version_label(
        &self,
        user_id: UserId,
        doc_type: DocumentType,
        name: &str,
    ) -> RepoResult<Option<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT version
             FROM documents
             WHERE user_id = ?1
               AND type = ?2
               AND name = ?3
             ORDER BY created_at DESC, id ASC
             LIMIT 1;",
        )?;

        let mut rows = stmt.query(rusqlite::params![
            user_id.to_string(),
            doc_type.as_str(),
            name
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }

        Ok(None)
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    let type_text: String = row.get("type")?;
    let doc_type = DocumentType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid type `{type_text}` in documents.type"))
    })?;

    Ok(Document {
        id: parse_uuid(&id_text, "documents.id")?,
        user_id: parse_uuid(&user_text, "documents.user_id")?,
        name: row.get("name")?,
        doc_type,
        version: row.get("version")?,
        file_url: row.get("file_url")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
