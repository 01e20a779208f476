//! Document use-case service.
//!
//! # Responsibility
//! - Provide document CRUD on top of the repository.
//! - Resolve the `auto` version label against the latest stored version.
//! - Derive the by-type grouping returned alongside every document list.

use crate::model::document::{
    Document, DocumentId, DocumentPatch, NewDocument, AUTO_VERSION,
};
use crate::model::user::UserId;
use crate::repo::document_repo::{DocumentListFilter, DocumentRepository};
use crate::repo::RepoResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// List envelope: the flat filtered list plus a by-type grouping keyed by
/// the canonical type name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResult {
    pub documents: Vec<Document>,
    pub grouped_documents: BTreeMap<String, Vec<Document>>,
}

/// Document service facade over repository implementations.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a document. A version of `auto` is replaced with the successor
    /// of the latest stored version for the same user, type, and name.
    pub fn create_document(&self, user_id: UserId, new: &NewDocument) -> RepoResult<Document> {
        if new.version.trim() == AUTO_VERSION {
            let latest = self
                .repo
                .latest_version_label(user_id, new.doc_type, new.name.trim())?;
            let mut resolved = new.clone();
            resolved.version = next_version_label(latest.as_deref());
            return self.repo.create(user_id, &resolved);
        }

        self.repo.create(user_id, new)
    }

    pub fn get_document(&self, user_id: UserId, id: DocumentId) -> RepoResult<Option<Document>> {
        self.repo.get(user_id, id)
    }

    /// Lists documents grouped by type, newest first within each type.
    pub fn list_documents(
        &self,
        user_id: UserId,
        filter: &DocumentListFilter,
    ) -> RepoResult<DocumentListResult> {
        let documents = self.repo.list(user_id, filter)?;
        let grouped_documents = group_by_type(&documents);
        Ok(DocumentListResult {
            documents,
            grouped_documents,
        })
    }

    pub fn update_document(
        &self,
        user_id: UserId,
        id: DocumentId,
        patch: &DocumentPatch,
    ) -> RepoResult<Document> {
        self.repo.update(user_id, id, patch)
    }

    pub fn delete_document(&self, user_id: UserId, id: DocumentId) -> RepoResult<()> {
        self.repo.delete(user_id, id)
    }
}

/// Successor label for auto-versioning.
///
/// The numeric part of the latest label is extracted by keeping its digits;
/// labels with no usable number count as version 1. No prior document yields
/// `v1`.
pub fn next_version_label(latest: Option<&str>) -> String {
    let Some(latest) = latest else {
        return "v1".to_string();
    };

    let digits: String = latest.chars().filter(char::is_ascii_digit).collect();
    let current = digits
        .parse::<u32>()
        .ok()
        .filter(|value| *value != 0)
        .unwrap_or(1);
    format!("v{}", current + 1)
}

/// Groups documents by canonical type name, preserving input order.
pub fn group_by_type(documents: &[Document]) -> BTreeMap<String, Vec<Document>> {
    let mut grouped: BTreeMap<String, Vec<Document>> = BTreeMap::new();
    for document in documents {
        grouped
            .entry(document.doc_type.as_str().to_string())
            .or_default()
            .push(document.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::next_version_label;

    #[test]
    fn first_version_is_v1() {
        assert_eq!(next_version_label(None), "v1");
    }

    #[test]
    fn numeric_labels_increment() {
        assert_eq!(next_version_label(Some("v2")), "v3");
        assert_eq!(next_version_label(Some("draft 4")), "v5");
    }

    #[test]
    fn labels_without_a_number_count_as_one() {
        assert_eq!(next_version_label(Some("final")), "v2");
        assert_eq!(next_version_label(Some("v0")), "v2");
    }
}
