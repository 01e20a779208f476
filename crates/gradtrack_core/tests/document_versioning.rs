use gradtrack_core::model::document::{DocumentType, NewDocument, AUTO_VERSION};
use gradtrack_core::model::user::{NewUser, UserId};
use gradtrack_core::open_db_in_memory;
use gradtrack_core::repo::document_repo::{DocumentListFilter, SqliteDocumentRepository};
use gradtrack_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gradtrack_core::service::document_service::DocumentService;
use gradtrack_core::RepoError;
use rusqlite::Connection;

fn setup() -> (Connection, UserId) {
    let conn = open_db_in_memory().unwrap();
    let user = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "applicant@example.com".to_string(),
            name: None,
        })
        .unwrap();
    (conn, user.id)
}

fn auto_versioned(name: &str) -> NewDocument {
    let mut new = NewDocument::new(name, DocumentType::Sop);
    new.version = AUTO_VERSION.to_string();
    new
}

#[test]
fn create_defaults_version_to_one() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let created = service
        .create_document(user_id, &NewDocument::new("SOP", DocumentType::Sop))
        .unwrap();
    assert_eq!(created.version, "1");
}

#[test]
fn auto_version_starts_at_v1_without_prior_documents() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let created = service
        .create_document(user_id, &auto_versioned("SOP"))
        .unwrap();
    assert_eq!(created.version, "v1");
}

#[test]
fn auto_version_increments_the_latest_numeric_label() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let mut seeded = NewDocument::new("SOP", DocumentType::Sop);
    seeded.version = "v2".to_string();
    service.create_document(user_id, &seeded).unwrap();

    // Nudge created_at so the v2 row is unambiguously the latest.
    conn.execute("UPDATE documents SET created_at = created_at - 1000;", [])
        .unwrap();

    let created = service
        .create_document(user_id, &auto_versioned("SOP"))
        .unwrap();
    assert_eq!(created.version, "v3");
}

#[test]
fn auto_version_treats_non_numeric_labels_as_one() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let mut seeded = NewDocument::new("SOP", DocumentType::Sop);
    seeded.version = "final".to_string();
    service.create_document(user_id, &seeded).unwrap();

    let created = service
        .create_document(user_id, &auto_versioned("SOP"))
        .unwrap();
    assert_eq!(created.version, "v2");
}

#[test]
fn auto_version_scopes_to_same_type_and_name() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let mut other_name = NewDocument::new("Other essay", DocumentType::Sop);
    other_name.version = "v7".to_string();
    service.create_document(user_id, &other_name).unwrap();

    let mut other_type = NewDocument::new("SOP", DocumentType::Cv);
    other_type.version = "v9".to_string();
    service.create_document(user_id, &other_type).unwrap();

    let created = service
        .create_document(user_id, &auto_versioned("SOP"))
        .unwrap();
    assert_eq!(created.version, "v1");
}

#[test]
fn list_groups_documents_by_type() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    service
        .create_document(user_id, &NewDocument::new("SOP", DocumentType::Sop))
        .unwrap();
    service
        .create_document(user_id, &NewDocument::new("Resume", DocumentType::Resume))
        .unwrap();
    service
        .create_document(user_id, &NewDocument::new("SOP v2", DocumentType::Sop))
        .unwrap();

    let result = service
        .list_documents(user_id, &DocumentListFilter::default())
        .unwrap();

    assert_eq!(result.documents.len(), 3);
    assert_eq!(result.grouped_documents["SOP"].len(), 2);
    assert_eq!(result.grouped_documents["RESUME"].len(), 1);
}

#[test]
fn create_rejects_oversized_content() {
    let (conn, user_id) = setup();
    let service = DocumentService::new(SqliteDocumentRepository::new(&conn));

    let mut new = NewDocument::new("SOP", DocumentType::Sop);
    new.content = Some("x".repeat(50_001));

    let err = service.create_document(user_id, &new).unwrap_err();
    match err {
        RepoError::Validation(validation) => assert!(validation.has_field("content")),
        other => panic!("unexpected error: {other}"),
    }
}
