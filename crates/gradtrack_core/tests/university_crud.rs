use gradtrack_core::model::university::{
    NewUniversity, UniversityCategory, UniversityPatch, UniversityStatus,
};
use gradtrack_core::model::user::{NewUser, UserId};
use gradtrack_core::open_db_in_memory;
use gradtrack_core::repo::university_repo::{SqliteUniversityRepository, UniversityListFilter};
use gradtrack_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use gradtrack_core::service::university_service::UniversityService;
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

#[test]
fn create_applies_defaults_and_trims_name() {
    let (conn, user_id) = setup();
    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));

    let created = service
        .create_university(
            user_id,
            &NewUniversity::new("  Stanford  ", UniversityCategory::Reach),
        )
        .unwrap();

    assert_eq!(created.name, "Stanford");
    assert_eq!(created.status, UniversityStatus::Researching);
    assert_eq!(created.created_at, created.updated_at);
}

#[test]
fn create_rejects_invalid_fields_with_violation_list() {
    let (conn, user_id) = setup();
    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));

    let mut new = NewUniversity::new("", UniversityCategory::Target);
    new.url = Some("not-a-url".to_string());

    let err = service.create_university(user_id, &new).unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert!(validation.has_field("name"));
            assert!(validation.has_field("url"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn list_filters_by_status_and_category() {
    let (conn, user_id) = setup();
    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));

    let mut applied = NewUniversity::new("A", UniversityCategory::Reach);
    applied.status = UniversityStatus::Applied;
    service.create_university(user_id, &applied).unwrap();
    service
        .create_university(user_id, &NewUniversity::new("B", UniversityCategory::Safety))
        .unwrap();

    let filter = UniversityListFilter {
        status: Some(UniversityStatus::Applied),
        category: Some(UniversityCategory::Reach),
    };
    let listed = service.list_universities(user_id, &filter).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "A");
}

#[test]
fn update_patches_fields_and_clears_nullables() {
    let (conn, user_id) = setup();
    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));

    let mut new = NewUniversity::new("CMU", UniversityCategory::Target);
    new.notes = Some("visit campus".to_string());
    let created = service.create_university(user_id, &new).unwrap();

    let patch = UniversityPatch {
        status: Some(UniversityStatus::Admitted),
        notes: Some(None),
        deadline: Some(Some("2026-12-01".parse().unwrap())),
        ..UniversityPatch::default()
    };
    let updated = service
        .update_university(user_id, created.id, &patch)
        .unwrap();

    assert_eq!(updated.status, UniversityStatus::Admitted);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.deadline, Some("2026-12-01".parse().unwrap()));
    assert_eq!(updated.name, "CMU");
}

#[test]
fn cross_user_access_is_not_found() {
    let (conn, owner) = setup();
    let stranger = SqliteUserRepository::new(&conn)
        .create(&NewUser {
            email: "other@example.com".to_string(),
            name: None,
        })
        .unwrap();

    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));
    let created = service
        .create_university(owner, &NewUniversity::new("MIT", UniversityCategory::Reach))
        .unwrap();

    assert!(service.get_university(stranger.id, created.id).unwrap().is_none());

    let err = service
        .delete_university(stranger.id, created.id)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));

    // Owner still sees the row.
    assert!(service.get_university(owner, created.id).unwrap().is_some());
}

#[test]
fn delete_removes_the_row() {
    let (conn, user_id) = setup();
    let service = UniversityService::new(SqliteUniversityRepository::new(&conn));

    let created = service
        .create_university(user_id, &NewUniversity::new("UW", UniversityCategory::Target))
        .unwrap();
    service.delete_university(user_id, created.id).unwrap();

    assert!(service.get_university(user_id, created.id).unwrap().is_none());
    let err = service.delete_university(user_id, created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}
