use gradtrack_core::db::migrations::latest_version;
use gradtrack_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "universities");
    assert_table_exists(&conn, "tasks");
    assert_table_exists(&conn, "documents");
    assert_table_exists(&conn, "deadlines");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradtrack.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "universities");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn deleting_a_university_clears_task_references() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO users (id, email) VALUES ('u1', 'a@b.c');
         INSERT INTO universities (id, user_id, name, category)
             VALUES ('uni1', 'u1', 'X', 'TARGET');
         INSERT INTO tasks (id, user_id, title, university_id)
             VALUES ('t1', 'u1', 'essay', 'uni1');
         DELETE FROM universities WHERE id = 'uni1';",
    )
    .unwrap();

    let university_id: Option<String> = conn
        .query_row(
            "SELECT university_id FROM tasks WHERE id = 't1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(university_id, None);
}

#[test]
fn deleting_a_user_cascades_to_owned_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO users (id, email) VALUES ('u1', 'a@b.c');
         INSERT INTO tasks (id, user_id, title) VALUES ('t1', 'u1', 'essay');
         INSERT INTO deadlines (id, user_id, title, type, date)
             VALUES ('d1', 'u1', 'app', 'APPLICATION', '2026-01-15');
         DELETE FROM users WHERE id = 'u1';",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM tasks) + (SELECT COUNT(*) FROM deadlines);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
