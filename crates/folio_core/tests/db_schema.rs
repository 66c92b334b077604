use folio_core::db::migrations::latest_version;
use folio_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::{ffi, Connection, ErrorCode};

const DOCUMENTS_V1_SQL: &str = include_str!("../src/db/migrations/0001_documents.sql");

#[test]
fn version_one_store_upgrades_and_keeps_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.db");

    let legacy = Connection::open(&path).unwrap();
    legacy.execute_batch(DOCUMENTS_V1_SQL).unwrap();
    legacy
        .execute_batch(
            "PRAGMA user_version = 1;
             INSERT INTO documents (uuid, kind, title, body, created_at, updated_at)
             VALUES ('doc-1', 'post', 'Kept', 'body', 1, 1);",
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let title: String = conn
        .query_row("SELECT title FROM documents WHERE uuid = 'doc-1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(title, "Kept");
    insert_quiz(&conn, "post", "doc-1").unwrap();
}

#[test]
fn newer_schema_version_is_rejected_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn document_kind_outside_post_and_note_fails_check() {
    let conn = open_db_in_memory().unwrap();

    let err = insert_document(&conn, "doc-1", "page").unwrap_err();
    assert_constraint(&err, ffi::SQLITE_CONSTRAINT_CHECK);
}

#[test]
fn second_quiz_for_same_document_and_kind_fails_unique() {
    let conn = open_db_in_memory().unwrap();
    insert_document(&conn, "doc-1", "post").unwrap();
    insert_quiz(&conn, "post", "doc-1").unwrap();

    let err = insert_quiz(&conn, "post", "doc-1").unwrap_err();
    assert_constraint(&err, ffi::SQLITE_CONSTRAINT_UNIQUE);
}

#[test]
fn quiz_for_missing_document_fails_foreign_key() {
    let conn = open_db_in_memory().unwrap();

    let err = insert_quiz(&conn, "note", "missing").unwrap_err();
    assert_constraint(&err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY);
}

#[test]
fn negative_answer_index_fails_check() {
    let conn = open_db_in_memory().unwrap();
    insert_document(&conn, "doc-1", "note").unwrap();
    let quiz_id = insert_quiz(&conn, "note", "doc-1").unwrap();

    let err = insert_question(&conn, quiz_id, 0, -1).unwrap_err();
    assert_constraint(&err, ffi::SQLITE_CONSTRAINT_CHECK);
    insert_question(&conn, quiz_id, 0, 0).unwrap();
}

#[test]
fn question_positions_are_unique_per_quiz() {
    let conn = open_db_in_memory().unwrap();
    insert_document(&conn, "doc-1", "post").unwrap();
    let quiz_id = insert_quiz(&conn, "post", "doc-1").unwrap();
    insert_question(&conn, quiz_id, 0, 1).unwrap();

    let err = insert_question(&conn, quiz_id, 0, 1).unwrap_err();
    assert_constraint(&err, ffi::SQLITE_CONSTRAINT_UNIQUE);
}

#[test]
fn deleting_document_cascades_to_links_quizzes_and_questions() {
    let conn = open_db_in_memory().unwrap();
    insert_document(&conn, "doc-1", "post").unwrap();
    conn.execute_batch(
        "INSERT INTO categories (name, slug) VALUES ('Django', 'django');
         INSERT INTO document_categories (document_uuid, category_id)
         SELECT 'doc-1', id FROM categories WHERE slug = 'django';",
    )
    .unwrap();
    let quiz_id = insert_quiz(&conn, "post", "doc-1").unwrap();
    insert_question(&conn, quiz_id, 0, 0).unwrap();

    conn.execute("DELETE FROM documents WHERE uuid = 'doc-1';", [])
        .unwrap();

    assert_eq!(row_count(&conn, "document_categories"), 0);
    assert_eq!(row_count(&conn, "quizzes"), 0);
    assert_eq!(row_count(&conn, "quiz_questions"), 0);
    assert_eq!(row_count(&conn, "categories"), 1);
}

fn insert_document(conn: &Connection, uuid: &str, kind: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO documents (uuid, kind, title, body, created_at, updated_at)
         VALUES (?1, ?2, 'Title', 'Body', 1, 1);",
        [uuid, kind],
    )
}

fn insert_quiz(conn: &Connection, kind: &str, document_uuid: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO quizzes (kind, document_uuid, title) VALUES (?1, ?2, 'Quiz');",
        [kind, document_uuid],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_question(
    conn: &Connection,
    quiz_id: i64,
    position: i64,
    answer_index: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO quiz_questions (quiz_id, position, prompt, choices, answer_index)
         VALUES (?1, ?2, 'Prompt?', '[\"a\",\"b\"]', ?3);",
        [quiz_id, position, answer_index],
    )
}

fn assert_constraint(err: &rusqlite::Error, extended_code: i32) {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => {
            assert_eq!(inner.code, ErrorCode::ConstraintViolation);
            assert_eq!(inner.extended_code, extended_code);
        }
        other => panic!("expected constraint failure, got {other}"),
    }
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}
