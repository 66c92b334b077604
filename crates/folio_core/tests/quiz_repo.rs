use folio_core::db::open_db_in_memory;
use folio_core::{
    Document, DocumentKind, DocumentRepository, QuestionWrite, QuizQuestion, QuizRepository,
    QuizValidationError, RepoError, SqliteDocumentRepository, SqliteQuizRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_document(conn: &Connection, kind: DocumentKind, title: &str) -> Document {
    let repo = SqliteDocumentRepository::try_new(conn).unwrap();
    let document = Document::new(kind, title, "body", 1_000);
    repo.create_document(&document, &[]).unwrap();
    document
}

fn stored_questions(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM quiz_questions;", [], |row| row.get(0))
        .unwrap()
}

fn question(prompt: &str, choices: &[&str], answer_index: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        choices: choices.iter().map(|choice| choice.to_string()).collect(),
        answer_index,
    }
}

#[test]
fn get_or_create_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Post, "Ownership");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();

    let (first, created) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();
    assert!(created);
    assert_eq!(first.title, "Ownership");
    assert!(first.questions.is_empty());

    let (second, created_again) = repo
        .get_or_create_quiz(document.kind, document.id, "Other title")
        .unwrap();
    assert!(!created_again);
    assert_eq!(second.id, first.id);
    assert_eq!(second.title, "Ownership");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM quizzes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn get_or_create_for_missing_document_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.get_or_create_quiz(DocumentKind::Note, missing, "ghost"),
        Err(RepoError::NotFound(id)) if id == missing
    ));
}

#[test]
fn forced_replace_swaps_whole_set_in_order() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Note, "Borrowing");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();

    let first = question("q1", &["a", "b"], 0);
    let second = question("q2", &["c", "d", "e"], 2);
    let write = repo
        .replace_questions(quiz.id, &[first.clone(), second.clone()], false)
        .unwrap();
    assert_eq!(
        write,
        QuestionWrite {
            deleted: 0,
            inserted: 2,
            skipped: false
        }
    );
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.questions, vec![first, second.clone()]);
    assert_eq!(loaded.questions[1].answer(), "e");

    let third = question("q3", &["f", "g"], 1);
    let write = repo
        .replace_questions(quiz.id, &[third.clone()], true)
        .unwrap();
    assert_eq!((write.deleted, write.inserted, write.skipped), (2, 1, false));
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.questions, vec![third]);
}

#[test]
fn unforced_replace_leaves_filled_quiz_alone() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Post, "Slices");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();
    let kept = question("kept", &["a", "b"], 0);
    repo.replace_questions(quiz.id, &[kept.clone()], false)
        .unwrap();

    let write = repo
        .replace_questions(quiz.id, &[question("late", &["c", "d"], 1)], false)
        .unwrap();
    assert!(write.skipped);
    assert_eq!((write.deleted, write.inserted), (0, 0));
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.questions, vec![kept]);
}

#[test]
fn invalid_question_is_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Post, "Traits");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();
    repo.replace_questions(quiz.id, &[question("old", &["a", "b"], 0)], false)
        .unwrap();

    let batch = [
        question("fine", &["a", "b"], 1),
        question("broken", &["a", "b"], 5),
    ];
    assert!(matches!(
        repo.replace_questions(quiz.id, &batch, true),
        Err(RepoError::InvalidQuestion(
            QuizValidationError::AnswerOutOfRange { .. }
        ))
    ));
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.questions, vec![question("old", &["a", "b"], 0)]);
}

#[test]
fn failed_insert_mid_replace_restores_previous_set() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Note, "Closures");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();
    let old = [question("o1", &["a", "b"], 0), question("o2", &["c", "d"], 1)];
    repo.replace_questions(quiz.id, &old, false).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_second_position BEFORE INSERT ON quiz_questions
         WHEN NEW.position = 1
         BEGIN SELECT RAISE(ABORT, 'position 1 rejected'); END;",
    )
    .unwrap();

    let fresh = [question("n1", &["e", "f"], 0), question("n2", &["g", "h"], 1)];
    assert!(matches!(
        repo.replace_questions(quiz.id, &fresh, true),
        Err(RepoError::Db(_))
    ));
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.questions, old.to_vec());
}

#[test]
fn update_title_follows_document() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Post, "Old");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();

    repo.update_quiz_title(quiz.id, "New").unwrap();
    let loaded = repo
        .find_quiz(document.kind, document.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.title, "New");
    assert!(matches!(
        repo.update_quiz_title(quiz.id + 100, "x"),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn malformed_persisted_rows_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Note, "Lifetimes");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();

    conn.execute(
        "INSERT INTO quiz_questions (quiz_id, position, prompt, choices, answer_index)
         VALUES (?1, 0, 'q', '[\"only\"]', 0);",
        [quiz.id],
    )
    .unwrap();
    assert!(matches!(
        repo.find_quiz(document.kind, document.id),
        Err(RepoError::InvalidQuestion(QuizValidationError::TooFewChoices(1)))
    ));

    conn.execute(
        "UPDATE quiz_questions SET choices = 'not json' WHERE quiz_id = ?1;",
        [quiz.id],
    )
    .unwrap();
    assert!(matches!(
        repo.find_quiz(document.kind, document.id),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn deleting_document_cascades_to_quiz() {
    let conn = open_db_in_memory().unwrap();
    let document = seed_document(&conn, DocumentKind::Post, "Cascade");
    let repo = SqliteQuizRepository::try_new(&conn).unwrap();
    let (quiz, _) = repo
        .get_or_create_quiz(document.kind, document.id, &document.title)
        .unwrap();
    repo.replace_questions(quiz.id, &[question("q", &["a", "b"], 0)], false)
        .unwrap();

    conn.execute(
        "DELETE FROM documents WHERE uuid = ?1;",
        [document.id.to_string()],
    )
    .unwrap();

    assert!(repo.find_quiz(document.kind, document.id).unwrap().is_none());
    assert_eq!(stored_questions(&conn), 0);
}
