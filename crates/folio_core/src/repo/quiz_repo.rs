//! Quiz repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide get-or-create for the one quiz per `(kind, document)`.
//! - Replace question sets atomically (delete, emptiness check, insert).
//!
//! # Invariants
//! - A unique-constraint conflict on quiz creation means "already exists".
//! - Questions are validated before insert and after read.
//! - Question order is preserved through `position`.

use super::{ensure_schema, RepoError, RepoResult};
use crate::model::document::{DocumentId, DocumentKind};
use crate::model::quiz::{Quiz, QuizId, QuizQuestion};
use rusqlite::ffi;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for quizzes and their questions.
pub trait QuizRepository {
    /// Returns the document's quiz, creating an empty one when absent.
    ///
    /// The flag is `true` only when this call inserted the quiz.
    fn get_or_create_quiz(
        &self,
        kind: DocumentKind,
        document_id: DocumentId,
        title: &str,
    ) -> RepoResult<(Quiz, bool)>;
    /// Loads the document's quiz with ordered questions.
    fn find_quiz(&self, kind: DocumentKind, document_id: DocumentId) -> RepoResult<Option<Quiz>>;
    /// Renames a quiz to follow its document title.
    fn update_quiz_title(&self, quiz_id: QuizId, title: &str) -> RepoResult<()>;
    /// Writes the quiz's question set in one immediate transaction.
    ///
    /// With `force`, existing questions are deleted first. Without it the
    /// write is skipped when the quiz already holds questions, so two
    /// overlapping first-time generations never stack their sets.
    fn replace_questions(
        &self,
        quiz_id: QuizId,
        questions: &[QuizQuestion],
        force: bool,
    ) -> RepoResult<QuestionWrite>;
}

/// Result of [`QuizRepository::replace_questions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionWrite {
    pub deleted: usize,
    pub inserted: usize,
    /// Set when a non-forced write found questions already stored.
    pub skipped: bool,
}

/// SQLite-backed quiz repository.
#[derive(Debug, Clone, Copy)]
pub struct SqliteQuizRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuizRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                ("quizzes", &["id", "kind", "document_uuid", "title"]),
                (
                    "quiz_questions",
                    &["quiz_id", "position", "prompt", "choices", "answer_index"],
                ),
            ],
        )?;
        Ok(Self { conn })
    }

    fn load_quiz_row(
        &self,
        kind: DocumentKind,
        document_id: DocumentId,
    ) -> RepoResult<Option<(QuizId, String)>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title FROM quizzes WHERE kind = ?1 AND document_uuid = ?2;",
                params![kind.as_str(), document_id.to_string()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    fn load_questions(&self, quiz_id: QuizId) -> RepoResult<Vec<QuizQuestion>> {
        let mut stmt = self.conn.prepare(
            "SELECT prompt, choices, answer_index
             FROM quiz_questions
             WHERE quiz_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([quiz_id])?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            let choices_text: String = row.get("choices")?;
            let choices = serde_json::from_str::<Vec<String>>(&choices_text).map_err(|err| {
                RepoError::InvalidData(format!(
                    "invalid choices json in quiz_questions.choices: {err}"
                ))
            })?;
            let answer_index = row.get::<_, i64>("answer_index")?;
            let answer_index = usize::try_from(answer_index).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid answer_index `{answer_index}` in quiz_questions.answer_index"
                ))
            })?;

            let question = QuizQuestion {
                prompt: row.get("prompt")?,
                choices,
                answer_index,
            };
            question.validate()?;
            questions.push(question);
        }
        Ok(questions)
    }
}

impl QuizRepository for SqliteQuizRepository<'_> {
    fn get_or_create_quiz(
        &self,
        kind: DocumentKind,
        document_id: DocumentId,
        title: &str,
    ) -> RepoResult<(Quiz, bool)> {
        let inserted = self.conn.execute(
            "INSERT INTO quizzes (kind, document_uuid, title) VALUES (?1, ?2, ?3);",
            params![kind.as_str(), document_id.to_string(), title],
        );
        let created = match inserted {
            Ok(_) => true,
            Err(err) if is_constraint(&err, ffi::SQLITE_CONSTRAINT_UNIQUE) => false,
            Err(err) if is_constraint(&err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                return Err(RepoError::NotFound(document_id));
            }
            Err(err) => return Err(err.into()),
        };

        let quiz = self.find_quiz(kind, document_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "quiz for {kind} {document_id} missing after get-or-create"
            ))
        })?;
        Ok((quiz, created))
    }

    fn find_quiz(&self, kind: DocumentKind, document_id: DocumentId) -> RepoResult<Option<Quiz>> {
        let Some((id, title)) = self.load_quiz_row(kind, document_id)? else {
            return Ok(None);
        };
        Ok(Some(Quiz {
            id,
            kind,
            document_id,
            title,
            questions: self.load_questions(id)?,
        }))
    }

    fn update_quiz_title(&self, quiz_id: QuizId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE quizzes
             SET title = ?2, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![quiz_id, title],
        )?;
        if changed == 0 {
            return Err(RepoError::InvalidData(format!("quiz {quiz_id} not found")));
        }
        Ok(())
    }

    fn replace_questions(
        &self,
        quiz_id: QuizId,
        questions: &[QuizQuestion],
        force: bool,
    ) -> RepoResult<QuestionWrite> {
        let rows = questions
            .iter()
            .map(encode_question)
            .collect::<RepoResult<Vec<_>>>()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existing = question_count(&tx, quiz_id)?;
        if existing > 0 && !force {
            return Ok(QuestionWrite {
                skipped: true,
                ..QuestionWrite::default()
            });
        }

        let deleted = if existing > 0 {
            tx.execute("DELETE FROM quiz_questions WHERE quiz_id = ?1;", [quiz_id])?
        } else {
            0
        };
        for (position, (prompt, choices, answer_index)) in (0_i64..).zip(&rows) {
            tx.execute(
                "INSERT INTO quiz_questions (quiz_id, position, prompt, choices, answer_index)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![quiz_id, position, prompt, choices, answer_index],
            )?;
        }
        tx.execute(
            "UPDATE quizzes SET updated_at = (strftime('%s', 'now') * 1000) WHERE id = ?1;",
            [quiz_id],
        )?;
        tx.commit()?;

        Ok(QuestionWrite {
            deleted,
            inserted: rows.len(),
            skipped: false,
        })
    }
}

/// Validates one question and converts it to its column values.
fn encode_question(question: &QuizQuestion) -> RepoResult<(&str, String, i64)> {
    question.validate()?;
    let choices = serde_json::to_string(&question.choices)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode quiz choices: {err}")))?;
    let answer_index = i64::try_from(question.answer_index).map_err(|_| {
        RepoError::InvalidData(format!(
            "answer_index {} does not fit storage",
            question.answer_index
        ))
    })?;
    Ok((question.prompt.as_str(), choices, answer_index))
}

fn question_count(conn: &Connection, quiz_id: QuizId) -> RepoResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM quiz_questions WHERE quiz_id = ?1;",
        [quiz_id],
        |row| row.get(0),
    )?;
    usize::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative question count {count}")))
}

fn is_constraint(err: &rusqlite::Error, extended_code: i32) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == extended_code
    )
}
