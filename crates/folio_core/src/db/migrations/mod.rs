//! Content-store schema migrations.
//!
//! Each step is a named SQL script. Steps run in one transaction and the
//! reached version is written to `PRAGMA user_version`, so a failing step
//! leaves the store at its previous version.
//!
//! | version | name        | tables                                         |
//! |---------|-------------|------------------------------------------------|
//! | 1       | `documents` | `documents`, `categories`, `document_categories` |
//! | 2       | `quizzes`   | `quizzes`, `quiz_questions`                    |

use crate::db::{schema_version, DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::time::Instant;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "documents",
        sql: include_str!("0001_documents.sql"),
    },
    SchemaStep {
        version: 2,
        name: "quizzes",
        sql: include_str!("0002_quizzes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the store was written by a
///   newer build.
/// - [`DbError::Migration`] naming the step whose script failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let started_at = Instant::now();
    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=done from={from} to={latest} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(())
}
