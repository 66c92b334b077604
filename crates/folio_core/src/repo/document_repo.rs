//! Document/category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist posts and notes with their category links.
//! - Serve the bounded, ordered snapshots consumed by discovery code.
//!
//! # Invariants
//! - Every recency ordering uses the kind's canonical timestamp column,
//!   then `uuid ASC` as a stable tiebreak.
//! - A document row and its category links are written in one transaction.
//! - Tag-filtered queries return each document once.

use super::{ensure_schema, RepoError, RepoResult};
use crate::model::document::{slugify, Category, Document, DocumentId, DocumentKind};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    documents.uuid AS uuid,
    documents.kind AS kind,
    documents.title AS title,
    documents.body AS body,
    documents.created_at AS created_at,
    documents.updated_at AS updated_at
FROM documents";

/// Recent-document filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentQuery {
    pub kind: DocumentKind,
    /// Document left out of the result, usually the focal one.
    pub exclude: Option<DocumentId>,
    pub limit: u32,
}

/// Repository interface for documents and their categories.
pub trait DocumentRepository {
    /// Inserts one document with its categories in one transaction.
    ///
    /// Category names are display names; unknown ones are created.
    fn create_document(&self, document: &Document, categories: &[String])
        -> RepoResult<DocumentId>;
    /// Replaces title, body and `updated_at` of an existing document.
    ///
    /// `Some(categories)` also replaces its categories in the same
    /// transaction; `None` keeps them.
    fn update_document(&self, document: &Document, categories: Option<&[String]>)
        -> RepoResult<()>;
    /// Gets one document with its category slugs.
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    /// Category display names of one document, sorted by name.
    fn category_names(&self, id: DocumentId) -> RepoResult<Vec<String>>;
    /// Newest documents of one kind.
    fn recent_documents(&self, query: &RecentQuery) -> RepoResult<Vec<Document>>;
    /// Documents of `kind` carrying any of `tags`, newest first, distinct.
    fn documents_sharing_tags(
        &self,
        kind: DocumentKind,
        tags: &BTreeSet<String>,
    ) -> RepoResult<Vec<Document>>;
    /// Case-insensitive title substring match, newest first.
    fn search_titles(&self, kind: DocumentKind, text: &str, limit: u32)
        -> RepoResult<Vec<Document>>;
    /// Every document of `kind`, oldest first.
    fn list_documents(&self, kind: DocumentKind) -> RepoResult<Vec<Document>>;
}

/// SQLite-backed document repository.
#[derive(Debug, Clone, Copy)]
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                (
                    "documents",
                    &["uuid", "kind", "title", "body", "created_at", "updated_at"],
                ),
                ("categories", &["id", "name", "slug"]),
                ("document_categories", &["document_uuid", "category_id"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create_document(
        &self,
        document: &Document,
        categories: &[String],
    ) -> RepoResult<DocumentId> {
        document.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO documents (uuid, kind, title, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                document.id.to_string(),
                document.kind.as_str(),
                document.title.as_str(),
                document.body.as_str(),
                document.created_at,
                document.updated_at,
            ],
        )?;
        replace_categories(&tx, &document.id.to_string(), categories)?;
        tx.commit()?;

        Ok(document.id)
    }

    fn update_document(
        &self,
        document: &Document,
        categories: Option<&[String]>,
    ) -> RepoResult<()> {
        document.validate()?;

        let id_text = document.id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE documents
             SET title = ?2, body = ?3, updated_at = ?4
             WHERE uuid = ?1 AND kind = ?5;",
            params![
                id_text.as_str(),
                document.title.as_str(),
                document.body.as_str(),
                document.updated_at,
                document.kind.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(document.id));
        }
        if let Some(categories) = categories {
            replace_categories(&tx, &id_text, categories)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_document_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn category_names(&self, id: DocumentId) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name
             FROM document_categories dc
             INNER JOIN categories c ON c.id = dc.category_id
             WHERE dc.document_uuid = ?1
             ORDER BY c.name ASC;",
        )?;
        let names = stmt
            .query_map([id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn recent_documents(&self, query: &RecentQuery) -> RepoResult<Vec<Document>> {
        let mut sql = format!("{DOCUMENT_SELECT_SQL} WHERE kind = ?");
        let mut bind_values = vec![Value::Text(query.kind.as_str().to_string())];

        if let Some(exclude) = query.exclude {
            sql.push_str(" AND uuid <> ?");
            bind_values.push(Value::Text(exclude.to_string()));
        }

        sql.push_str(&recency_order(query.kind));
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(query.limit)));

        self.query_documents(&sql, bind_values)
    }

    fn documents_sharing_tags(
        &self,
        kind: DocumentKind,
        tags: &BTreeSet<String>,
    ) -> RepoResult<Vec<Document>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let sql = format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE kind = ?
               AND EXISTS (
                    SELECT 1
                    FROM document_categories dc
                    INNER JOIN categories c ON c.id = dc.category_id
                    WHERE dc.document_uuid = documents.uuid
                      AND c.slug IN ({placeholders})
               ){}",
            recency_order(kind)
        );
        let mut bind_values = vec![Value::Text(kind.as_str().to_string())];
        bind_values.extend(tags.iter().map(|tag| Value::Text(tag.clone())));

        self.query_documents(&sql, bind_values)
    }

    fn search_titles(
        &self,
        kind: DocumentKind,
        text: &str,
        limit: u32,
    ) -> RepoResult<Vec<Document>> {
        let text = text.trim();
        if text.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE kind = ?
               AND title LIKE ? ESCAPE '\\'{} LIMIT ?",
            recency_order(kind)
        );
        let bind_values = vec![
            Value::Text(kind.as_str().to_string()),
            Value::Text(format!("%{}%", escape_like(text))),
            Value::Integer(i64::from(limit)),
        ];

        self.query_documents(&sql, bind_values)
    }

    fn list_documents(&self, kind: DocumentKind) -> RepoResult<Vec<Document>> {
        let sql = format!("{DOCUMENT_SELECT_SQL} WHERE kind = ? ORDER BY created_at ASC, uuid ASC");
        self.query_documents(&sql, vec![Value::Text(kind.as_str().to_string())])
    }
}

impl SqliteDocumentRepository<'_> {
    fn query_documents(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(self.conn, row)?);
        }
        Ok(documents)
    }
}

/// Trims names and drops blanks and repeats, keeping first-seen order.
pub fn normalize_category_names(names: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if !trimmed.is_empty() && !normalized.iter().any(|seen| seen == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

fn recency_order(kind: DocumentKind) -> String {
    let column = match kind {
        DocumentKind::Post => "created_at",
        DocumentKind::Note => "updated_at",
    };
    format!(" ORDER BY {column} DESC, uuid ASC")
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_document_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Document> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in documents.uuid"))
    })?;

    let kind_text: String = row.get("kind")?;
    let kind = DocumentKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in documents.kind"))
    })?;

    let document = Document {
        id,
        kind,
        title: row.get("title")?,
        body: row.get("body")?,
        category_tags: load_category_slugs(conn, &uuid_text)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    document.validate()?;
    Ok(document)
}

fn load_category_slugs(conn: &Connection, document_uuid: &str) -> RepoResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT c.slug
         FROM document_categories dc
         INNER JOIN categories c ON c.id = dc.category_id
         WHERE dc.document_uuid = ?1;",
    )?;
    let slugs = stmt
        .query_map([document_uuid], |row| row.get::<_, String>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(slugs)
}

/// Swaps the document's category links; runs inside the caller's transaction.
fn replace_categories(
    conn: &Connection,
    document_uuid: &str,
    names: &[String],
) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM document_categories WHERE document_uuid = ?1;",
        [document_uuid],
    )?;

    for name in normalize_category_names(names) {
        let (category_id, _) = find_or_create_category(conn, &name)?;
        conn.execute(
            "INSERT OR IGNORE INTO document_categories (document_uuid, category_id)
             VALUES (?1, ?2);",
            params![document_uuid, category_id],
        )?;
    }
    Ok(())
}

fn find_or_create_category(conn: &Connection, name: &str) -> RepoResult<(i64, Category)> {
    let existing = conn
        .query_row(
            "SELECT id, slug FROM categories WHERE name = ?1;",
            [name],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;
    if let Some((id, slug)) = existing {
        return Ok((
            id,
            Category {
                slug,
                name: name.to_string(),
            },
        ));
    }

    let slug = unique_slug(conn, &slugify(name))?;
    conn.execute(
        "INSERT INTO categories (name, slug) VALUES (?1, ?2);",
        params![name, slug.as_str()],
    )?;
    Ok((
        conn.last_insert_rowid(),
        Category {
            slug,
            name: name.to_string(),
        },
    ))
}

fn unique_slug(conn: &Connection, base: &str) -> RepoResult<String> {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    loop {
        let taken: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = ?1);",
            [candidate.as_str()],
            |row| row.get(0),
        )?;
        if taken == 0 {
            return Ok(candidate);
        }
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_like, normalize_category_names, recency_order};
    use crate::model::document::DocumentKind;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[test]
    fn category_names_are_trimmed_and_deduplicated() {
        let names = vec![
            " Backend ".to_string(),
            "".to_string(),
            "Infra".to_string(),
            "Backend".to_string(),
        ];
        assert_eq!(normalize_category_names(&names), vec!["Backend", "Infra"]);
    }

    #[test]
    fn recency_uses_canonical_column() {
        assert!(recency_order(DocumentKind::Post).contains("created_at DESC"));
        assert!(recency_order(DocumentKind::Note).contains("updated_at DESC"));
    }
}
