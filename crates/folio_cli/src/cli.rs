use clap::{Parser, Subcommand};
use folio_core::DocumentKind;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "folio", about = "Related content, category timelines and quizzes over a Folio store")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "FOLIO_DB", default_value = "folio.sqlite3")]
    pub db: PathBuf,

    /// JSON configuration file
    #[arg(long, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when omitted
    #[arg(long, env = "FOLIO_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Seed for quiz option shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create missing quizzes, or regenerate all of them with --force
    BackfillQuizzes {
        /// Delete and regenerate questions of existing quizzes
        #[arg(long)]
        force: bool,
    },
    /// Print related links of one document
    Related {
        #[arg(value_parser = parse_kind)]
        kind: DocumentKind,
        id: Uuid,
    },
    /// Print the category timeline of one document
    Timeline {
        #[arg(value_parser = parse_kind)]
        kind: DocumentKind,
        id: Uuid,
    },
    /// Print the newest documents across both kinds
    Recent,
    /// Search titles of both kinds
    Search { query: String },
    /// Import one document from a text file
    Import {
        #[arg(value_parser = parse_kind)]
        kind: DocumentKind,
        title: String,
        body_file: PathBuf,
        /// Category name (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

fn parse_kind(value: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(value).ok_or_else(|| format!("unknown kind `{value}`; expected post|note"))
}
