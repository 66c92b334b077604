//! Folio operator CLI.
//!
//! # Responsibility
//! - Bulk quiz backfill and document import against one SQLite store.
//! - Inspect related links, timelines, recent items and title search.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use folio_core::{
    default_log_level, init_logging, init_stderr_logging, open_db, DiscoveryService,
    DocumentService, FolioConfig, LinkItem, NewDocument, QuizService, RngShuffle,
    SqliteDocumentRepository, SqliteQuizRepository,
};
use log::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => FolioConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => FolioConfig::default(),
    };
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let documents = SqliteDocumentRepository::try_new(&conn)?;
    let quizzes = SqliteQuizRepository::try_new(&conn)?;
    let rng = match cli.seed {
        Some(seed) => RngShuffle::seeded(seed),
        None => RngShuffle::from_entropy(),
    };

    match cli.command {
        Command::BackfillQuizzes { force } => {
            let mut service = QuizService::with_generator(
                documents,
                quizzes,
                config.quiz_generator()?,
                rng,
            );
            let report = service.backfill(force)?;
            println!(
                "quizzes_created={} quizzes_updated={} questions_deleted={} questions_created={}",
                report.quizzes_created,
                report.quizzes_updated,
                report.questions_deleted,
                report.questions_created
            );
        }
        Command::Related { kind, id } => {
            let service = DiscoveryService::from_config(documents, quizzes, &config)?;
            let view = service.detail(kind, id)?;
            print_links(&view.related);
        }
        Command::Timeline { kind, id } => {
            let service = DiscoveryService::from_config(documents, quizzes, &config)?;
            let view = service.detail(kind, id)?;
            print_links(&view.timeline);
        }
        Command::Recent => {
            let service = DiscoveryService::from_config(documents, quizzes, &config)?;
            print_links(&service.recent_items()?);
        }
        Command::Search { query } => {
            let service = DiscoveryService::from_config(documents, quizzes, &config)?;
            let results = service.search(&query)?;
            print_links(&results.posts);
            print_links(&results.notes);
        }
        Command::Import {
            kind,
            title,
            body_file,
            categories,
        } => {
            let body = std::fs::read_to_string(&body_file)
                .with_context(|| format!("failed to read `{}`", body_file.display()))?;
            let quiz_service = QuizService::with_generator(
                documents,
                quizzes,
                config.quiz_generator()?,
                rng,
            );
            let mut service = DocumentService::with_quiz_service(documents, quiz_service);
            let created = service
                .create_document(NewDocument::now(kind, title, body).with_categories(categories))?;
            println!(
                "{}\t{}\tquestions={}",
                created.document.kind, created.document.id, created.quiz.questions_created
            );
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn init_cli_logging(cli: &Cli) -> Result<()> {
    match &cli.log_dir {
        Some(dir) => {
            let level = cli.log_level.as_deref().unwrap_or(default_log_level());
            init_logging(level, dir)?;
        }
        None => init_stderr_logging(cli.log_level.as_deref().unwrap_or("warn"))?,
    }
    Ok(())
}

fn print_links(items: &[LinkItem]) {
    for item in items {
        println!("{}\t{}\t{}\t{}", item.timestamp, item.kind, item.title, item.url);
    }
}
