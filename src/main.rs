mod chunker;
mod config;
mod db;
mod error;
mod extract;
mod fetch;
mod links;
mod normalize;
mod pipeline;
mod translate;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::fetch::HttpFetcher;
use crate::pipeline::Ingestor;
use crate::translate::GoogleTranslator;

#[derive(Parser)]
#[command(name = "problem_ingest", about = "Translate and index algorithm problem write-ups")]
struct Cli {
    /// SQLite database path (overrides PROBLEMS_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Max characters per translation call
    #[arg(long, global = true)]
    chunk_ceiling: Option<usize>,
    /// Target language code
    #[arg(long, global = true)]
    target_lang: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the problems table
    Init,
    /// Fetch, translate, extract and store one or more problem documents
    Ingest {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Discover problem documents on an index page and ingest each
    Crawl {
        /// Repository index page, e.g. https://github.com/azl397985856/leetcode/
        index_url: String,
    },
    /// List stored problems
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Print one stored problem as JSON, by id or source URL
    Show { key: String },
    /// Check signals against a problem's prerequisites
    Validate {
        id: i64,
        #[arg(required = true)]
        signals: Vec<String>,
    },
    /// Number of stored problems
    Count,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    if let Some(n) = cli.chunk_ceiling {
        settings.chunk_ceiling = n;
    }
    if let Some(lang) = cli.target_lang {
        settings.target_lang = lang;
    }

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            println!("Schema ready at {}", settings.db_path.display());
            Ok(())
        }
        Commands::Ingest { urls } => {
            let ingestor = build_ingestor(settings)?;
            let mut stored = 0usize;
            for url in &urls {
                if ingestor.ingest(url).await {
                    stored += 1;
                }
            }
            println!("Stored {} of {} documents.", stored, urls.len());
            Ok(())
        }
        Commands::Crawl { index_url } => {
            let ingestor = build_ingestor(settings)?;
            let stats = ingestor.crawl(&index_url).await?;
            println!(
                "Done: {} candidates ({} stored, {} failed).",
                stats.total, stats.stored, stats.failed
            );
            Ok(())
        }
        Commands::List { limit } => {
            let conn = open_db(&settings)?;
            let rows = db::fetch_all(&conn)?;
            if rows.is_empty() {
                println!("No problems stored. Run 'ingest' or 'crawl' first.");
                return Ok(());
            }
            println!("{:>4} | {:<32} | {:<16} | {}", "id", "Title", "Time", "Source");
            println!("{}", "-".repeat(100));
            for r in rows.iter().take(limit) {
                println!(
                    "{:>4} | {:<32} | {:<16} | {}",
                    r.id.unwrap_or_default(),
                    truncate(&r.title, 32),
                    truncate(&r.complexity_time, 16),
                    r.source
                );
            }
            println!("\n{} problems", rows.len());
            Ok(())
        }
        Commands::Show { key } => {
            let conn = open_db(&settings)?;
            let record = match key.parse::<i64>() {
                Ok(id) => db::fetch_problem(&conn, id)?,
                Err(_) => db::fetch_by_source(&conn, &key)?,
            }
            .with_context(|| format!("Problem {} not found", key))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Validate { id, signals } => {
            let conn = open_db(&settings)?;
            let v = db::validate_signals(&conn, id, &signals)?;
            println!("{}", v.feedback);
            println!("success: {}", v.success);
            Ok(())
        }
        Commands::Count => {
            let conn = open_db(&settings)?;
            println!("{}", db::count_problems(&conn)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn build_ingestor(settings: Settings) -> anyhow::Result<Ingestor<HttpFetcher, GoogleTranslator>> {
    let fetcher = HttpFetcher::new(settings.fetch_timeout())?;
    let translator = GoogleTranslator::new(&settings)?;
    Ok(Ingestor::new(settings, fetcher, translator))
}

fn open_db(settings: &Settings) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(&settings.db_path)
        .with_context(|| format!("Failed to open {}", settings.db_path.display()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn truncate(s: &str, max: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    if first_line.chars().count() <= max {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{}m {}s", m, s),
        _ => format!("{}h {}m {}s", h, m, s),
    }
}
