use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS problems (
            id               INTEGER PRIMARY KEY,
            title            TEXT NOT NULL,
            description      TEXT,
            input_output     TEXT,
            prerequisites    TEXT,
            complexity_time  TEXT,
            complexity_space TEXT,
            code_snippets    TEXT,
            source           TEXT NOT NULL,
            ingested_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_problems_source ON problems(source);
        ",
    )?;
    Ok(())
}

// ── Records ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    /// Assigned by storage; `None` until stored.
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    /// Reserved; not populated by the pipeline.
    pub input_output: Option<String>,
    pub prerequisites: String,
    pub complexity_time: String,
    pub complexity_space: String,
    /// Reserved; not populated by the pipeline.
    pub code_snippets: Option<String>,
    pub source: String,
    pub ingested_at: Option<String>,
}

/// Insert or fully replace the record for `record.source`. Returns the row id,
/// which stays stable across replacements of the same source.
pub fn upsert_problem(conn: &Connection, record: &ProblemRecord) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let id = tx.query_row(
        "INSERT INTO problems
         (title, description, input_output, prerequisites, complexity_time,
          complexity_space, code_snippets, source, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(source) DO UPDATE SET
            title            = excluded.title,
            description      = excluded.description,
            input_output     = excluded.input_output,
            prerequisites    = excluded.prerequisites,
            complexity_time  = excluded.complexity_time,
            complexity_space = excluded.complexity_space,
            code_snippets    = excluded.code_snippets,
            ingested_at      = excluded.ingested_at
         RETURNING id",
        params![
            record.title,
            record.description,
            record.input_output,
            record.prerequisites,
            record.complexity_time,
            record.complexity_space,
            record.code_snippets,
            record.source,
            chrono::Utc::now().to_rfc3339(),
        ],
        |row| row.get(0),
    )?;
    tx.commit()?;
    Ok(id)
}

const SELECT_PROBLEM: &str = "SELECT id, title, description, input_output, prerequisites,
        complexity_time, complexity_space, code_snippets, source, ingested_at
 FROM problems";

fn row_to_problem(row: &rusqlite::Row) -> rusqlite::Result<ProblemRecord> {
    Ok(ProblemRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        input_output: row.get(3)?,
        prerequisites: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        complexity_time: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        complexity_space: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        code_snippets: row.get(7)?,
        source: row.get(8)?,
        ingested_at: row.get(9)?,
    })
}

pub fn fetch_problem(conn: &Connection, id: i64) -> Result<Option<ProblemRecord>> {
    let sql = format!("{} WHERE id = ?1", SELECT_PROBLEM);
    Ok(conn.query_row(&sql, [id], row_to_problem).optional()?)
}

pub fn fetch_by_source(conn: &Connection, source: &str) -> Result<Option<ProblemRecord>> {
    let sql = format!("{} WHERE source = ?1", SELECT_PROBLEM);
    Ok(conn.query_row(&sql, [source], row_to_problem).optional()?)
}

pub fn fetch_all(conn: &Connection) -> Result<Vec<ProblemRecord>> {
    let sql = format!("{} ORDER BY id", SELECT_PROBLEM);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], row_to_problem)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_problems(conn: &Connection) -> Result<usize> {
    Ok(conn.query_row("SELECT COUNT(*) FROM problems", [], |r| r.get(0))?)
}

// ── Validation ──

#[derive(Debug, Serialize)]
pub struct SignalMatch {
    pub signal: String,
    pub matched: bool,
}

#[derive(Debug, Serialize)]
pub struct Validation {
    pub success: bool,
    pub signals: Vec<SignalMatch>,
    pub feedback: String,
}

/// Case-insensitive substring check of each signal against `prerequisites`.
pub fn validate_signals(conn: &Connection, id: i64, signals: &[String]) -> Result<Validation> {
    let truth: Option<Option<String>> = conn
        .query_row("SELECT prerequisites FROM problems WHERE id = ?1", [id], |r| r.get(0))
        .optional()?;

    let Some(truth) = truth else {
        return Ok(Validation {
            success: false,
            signals: Vec::new(),
            feedback: "Problem data missing.".into(),
        });
    };
    Ok(match_signals(&truth.unwrap_or_default(), signals))
}

pub fn match_signals(prerequisites: &str, signals: &[String]) -> Validation {
    let truth = prerequisites.to_lowercase();
    let matches: Vec<SignalMatch> = signals
        .iter()
        .map(|s| SignalMatch {
            signal: s.clone(),
            matched: truth.contains(&s.to_lowercase()),
        })
        .collect();

    let feedback = matches
        .iter()
        .map(|m| {
            if m.matched {
                format!("✅ {}: Matches problem signals.", m.signal)
            } else {
                format!("❌ {}: Not a primary signal for this problem.", m.signal)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Validation {
        success: matches.iter().any(|m| m.matched),
        signals: matches,
        feedback,
    }
}
