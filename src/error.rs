use std::path::PathBuf;

use thiserror::Error;

/// Fetch failed: connection error, timeout or non-success status.
#[derive(Debug, Error)]
#[error("network error for {url}: {reason}")]
pub struct NetworkError {
    pub url: String,
    pub reason: String,
    pub status: Option<u16>,
}

impl NetworkError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        NetworkError {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            reason: if err.is_timeout() {
                format!("timed out: {}", err)
            } else {
                err.to_string()
            },
        }
    }
}

/// A single chunk could not be translated. The chunk is dropped from the output.
#[derive(Debug, Error)]
pub enum TranslationChunkError {
    #[error("chunk {index}: translation request failed: {reason}")]
    Request { index: usize, reason: String },
    #[error("chunk {index}: translation returned no text")]
    Empty { index: usize },
}

impl TranslationChunkError {
    pub fn index(&self) -> usize {
        match self {
            Self::Request { index, .. } | Self::Empty { index } => *index,
        }
    }

    /// Same error, re-tagged with the chunk position assigned by the chunker.
    pub fn at(self, index: usize) -> Self {
        match self {
            Self::Request { reason, .. } => Self::Request { index, reason },
            Self::Empty { .. } => Self::Empty { index },
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot create database directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Why a single URL produced no stored record.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("no translatable content in {url} ({skipped} of {chunks} chunks failed)")]
    EmptyDocument {
        url: String,
        chunks: usize,
        skipped: usize,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
