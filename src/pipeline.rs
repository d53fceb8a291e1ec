use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::chunker::ChunkTranslator;
use crate::config::Settings;
use crate::db::{self, ProblemRecord};
use crate::error::{IngestError, NetworkError, StorageError};
use crate::extract::{self, ExtractionResult};
use crate::fetch::Fetch;
use crate::links::LinkDiscoverer;
use crate::normalize::UrlNormalizer;
use crate::translate::Translate;

/// A record that made it to storage.
#[derive(Debug)]
pub struct Stored {
    pub id: i64,
    pub title: String,
    pub source: String,
    pub skipped_chunks: usize,
}

/// Crawl stats returned after completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub total: usize,
    pub stored: usize,
    pub failed: usize,
}

/// URL → fetch → chunked translation → extraction → upsert, one URL at a time.
pub struct Ingestor<F, T> {
    settings: Settings,
    normalizer: UrlNormalizer,
    discoverer: LinkDiscoverer,
    fetcher: F,
    translator: T,
}

impl<F: Fetch, T: Translate> Ingestor<F, T> {
    pub fn new(settings: Settings, fetcher: F, translator: T) -> Self {
        Ingestor {
            normalizer: UrlNormalizer::new(&settings),
            discoverer: LinkDiscoverer::new(&settings),
            settings,
            fetcher,
            translator,
        }
    }

    /// Run the pipeline for one document URL.
    pub async fn ingest_one(&self, url: &str) -> Result<Stored, IngestError> {
        let source = self.normalizer.normalize(url);
        let raw = self.fetcher.fetch(&source).await?;
        let raw = raw.replace("\r\n", "\n");

        let doc = ChunkTranslator::new(&self.translator, self.settings.chunk_ceiling)
            .translate_document(&raw)
            .await;
        if doc.is_empty() {
            return Err(IngestError::EmptyDocument {
                url: source,
                chunks: doc.chunks,
                skipped: doc.skipped.len(),
            });
        }

        let fields = extract::extract_all(&doc.text, &source);
        let record = build_record(fields, &source);
        let id = self.store(&record)?;

        Ok(Stored {
            id,
            title: record.title,
            source,
            skipped_chunks: doc.skipped.len(),
        })
    }

    /// The connection lives only for this call and is closed on every exit path.
    fn store(&self, record: &ProblemRecord) -> Result<i64, StorageError> {
        let conn = db::connect(&self.settings.db_path)?;
        db::init_schema(&conn)?;
        db::upsert_problem(&conn, record)
    }

    /// Ingest one URL, logging the outcome. Returns whether a record was stored.
    pub async fn ingest(&self, url: &str) -> bool {
        match self.ingest_one(url).await {
            Ok(s) => {
                info!(
                    id = s.id,
                    source = %s.source,
                    skipped_chunks = s.skipped_chunks,
                    "Stored: {}",
                    s.title
                );
                true
            }
            Err(IngestError::Network(e)) => {
                warn!(status = ?e.status, "Network error for {}: {}", url, e.reason);
                false
            }
            Err(e @ IngestError::EmptyDocument { .. }) => {
                warn!("{}; skipping save", e);
                false
            }
            Err(IngestError::Storage(e)) => {
                error!("Database error for {}: {}", url, e);
                false
            }
        }
    }

    /// Fetch an index page and ingest every discovered document. A failing
    /// document never stops the crawl; only an unreachable index page does.
    pub async fn crawl(&self, index_url: &str) -> Result<CrawlStats, NetworkError> {
        info!("Fetching index page: {}", index_url);
        let html = self.fetcher.fetch(index_url).await?;
        let urls: Vec<String> = self.discoverer.discover(index_url, &html).collect();
        info!("Candidate documents: {}", urls.len());

        let pb = ProgressBar::new(urls.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        let mut stats = CrawlStats {
            total: urls.len(),
            ..Default::default()
        };
        for url in &urls {
            if self.ingest(url).await {
                stats.stored += 1;
            } else {
                stats.failed += 1;
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(
            "Crawled {} documents ({} stored, {} failed)",
            stats.total, stats.stored, stats.failed
        );
        Ok(stats)
    }
}

fn build_record(fields: ExtractionResult, source: &str) -> ProblemRecord {
    ProblemRecord {
        id: None,
        title: fields.title.value,
        description: fields.description.value,
        input_output: None,
        prerequisites: fields.prerequisites.value,
        complexity_time: fields.complexity_time.value,
        complexity_space: fields.complexity_space.value,
        code_snippets: None,
        source: source.to_string(),
        ingested_at: None,
    }
}
