//! Ingestion pipeline
//!
//! After crawling ends, each scraped page is chunked and its chunks are
//! submitted in order to an `IngestSink`. The core does not know what the
//! sink does with a chunk; it only tracks per-page and run-level
//! success/failure and emits progress. One page failing to ingest never
//! stops ingestion of the pages after it.

mod chunker;

pub use chunker::chunk_text;

use crate::crawler::ContentKind;
use crate::session::SessionContext;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during chunk submission
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Sink rejected chunk: {0}")]
    Submit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Metadata accompanying every submitted chunk
#[derive(Debug, Clone)]
pub struct ChunkMetadata {
    /// The run this chunk belongs to
    pub run_id: String,

    /// Zero-based position of the chunk within its page
    pub sequence: usize,

    /// Total number of chunks for the page
    pub total: usize,

    /// Content kind of the source page
    pub kind: ContentKind,
}

/// The downstream ingestion sink
///
/// The core only knows it can submit a chunk; storage format and indexing
/// are the sink's business. Implementations must be safe to share across
/// the run.
#[async_trait]
pub trait IngestSink: Send + Sync {
    /// Submits one chunk of a page's text
    async fn submit(
        &self,
        chunk: &str,
        page_url: &str,
        metadata: &ChunkMetadata,
    ) -> Result<(), IngestError>;
}

/// Receiver for live per-page progress messages
///
/// Scheduled runs never call this; their progress is observable through
/// events only.
pub trait ProgressNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default notifier: forwards progress messages to the log
pub struct TracingNotifier;

impl ProgressNotifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// A page retained from the crawl phase for ingestion
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub kind: ContentKind,
    pub text: String,
}

/// Ingestion-phase totals
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Pages whose every chunk was submitted successfully
    pub pages_ingested: usize,

    /// Pages where a chunk submission failed
    pub pages_failed: usize,

    /// Total chunks accepted by the sink
    pub chunks_submitted: usize,
}

/// Chunks and submits every scraped page, in order
///
/// A page counts as ingested only if all of its chunk submissions succeed;
/// the first failing chunk marks the page as failed and the pipeline moves
/// on. Progress notifications are suppressed for scheduled runs.
pub async fn ingest_pages(
    sink: &dyn IngestSink,
    pages: &[ScrapedPage],
    session: &Mutex<SessionContext>,
    notifier: &dyn ProgressNotifier,
) -> IngestReport {
    let (run_id, chunk_size, chunk_overlap, scheduled) = {
        let session = session.lock().unwrap();
        (
            session.run_id.clone(),
            session.chunk_size,
            session.chunk_overlap,
            session.scheduled,
        )
    };

    let mut report = IngestReport::default();

    for (index, page) in pages.iter().enumerate() {
        let chunks = chunk_text(&page.text, chunk_size, chunk_overlap);
        let total = chunks.len();
        let mut failure = None;

        for (sequence, chunk) in chunks.iter().enumerate() {
            let metadata = ChunkMetadata {
                run_id: run_id.clone(),
                sequence,
                total,
                kind: page.kind,
            };
            match sink.submit(chunk, &page.url, &metadata).await {
                Ok(()) => report.chunks_submitted += 1,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        match failure {
            None => {
                report.pages_ingested += 1;
                tracing::info!(
                    event = "page_ingested",
                    url = %page.url,
                    chunks = total,
                    "page ingested"
                );
                if !scheduled {
                    notifier.notify(&format!(
                        "Ingested {} of {} pages - {}",
                        index + 1,
                        pages.len(),
                        page.url
                    ));
                }
            }
            Some(e) => {
                report.pages_failed += 1;
                session.lock().unwrap().record_failed(&page.url);
                tracing::warn!(
                    event = "ingest_failed",
                    url = %page.url,
                    error = %e,
                    "page ingestion failed, continuing"
                );
            }
        }
    }

    tracing::info!(
        event = "ingestion_completed",
        ingested = report.pages_ingested,
        failed = report.pages_failed,
        chunks = report.chunks_submitted,
        "ingestion completed"
    );

    report
}

#[derive(Serialize)]
struct ChunkRecord<'a> {
    url: &'a str,
    run_id: &'a str,
    sequence: usize,
    total: usize,
    kind: &'a str,
    text: &'a str,
}

/// File-backed sink writing one JSON object per chunk
///
/// This is the sink the binary wires up by default; anything downstream
/// that speaks JSONL can consume its output.
pub struct JsonlSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Creates (or truncates) the output file
    pub fn create(path: &Path) -> Result<Self, IngestError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

#[async_trait]
impl IngestSink for JsonlSink {
    async fn submit(
        &self,
        chunk: &str,
        page_url: &str,
        metadata: &ChunkMetadata,
    ) -> Result<(), IngestError> {
        let record = ChunkRecord {
            url: page_url,
            run_id: &metadata.run_id,
            sequence: metadata.sequence,
            total: metadata.total,
            kind: metadata.kind.as_str(),
            text: chunk,
        };
        let line = serde_json::to_string(&record)?;

        let mut writer = self.writer.lock().unwrap();
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// A chunk captured by the in-memory sink
#[derive(Debug, Clone)]
pub struct SubmittedChunk {
    pub url: String,
    pub sequence: usize,
    pub text: String,
}

/// In-memory sink for tests and dry runs
///
/// Can be told to reject every chunk of specific page URLs to exercise
/// partial-failure paths.
#[derive(Default)]
pub struct MemorySink {
    chunks: Mutex<Vec<SubmittedChunk>>,
    failing_urls: Mutex<HashSet<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes submissions for this page URL fail
    pub fn fail_for(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_string());
    }

    /// Returns everything submitted so far
    pub fn submitted(&self) -> Vec<SubmittedChunk> {
        self.chunks.lock().unwrap().clone()
    }
}

#[async_trait]
impl IngestSink for MemorySink {
    async fn submit(
        &self,
        chunk: &str,
        page_url: &str,
        metadata: &ChunkMetadata,
    ) -> Result<(), IngestError> {
        if self.failing_urls.lock().unwrap().contains(page_url) {
            return Err(IngestError::Submit(format!(
                "configured to fail for {}",
                page_url
            )));
        }
        self.chunks.lock().unwrap().push(SubmittedChunk {
            url: page_url.to_string(),
            sequence: metadata.sequence,
            text: chunk.to_string(),
        });
        Ok(())
    }
}
