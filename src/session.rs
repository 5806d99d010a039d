//! Per-run session context
//!
//! One `SessionContext` exists per crawl-and-ingest run. It records the
//! pages scraped, failed, and ignored (in completion order), carries the
//! run's chunking and fetch settings, and exposes an open-ended field map
//! that hook callbacks may extend. It is created when a run starts and
//! dropped when the run completes; nothing in it survives across runs.

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// The mutable run-scoped record threaded through hooks and components
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Unique identifier for this run
    pub run_id: String,

    /// The command text that triggered this run
    pub command: String,

    /// Whether this run was started by the scheduler (suppresses live
    /// progress notifications)
    pub scheduled: bool,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// URLs scraped successfully, in completion order
    pub scraped_pages: Vec<String>,

    /// URLs that failed (fetch or ingestion), in completion order
    pub failed_pages: Vec<String>,

    /// URLs fetched-but-excluded by policy (robots, extension, page limit),
    /// in completion order
    pub ignored_pages: Vec<String>,

    /// Chunk size used by the ingestion pipeline
    pub chunk_size: usize,

    /// Chunk overlap used by the ingestion pipeline
    pub chunk_overlap: usize,

    /// Per-page fetch timeout in seconds
    pub page_timeout: u64,

    /// Extra path extensions excluded from crawling
    pub skip_extensions: Vec<String>,

    /// Outbound user-agent string
    pub user_agent: String,

    /// Open-ended fields injected by hook callbacks; a field persists for
    /// the remainder of the run once injected
    pub extra: HashMap<String, Value>,
}

impl SessionContext {
    /// Creates the context for a new run
    pub fn new(command: &str, scheduled: bool, config: &Config) -> Self {
        let started_at = Utc::now();
        Self {
            run_id: started_at.format("run-%Y%m%dT%H%M%S%.3fZ").to_string(),
            command: command.to_string(),
            scheduled,
            started_at,
            scraped_pages: Vec::new(),
            failed_pages: Vec::new(),
            ignored_pages: Vec::new(),
            chunk_size: config.ingest.chunk_size,
            chunk_overlap: config.ingest.chunk_overlap,
            page_timeout: config.crawler.page_timeout,
            skip_extensions: config.crawler.skip_extensions.clone(),
            user_agent: config.user_agent.full_string(),
            extra: HashMap::new(),
        }
    }

    /// Records a successfully scraped page
    pub fn record_scraped(&mut self, url: &str) {
        self.scraped_pages.push(url.to_string());
    }

    /// Records a failed page
    pub fn record_failed(&mut self, url: &str) {
        self.failed_pages.push(url.to_string());
    }

    /// Records a fetched-but-excluded page
    pub fn record_ignored(&mut self, url: &str) {
        self.ignored_pages.push(url.to_string());
    }

    /// Merges hook-returned fields into the context
    ///
    /// The merge is additive: existing keys are overwritten, no key is ever
    /// removed.
    pub fn merge_extra(&mut self, fields: HashMap<String, Value>) {
        for (key, value) in fields {
            self.extra.insert(key, value);
        }
    }
}
