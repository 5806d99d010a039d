//! Crawl-and-ingest run orchestration
//!
//! The coordinator owns one run end-to-end:
//! 1. Gate interactive runs when only-scheduled mode is active
//! 2. Create the session context and fire the before-scrape hook
//! 3. Seed the frontier and spawn the fetch worker pool
//! 4. Fire the after-crawl hook once all fetching has terminated
//! 5. Chunk and submit every scraped page through the ingestion pipeline
//! 6. Fire the after-ingestion hook and return the run's totals

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::render::RenderingFetcher;
use crate::crawler::worker::{run_worker, CrawlContext};
use crate::hooks::{HookPoint, HookRegistry};
use crate::ingest::{ingest_pages, IngestSink, ProgressNotifier, TracingNotifier};
use crate::robots::RobotsCache;
use crate::session::SessionContext;
use crate::url::{normalize_url, NormalizeOptions, NormalizedUrl, RootSet, Scope};
use crate::SiftError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Final accounting for one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Identifier of the run this report describes
    pub run_id: String,

    /// Pages fetched and text-extracted successfully
    pub pages_scraped: usize,

    /// Pages whose fetch failed (both strategies exhausted)
    pub pages_failed: usize,

    /// Pages excluded by policy (robots, PDF policy, page limit)
    pub pages_ignored: usize,

    /// Pages whose every chunk reached the sink
    pub pages_ingested: usize,

    /// Pages where a chunk submission failed
    pub pages_ingest_failed: usize,

    /// Total chunks accepted by the sink
    pub chunks_submitted: usize,
}

impl RunReport {
    /// Human-readable one-line summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{} of {} scraped pages successfully ingested ({} chunks; {} fetch failures, {} ignored)",
            self.pages_ingested,
            self.pages_scraped,
            self.chunks_submitted,
            self.pages_failed,
            self.pages_ignored
        )
    }
}

/// Orchestrates crawl-and-ingest runs
///
/// One coordinator can serve repeated runs against the same policy and
/// root set; every run gets a fresh session, frontier, and robots cache.
pub struct Coordinator {
    config: Arc<Config>,
    roots: RootSet,
    sink: Arc<dyn IngestSink>,
    hooks: HookRegistry,
    notifier: Arc<dyn ProgressNotifier>,
    client: reqwest::Client,
    renderer: Option<Arc<RenderingFetcher>>,
}

impl Coordinator {
    /// Creates a coordinator for the given policy, roots, and sink
    pub fn new(
        config: Config,
        roots: RootSet,
        sink: Arc<dyn IngestSink>,
    ) -> Result<Self, SiftError> {
        let client = build_http_client(&config.user_agent)?;

        let renderer = if config.renderer.enabled || config.renderer.fallback_on_empty {
            Some(Arc::new(RenderingFetcher::new(
                &config.renderer.webdriver_url,
            )))
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            roots,
            sink,
            hooks: HookRegistry::new(),
            notifier: Arc::new(TracingNotifier),
            client,
            renderer,
        })
    }

    /// Installs the externally supplied hook callbacks
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the progress notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Runs one crawl-and-ingest cycle
    ///
    /// # Arguments
    ///
    /// * `command` - The originating command text, recorded in the session
    /// * `scheduled` - True when invoked by the scheduler; suppresses live
    ///   progress notifications
    pub async fn run(&self, command: &str, scheduled: bool) -> Result<RunReport, SiftError> {
        // Rejected before any session state exists.
        if self.config.crawler.only_scheduled && !scheduled {
            return Err(SiftError::OnlyScheduled);
        }
        if self.roots.seeds().next().is_none() {
            return Err(SiftError::EmptySeedSet);
        }

        let session = Arc::new(Mutex::new(SessionContext::new(
            command,
            scheduled,
            &self.config,
        )));
        let run_id = session.lock().unwrap().run_id.clone();

        tracing::info!(
            event = "run_started",
            run_id = %run_id,
            command = %command,
            scheduled,
            "starting crawl run"
        );

        {
            let mut session = session.lock().unwrap();
            self.hooks.invoke(HookPoint::BeforeScrape, &mut session);
        }

        let user_agent = self.config.user_agent.full_string();
        let normalize = NormalizeOptions::with_extra_extensions(
            self.config.crawler.skip_get_params,
            &self.config.crawler.skip_extensions,
        );
        let frontier = Arc::new(Frontier::new(
            self.config.crawler.max_depth,
            self.config.crawler.max_pages,
        ));

        // Seed the frontier with the recursive roots at depth 0.
        for seed in self.roots.seeds() {
            match normalize_url(seed.as_str(), None, &normalize) {
                Ok(NormalizedUrl::Canonical(url)) => {
                    frontier.enqueue(url, 0, Scope::Recursive);
                }
                Ok(NormalizedUrl::Excluded { extension }) => {
                    session.lock().unwrap().record_ignored(seed.as_str());
                    tracing::info!(
                        event = "page_ignored",
                        url = %seed,
                        reason = "extension",
                        extension = %extension,
                        "seed excluded by extension"
                    );
                }
                Err(e) => {
                    tracing::warn!(url = %seed, error = %e, "failed to normalize seed URL");
                }
            }
        }

        let robots = Arc::new(RobotsCache::new(
            self.config.crawler.follow_robots,
            &user_agent,
            self.client.clone(),
        ));
        robots.preload(self.roots.seeds()).await;

        let pages = Arc::new(Mutex::new(Vec::new()));
        let ctx = Arc::new(CrawlContext {
            config: self.config.clone(),
            roots: self.roots.clone(),
            normalize,
            frontier: frontier.clone(),
            session: session.clone(),
            robots,
            primary: Arc::new(HttpFetcher::new(self.client.clone())),
            renderer: self.renderer.clone(),
            pages: pages.clone(),
            notifier: self.notifier.clone(),
            scheduled,
            page_timeout: Duration::from_secs(self.config.crawler.page_timeout),
        });

        let mut handles = Vec::new();
        for worker_id in 0..self.config.crawler.workers {
            handles.push(tokio::spawn(run_worker(worker_id, ctx.clone())));
        }
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("worker task panicked: {}", e);
            }
        }

        let (pages_scraped, pages_failed, pages_ignored) = {
            let session = session.lock().unwrap();
            (
                session.scraped_pages.len(),
                session.failed_pages.len(),
                session.ignored_pages.len(),
            )
        };

        tracing::info!(
            event = "crawl_completed",
            run_id = %run_id,
            scraped = pages_scraped,
            failed = pages_failed,
            ignored = pages_ignored,
            "crawl phase completed"
        );

        {
            let mut session = session.lock().unwrap();
            self.hooks.invoke(HookPoint::AfterCrawl, &mut session);
        }

        let scraped_pages = std::mem::take(&mut *pages.lock().unwrap());
        let ingest_report =
            ingest_pages(self.sink.as_ref(), &scraped_pages, &session, self.notifier.as_ref())
                .await;

        {
            let mut session = session.lock().unwrap();
            self.hooks.invoke(HookPoint::AfterIngestion, &mut session);
        }

        let report = RunReport {
            run_id,
            pages_scraped,
            pages_failed,
            pages_ignored,
            pages_ingested: ingest_report.pages_ingested,
            pages_ingest_failed: ingest_report.pages_failed,
            chunks_submitted: ingest_report.chunks_submitted,
        };

        tracing::info!("{}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::MemorySink;

    fn create_test_config(extra: &str) -> Config {
        toml::from_str(&format!(
            r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
{}
"#,
            extra
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_only_scheduled_rejects_interactive_runs() {
        let config = create_test_config("[crawler]\nonly-scheduled = true");
        let roots = RootSet::build(&["https://example.com/".to_string()], &[]);
        let coordinator = Coordinator::new(config, roots, Arc::new(MemorySink::new())).unwrap();

        let result = coordinator.run("crawl https://example.com/", false).await;
        assert!(matches!(result, Err(SiftError::OnlyScheduled)));
    }

    #[tokio::test]
    async fn test_empty_seed_set_is_an_error() {
        let config = create_test_config("");
        let roots = RootSet::build(&[], &[]);
        let coordinator = Coordinator::new(config, roots, Arc::new(MemorySink::new())).unwrap();

        let result = coordinator.run("crawl", false).await;
        assert!(matches!(result, Err(SiftError::EmptySeedSet)));
    }

    #[test]
    fn test_report_summary_wording() {
        let report = RunReport {
            run_id: "run-x".to_string(),
            pages_scraped: 4,
            pages_failed: 1,
            pages_ignored: 2,
            pages_ingested: 3,
            pages_ingest_failed: 1,
            chunks_submitted: 17,
        };
        assert_eq!(
            report.summary(),
            "3 of 4 scraped pages successfully ingested (17 chunks; 1 fetch failures, 2 ignored)"
        );
    }
}
