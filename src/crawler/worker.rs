//! Fetch workers
//!
//! A run spawns a fixed pool of workers that drain the frontier until it is
//! genuinely exhausted or the page bound closes it. Each worker applies the
//! per-entry policy gates (page budget, PDF policy, robots), fetches with
//! the configured strategy order, discovers links from recursive-scope
//! pages, and records the outcome in the session. A single page failing is
//! never fatal to the run.

use crate::config::Config;
use crate::crawler::fetcher::{ContentKind, FetchError, FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_page;
use crate::crawler::render::RenderingFetcher;
use crate::ingest::{ProgressNotifier, ScrapedPage};
use crate::robots::RobotsCache;
use crate::session::SessionContext;
use crate::url::{classify_url, normalize_url, path_extension, NormalizeOptions, NormalizedUrl, RootSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Everything a worker needs, shared across the pool
pub(crate) struct CrawlContext {
    pub config: Arc<Config>,
    pub roots: RootSet,
    pub normalize: NormalizeOptions,
    pub frontier: Arc<Frontier>,
    pub session: Arc<Mutex<SessionContext>>,
    pub robots: Arc<RobotsCache>,
    pub primary: Arc<HttpFetcher>,
    pub renderer: Option<Arc<RenderingFetcher>>,
    pub pages: Arc<Mutex<Vec<ScrapedPage>>>,
    pub notifier: Arc<dyn ProgressNotifier>,
    pub scheduled: bool,
    pub page_timeout: Duration,
}

/// Extracted content of a fetched page
struct PageContent {
    kind: ContentKind,
    text: String,
    links: Vec<String>,
}

/// A worker's main loop: pull entries until the frontier reports exhaustion
pub(crate) async fn run_worker(worker_id: usize, ctx: Arc<CrawlContext>) {
    tracing::debug!(worker = worker_id, "worker started");

    while let Some(entry) = ctx.frontier.next().await {
        process_entry(worker_id, &ctx, entry).await;
        ctx.frontier.complete();
    }

    tracing::debug!(worker = worker_id, "worker finished, frontier exhausted");
}

/// Applies policy gates, fetches, and records the outcome of one entry
async fn process_entry(worker_id: usize, ctx: &CrawlContext, entry: FrontierEntry) {
    let url = entry.url.clone();

    // Page budget: the entry leaves the frontier either way, so over-budget
    // entries are accounted as ignored, not dropped on the floor.
    if !ctx.frontier.try_start_fetch() {
        ctx.session.lock().unwrap().record_ignored(url.as_str());
        tracing::info!(
            event = "page_ignored",
            url = %url,
            reason = "page-limit",
            "page limit reached, not fetching"
        );
        return;
    }

    // PDF policy
    if path_extension(&url).as_deref() == Some("pdf") && !ctx.config.crawler.ingest_pdf {
        ctx.session.lock().unwrap().record_ignored(url.as_str());
        tracing::info!(
            event = "page_ignored",
            url = %url,
            reason = "pdf-disabled",
            "PDF ingestion is disabled, skipping"
        );
        return;
    }

    // Robots policy
    if !ctx.robots.is_allowed(&url).await {
        ctx.session.lock().unwrap().record_ignored(url.as_str());
        tracing::info!(
            event = "page_ignored",
            url = %url,
            reason = "robots",
            "disallowed by robots.txt"
        );
        return;
    }

    match fetch_content(ctx, &url).await {
        Ok(content) => {
            if entry.scope.expands() {
                discover_links(ctx, &url, entry.depth, &content.links);
            }

            let scraped_count = {
                let mut session = ctx.session.lock().unwrap();
                session.record_scraped(url.as_str());
                session.scraped_pages.len()
            };

            ctx.pages.lock().unwrap().push(ScrapedPage {
                url: url.to_string(),
                kind: content.kind,
                text: content.text,
            });

            tracing::info!(
                event = "page_scraped",
                url = %url,
                depth = entry.depth,
                kind = content.kind.as_str(),
                worker = worker_id,
                "page scraped"
            );

            if !ctx.scheduled {
                ctx.notifier.notify(&format!(
                    "Scraped {} pages - currently scraping: {}",
                    scraped_count, url
                ));
            }
        }
        Err(e) => {
            ctx.session.lock().unwrap().record_failed(url.as_str());
            tracing::warn!(
                event = "page_failed",
                url = %url,
                error = %e,
                "page fetch failed, continuing"
            );
        }
    }
}

/// Fetches a URL with the configured strategy order and extracts its content
///
/// PDFs always use the primary fetcher. For HTML, the renderer (when
/// enabled) is tried first and the primary fetcher is the fallback; when the
/// renderer is configured for thin-content retries instead, a primary
/// result whose text looks too short to be real content earns a single
/// renderer attempt before being accepted as-is.
async fn fetch_content(ctx: &CrawlContext, url: &Url) -> Result<PageContent, FetchError> {
    if path_extension(url).as_deref() == Some("pdf") {
        let page = ctx.primary.fetch(url, ctx.page_timeout).await?;
        return Ok(extract(page));
    }

    let mut renderer_tried = false;

    if ctx.config.renderer.enabled {
        if let Some(renderer) = &ctx.renderer {
            renderer_tried = true;
            match renderer.fetch(url, ctx.page_timeout).await {
                Ok(page) => return Ok(extract(page)),
                Err(e) => {
                    tracing::warn!(
                        event = "fetch_fallback",
                        url = %url,
                        reason = "renderer-error",
                        error = %e,
                        "renderer failed, falling back to primary fetcher"
                    );
                }
            }
        }
    }

    let content = extract(ctx.primary.fetch(url, ctx.page_timeout).await?);

    if !renderer_tried
        && ctx.config.renderer.fallback_on_empty
        && content.kind == ContentKind::Html
        && content.text.chars().count() < ctx.config.renderer.min_text_length
    {
        if let Some(renderer) = &ctx.renderer {
            tracing::info!(
                event = "fetch_fallback",
                url = %url,
                reason = "thin-content",
                text_length = content.text.chars().count(),
                "retrying thin page through the renderer"
            );
            match renderer.fetch(url, ctx.page_timeout).await {
                Ok(page) => return Ok(extract(page)),
                Err(e) => {
                    // Keep the thin primary result; the renderer retry was
                    // best-effort.
                    tracing::warn!(
                        event = "fetch_fallback",
                        url = %url,
                        reason = "renderer-error",
                        error = %e,
                        "renderer retry failed, keeping primary result"
                    );
                }
            }
        }
    }

    Ok(content)
}

/// Derives text and candidate links from a fetched page
fn extract(page: FetchedPage) -> PageContent {
    match page.kind {
        ContentKind::Html => {
            let parsed = parse_page(&page.body);
            PageContent {
                kind: ContentKind::Html,
                text: parsed.text,
                links: parsed.links,
            }
        }
        ContentKind::Pdf => PageContent {
            kind: ContentKind::Pdf,
            text: page.body,
            links: Vec::new(),
        },
    }
}

/// Normalizes, classifies, and enqueues the links found on a page
///
/// Out-of-scope and malformed hrefs are dropped silently; excluded
/// extensions are dropped at discovery so the same asset linked from every
/// page does not flood the accounting.
fn discover_links(ctx: &CrawlContext, base: &Url, depth: u32, links: &[String]) {
    for href in links {
        let normalized = match normalize_url(href, Some(base), &ctx.normalize) {
            Ok(NormalizedUrl::Canonical(url)) => url,
            Ok(NormalizedUrl::Excluded { .. }) => continue,
            Err(_) => continue,
        };

        let scope = classify_url(&normalized, &ctx.roots);
        if !scope.is_fetchable() {
            continue;
        }

        if ctx.frontier.enqueue(normalized.clone(), depth + 1, scope) {
            tracing::debug!(
                url = %normalized,
                depth = depth + 1,
                scope = ?scope,
                "queued discovered link"
            );
        }
    }
}
