//! Robots.txt handling module
//!
//! This module provides fetching, parsing, and per-run caching of
//! robots.txt policies. Policies are loaded lazily on the first URL seen
//! for an authority and never reloaded within a run; an unreachable
//! robots.txt fails open so the crawl is never blocked by a missing policy
//! file.

mod parser;

pub use parser::ParsedRobots;

use crate::url::url_authority;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// Timeout for robots.txt fetches, kept short so a slow policy endpoint
/// cannot stall the crawl
const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How a cached robots policy was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsStatus {
    /// Fetched and parsed successfully
    Loaded,
    /// The server answered without a usable robots.txt (e.g. 404); treated
    /// as "no restrictions"
    NotFound,
    /// The fetch failed; treated as allow-all (fail open)
    Error,
}

/// A cached per-authority robots policy plus its load status
#[derive(Debug, Clone)]
pub struct RobotsEntry {
    pub rules: ParsedRobots,
    pub status: RobotsStatus,
}

/// Per-run robots.txt cache
///
/// The cache is shared by all fetch workers. Population uses
/// at-most-once-per-authority semantics: a second concurrent request for an
/// uncached authority awaits the first load instead of issuing a duplicate
/// fetch.
pub struct RobotsCache {
    enabled: bool,
    user_agent: String,
    client: Client,
    entries: Mutex<HashMap<String, Arc<OnceCell<RobotsEntry>>>>,
}

impl RobotsCache {
    /// Creates a new cache
    ///
    /// When `enabled` is false, `is_allowed` always returns true and
    /// nothing is ever fetched.
    pub fn new(enabled: bool, user_agent: &str, client: Client) -> Self {
        Self {
            enabled,
            user_agent: user_agent.to_string(),
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL may be fetched under its authority's robots policy
    pub async fn is_allowed(&self, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }

        let entry = match self.entry_for(url).await {
            Some(entry) => entry,
            None => return true,
        };

        entry.rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Warms the cache for the given URLs' authorities
    pub async fn preload<'a, I>(&self, urls: I)
    where
        I: IntoIterator<Item = &'a Url>,
    {
        if !self.enabled {
            return;
        }
        for url in urls {
            self.entry_for(url).await;
        }
    }

    async fn entry_for(&self, url: &Url) -> Option<RobotsEntry> {
        let authority = url_authority(url)?;

        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(authority.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let entry = cell
            .get_or_init(|| self.load(url, &authority))
            .await
            .clone();
        Some(entry)
    }

    /// Fetches and caches the robots.txt for one authority
    async fn load(&self, url: &Url, authority: &str) -> RobotsEntry {
        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        match self
            .client
            .get(robots_url.clone())
            .timeout(ROBOTS_FETCH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    tracing::info!(
                        event = "robots_loaded",
                        authority = %authority,
                        outcome = "loaded",
                        "loaded robots.txt"
                    );
                    RobotsEntry {
                        rules: ParsedRobots::from_content(&body),
                        status: RobotsStatus::Loaded,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        event = "robots_loaded",
                        authority = %authority,
                        outcome = "error",
                        error = %e,
                        "failed to read robots.txt body, allowing all"
                    );
                    RobotsEntry {
                        rules: ParsedRobots::allow_all(),
                        status: RobotsStatus::Error,
                    }
                }
            },
            Ok(response) => {
                tracing::info!(
                    event = "robots_loaded",
                    authority = %authority,
                    outcome = "not_found",
                    status = response.status().as_u16(),
                    "no robots.txt, allowing all"
                );
                RobotsEntry {
                    rules: ParsedRobots::allow_all(),
                    status: RobotsStatus::NotFound,
                }
            }
            Err(e) => {
                tracing::warn!(
                    event = "robots_loaded",
                    authority = %authority,
                    outcome = "error",
                    error = %e,
                    "failed to fetch robots.txt, allowing all"
                );
                RobotsEntry {
                    rules: ParsedRobots::allow_all(),
                    status: RobotsStatus::Error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_allows_everything() {
        let cache = RobotsCache::new(false, "TestBot/1.0", Client::new());
        let url = Url::parse("https://example.invalid/admin").unwrap();
        assert!(cache.is_allowed(&url).await);
    }

    #[tokio::test]
    async fn test_unreachable_robots_fails_open() {
        // Nothing listens on this address; the fetch error must fail open.
        let cache = RobotsCache::new(true, "TestBot/1.0", Client::new());
        let url = Url::parse("http://127.0.0.1:9/page").unwrap();
        assert!(cache.is_allowed(&url).await);
    }

    #[tokio::test]
    async fn test_unreachable_load_cached_once() {
        let cache = RobotsCache::new(true, "TestBot/1.0", Client::new());
        let url = Url::parse("http://127.0.0.1:9/page").unwrap();
        assert!(cache.is_allowed(&url).await);
        // Second check hits the cached fail-open entry.
        assert!(cache.is_allowed(&url).await);
        let entries = cache.entries.lock().await;
        assert_eq!(entries.len(), 1);
    }
}
