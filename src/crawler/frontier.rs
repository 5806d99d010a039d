//! The crawl frontier
//!
//! The frontier is the single shared work structure of a run: the queue of
//! entries to fetch, the visited set that deduplicates them, and the
//! counters that enforce the page bound. All of it lives behind one mutex
//! whose critical sections cover only queue/counter mutation; network
//! calls never happen under the lock.
//!
//! Workers pull entries with `next()`, which resolves to `None` only when
//! the frontier is genuinely exhausted: nothing queued and no worker still
//! fetching (an in-flight worker may yet enqueue more).

use crate::url::Scope;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use url::Url;

/// A unit of crawl work
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// The normalized URL to fetch
    pub url: Url,

    /// Graph distance from the seeds
    pub depth: u32,

    /// Whether links found on this page are followed
    pub scope: Scope,
}

struct FrontierInner {
    queue: VecDeque<FrontierEntry>,
    seen: HashSet<String>,
    fetched: u64,
    in_flight: usize,
    accepting: bool,
}

/// Shared, thread-safe work queue with visited-set and bound counters
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    wake: Notify,
    max_depth: i32,
    max_pages: i64,
}

impl Frontier {
    /// Creates a frontier with the run's depth and page bounds
    ///
    /// A bound of -1 means unbounded.
    pub fn new(max_depth: i32, max_pages: i64) -> Self {
        Self {
            inner: Mutex::new(FrontierInner {
                queue: VecDeque::new(),
                seen: HashSet::new(),
                fetched: 0,
                in_flight: 0,
                accepting: true,
            }),
            wake: Notify::new(),
            max_depth,
            max_pages,
        }
    }

    /// Enqueues a URL if it passes the depth bound, has not been seen this
    /// run, and the frontier is still accepting entries
    ///
    /// Returns true if the entry was queued.
    pub fn enqueue(&self, url: Url, depth: u32, scope: Scope) -> bool {
        if self.max_depth >= 0 && depth > self.max_depth as u32 {
            return false;
        }

        let queued = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.accepting {
                return false;
            }
            if !inner.seen.insert(url.as_str().to_string()) {
                return false;
            }
            inner.queue.push_back(FrontierEntry { url, depth, scope });
            true
        };

        if queued {
            self.wake.notify_waiters();
        }
        queued
    }

    /// Pops the next entry, suspending while other workers may still
    /// produce more
    ///
    /// Returns `None` once the queue is empty and no entry is in flight.
    /// The caller must pair every `Some` with a later `complete()`.
    pub async fn next(&self) -> Option<FrontierEntry> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(entry) = inner.queue.pop_front() {
                    inner.in_flight += 1;
                    return Some(entry);
                }
                if inner.in_flight == 0 {
                    return None;
                }
            }

            // Another worker is mid-fetch and may enqueue more; wait for a
            // wakeup, re-checking periodically so a lost notification can
            // never wedge the pool.
            let _ = tokio::time::timeout(Duration::from_millis(25), self.wake.notified()).await;
        }
    }

    /// Marks an entry taken from `next()` as settled
    pub fn complete(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.in_flight -= 1;
        }
        self.wake.notify_waiters();
    }

    /// Reserves one of the run's fetch slots
    ///
    /// Returns false when the page bound is reached; the first refusal also
    /// closes the frontier to new entries, so in-flight work completes but
    /// nothing further is accepted.
    pub fn try_start_fetch(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if self.max_pages < 0 || inner.fetched < self.max_pages as u64 {
            inner.fetched += 1;
            return true;
        }
        if inner.accepting {
            inner.accepting = false;
            tracing::info!(
                event = "page_limit_reached",
                max_pages = self.max_pages,
                "page limit reached, draining remaining entries"
            );
        }
        false
    }

    /// Number of distinct URLs ever enqueued this run
    pub fn visited_count(&self) -> usize {
        self.inner.lock().unwrap().seen.len()
    }

    /// Number of fetch slots consumed
    pub fn fetched_count(&self) -> u64 {
        self.inner.lock().unwrap().fetched
    }

    /// Number of entries currently queued
    pub fn queued_count(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let frontier = Frontier::new(-1, -1);
        assert!(frontier.enqueue(url("/a"), 0, Scope::Recursive));
        assert!(!frontier.enqueue(url("/a"), 1, Scope::Recursive));
        assert_eq!(frontier.queued_count(), 1);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_enqueue_respects_depth_bound() {
        let frontier = Frontier::new(1, -1);
        assert!(frontier.enqueue(url("/seed"), 0, Scope::Recursive));
        assert!(frontier.enqueue(url("/child"), 1, Scope::Recursive));
        assert!(!frontier.enqueue(url("/grandchild"), 2, Scope::Recursive));
    }

    #[test]
    fn test_depth_zero_allows_only_seeds() {
        let frontier = Frontier::new(0, -1);
        assert!(frontier.enqueue(url("/seed"), 0, Scope::Recursive));
        assert!(!frontier.enqueue(url("/child"), 1, Scope::Recursive));
    }

    #[test]
    fn test_unbounded_depth() {
        let frontier = Frontier::new(-1, -1);
        assert!(frontier.enqueue(url("/deep"), 10_000, Scope::Recursive));
    }

    #[test]
    fn test_page_limit_closes_frontier() {
        let frontier = Frontier::new(-1, 2);
        assert!(frontier.try_start_fetch());
        assert!(frontier.try_start_fetch());
        assert!(!frontier.try_start_fetch());
        // Once closed, nothing new is accepted.
        assert!(!frontier.enqueue(url("/late"), 0, Scope::Recursive));
        assert_eq!(frontier.fetched_count(), 2);
    }

    #[tokio::test]
    async fn test_next_drains_then_exhausts() {
        let frontier = Frontier::new(-1, -1);
        frontier.enqueue(url("/a"), 0, Scope::Recursive);
        frontier.enqueue(url("/b"), 0, Scope::Recursive);

        let first = frontier.next().await.unwrap();
        frontier.complete();
        let second = frontier.next().await.unwrap();
        frontier.complete();
        assert_ne!(first.url, second.url);

        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_next_waits_for_in_flight_producer() {
        let frontier = Arc::new(Frontier::new(-1, -1));
        frontier.enqueue(url("/a"), 0, Scope::Recursive);

        // Consumer A takes the only entry and, while "fetching", discovers
        // a new link. Consumer B must wait rather than seeing exhaustion.
        let entry = frontier.next().await.unwrap();
        assert_eq!(entry.url.path(), "/a");

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.next().await })
        };

        frontier.enqueue(url("/b"), 1, Scope::Recursive);
        frontier.complete();

        let got = waiter.await.unwrap();
        assert_eq!(got.unwrap().url.path(), "/b");
        frontier.complete();

        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_workers_pop_each_entry_once() {
        let frontier = Arc::new(Frontier::new(-1, -1));
        for i in 0..100 {
            frontier.enqueue(url(&format!("/page{}", i)), 0, Scope::Recursive);
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let frontier = frontier.clone();
            handles.push(tokio::spawn(async move {
                let mut popped = Vec::new();
                while let Some(entry) = frontier.next().await {
                    popped.push(entry.url.to_string());
                    frontier.complete();
                }
                popped
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }

        all.sort();
        all.dedup();
        assert_eq!(all.len(), 100);
    }
}
