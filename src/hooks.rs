//! Run lifecycle extension points
//!
//! Three named hook points bracket a run: before any fetching starts, after
//! fetching ends but before ingestion starts, and after ingestion ends.
//! Callbacks receive the live session context and may return extra fields
//! to merge into it. A failing callback is logged and treated as a no-op;
//! it never aborts the run.

use crate::session::SessionContext;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by a hook callback
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),
}

/// The three extension points of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Before any fetching starts
    BeforeScrape,
    /// After all fetching has terminated, before ingestion side effects
    AfterCrawl,
    /// After ingestion ends
    AfterIngestion,
}

impl HookPoint {
    /// The wire name of the hook point
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeforeScrape => "before-scrape",
            Self::AfterCrawl => "after-crawl",
            Self::AfterIngestion => "after-ingestion",
        }
    }
}

/// Fields a callback may return for merging into the session context
pub type HookFields = HashMap<String, Value>;

type HookCallback =
    Box<dyn Fn(&SessionContext) -> Result<Option<HookFields>, HookError> + Send + Sync>;

struct RegisteredHook {
    point: HookPoint,
    name: String,
    callback: HookCallback,
}

/// Registry of externally supplied hook callbacks, invoked by name and
/// isolated from each other's failures
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<RegisteredHook>,
}

impl HookRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for a hook point
    ///
    /// Callbacks registered for the same point run in registration order.
    pub fn register<F>(&mut self, point: HookPoint, name: &str, callback: F)
    where
        F: Fn(&SessionContext) -> Result<Option<HookFields>, HookError> + Send + Sync + 'static,
    {
        self.hooks.push(RegisteredHook {
            point,
            name: name.to_string(),
            callback: Box::new(callback),
        });
    }

    /// Invokes all callbacks registered for a hook point
    ///
    /// Returned fields are merged into the session immediately, so later
    /// callbacks observe the merges of earlier ones. A callback error is
    /// caught, logged, and skipped.
    pub fn invoke(&self, point: HookPoint, session: &mut SessionContext) {
        for hook in self.hooks.iter().filter(|h| h.point == point) {
            match (hook.callback)(session) {
                Ok(Some(fields)) => {
                    tracing::debug!(
                        hook = point.name(),
                        name = %hook.name,
                        fields = fields.len(),
                        "hook returned context fields"
                    );
                    session.merge_extra(fields);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        event = "hook_failed",
                        hook = point.name(),
                        name = %hook.name,
                        error = %e,
                        "hook callback failed, continuing"
                    );
                }
            }
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the registry has no callbacks
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn create_test_session() -> SessionContext {
        let config: Config = toml::from_str(
            r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#,
        )
        .unwrap();
        SessionContext::new("crawl", false, &config)
    }

    #[test]
    fn test_hook_point_names() {
        assert_eq!(HookPoint::BeforeScrape.name(), "before-scrape");
        assert_eq!(HookPoint::AfterCrawl.name(), "after-crawl");
        assert_eq!(HookPoint::AfterIngestion.name(), "after-ingestion");
    }

    #[test]
    fn test_returned_fields_merged() {
        let mut registry = HookRegistry::new();
        registry.register(HookPoint::BeforeScrape, "tagger", |_session| {
            let mut fields = HashMap::new();
            fields.insert("tag".to_string(), json!("alpha"));
            Ok(Some(fields))
        });

        let mut session = create_test_session();
        registry.invoke(HookPoint::BeforeScrape, &mut session);

        assert_eq!(session.extra.get("tag"), Some(&json!("alpha")));
    }

    #[test]
    fn test_error_is_isolated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut registry = HookRegistry::new();
        registry.register(HookPoint::AfterCrawl, "broken", |_session| {
            Err(HookError::Failed("boom".to_string()))
        });
        registry.register(HookPoint::AfterCrawl, "counter", move |_session| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });

        let mut session = create_test_session();
        registry.invoke(HookPoint::AfterCrawl, &mut session);

        // The failing callback did not stop the next one.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_later_callbacks_see_earlier_merges() {
        let mut registry = HookRegistry::new();
        registry.register(HookPoint::AfterIngestion, "first", |_session| {
            let mut fields = HashMap::new();
            fields.insert("stage".to_string(), json!("one"));
            Ok(Some(fields))
        });
        registry.register(HookPoint::AfterIngestion, "second", |session| {
            assert_eq!(session.extra.get("stage"), Some(&json!("one")));
            let mut fields = HashMap::new();
            fields.insert("stage".to_string(), json!("two"));
            Ok(Some(fields))
        });

        let mut session = create_test_session();
        registry.invoke(HookPoint::AfterIngestion, &mut session);

        assert_eq!(session.extra.get("stage"), Some(&json!("two")));
    }

    #[test]
    fn test_only_matching_point_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut registry = HookRegistry::new();
        registry.register(HookPoint::BeforeScrape, "counter", move |_session| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });

        let mut session = create_test_session();
        registry.invoke(HookPoint::AfterCrawl, &mut session);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        registry.invoke(HookPoint::BeforeScrape, &mut session);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
