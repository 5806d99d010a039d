//! URL handling module for websift
//!
//! This module provides URL normalization, domain extraction, wildcard
//! matching, and scope classification of discovered URLs against the
//! configured root set.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, url_authority};
pub use matcher::matches_wildcard;
pub use normalize::{normalize_url, path_extension, NormalizeOptions, NormalizedUrl};
pub use normalize::DEFAULT_SKIP_EXTENSIONS;

use url::Url;

/// Scope classification for a discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Under a recursive root: fetched and expanded
    Recursive,
    /// Under an extra allowed root: fetched once, never expanded
    SinglePage,
    /// Outside all roots: dropped silently
    OutOfScope,
}

impl Scope {
    /// Returns true if URLs with this scope are fetched at all
    pub fn is_fetchable(&self) -> bool {
        !matches!(self, Self::OutOfScope)
    }

    /// Returns true if links found on pages with this scope are followed
    pub fn expands(&self) -> bool {
        matches!(self, Self::Recursive)
    }
}

/// A starting URL whose domain and path prefix are expanded by traversal
#[derive(Debug, Clone)]
pub struct RecursiveRoot {
    /// The seed URL itself
    pub url: Url,

    /// Scope-comparison domain of the seed
    pub domain: String,

    /// Path prefix under which links are followed
    pub path_prefix: String,
}

/// The set of roots bounding a crawl
///
/// Recursive roots come from the start URLs; extra roots are domain
/// patterns from which single pages may be fetched when linked, but which
/// are never expanded.
#[derive(Debug, Clone, Default)]
pub struct RootSet {
    recursive: Vec<RecursiveRoot>,
    extra: Vec<String>,
}

impl RootSet {
    /// Builds a root set from start URLs and extra-root entries
    ///
    /// Invalid entries are logged as validation warnings and skipped, never
    /// fatal: a run can proceed as long as at least one start URL survives
    /// (the caller checks `seeds()` for emptiness).
    ///
    /// Extra roots accept either a full URL (its domain is used) or a bare
    /// domain pattern, optionally with a `*.` wildcard prefix.
    pub fn build(start_urls: &[String], extra_roots: &[String]) -> Self {
        let mut recursive = Vec::new();
        for raw in start_urls {
            match parse_recursive_root(raw) {
                Ok(root) => recursive.push(root),
                Err(reason) => {
                    tracing::warn!(
                        event = "invalid_start_url",
                        url = %raw,
                        reason = %reason,
                        "skipping malformed start URL"
                    );
                }
            }
        }

        let mut extra = Vec::new();
        for raw in extra_roots {
            match parse_extra_root(raw) {
                Ok(pattern) => extra.push(pattern),
                Err(reason) => {
                    tracing::warn!(
                        event = "invalid_extra_root",
                        entry = %raw,
                        reason = %reason,
                        "skipping malformed extra root"
                    );
                }
            }
        }

        Self { recursive, extra }
    }

    /// The seed URLs (one per surviving start URL)
    pub fn seeds(&self) -> impl Iterator<Item = &Url> {
        self.recursive.iter().map(|r| &r.url)
    }

    /// Number of recursive roots
    pub fn recursive_len(&self) -> usize {
        self.recursive.len()
    }

    /// Number of extra allowed roots
    pub fn extra_len(&self) -> usize {
        self.extra.len()
    }
}

/// Classifies a URL against the root set
///
/// A URL is `Recursive` when it lies under a recursive root's domain and
/// path prefix, `SinglePage` when its domain matches an extra-root pattern,
/// and `OutOfScope` otherwise. Recursive roots take precedence.
pub fn classify_url(url: &Url, roots: &RootSet) -> Scope {
    let domain = match extract_domain(url) {
        Some(d) => d,
        None => return Scope::OutOfScope,
    };

    for root in &roots.recursive {
        if domain == root.domain && url.path().starts_with(&root.path_prefix) {
            return Scope::Recursive;
        }
    }

    for pattern in &roots.extra {
        if matches_wildcard(pattern, &domain) {
            return Scope::SinglePage;
        }
    }

    Scope::OutOfScope
}

fn parse_recursive_root(raw: &str) -> Result<RecursiveRoot, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    let domain = extract_domain(&url).ok_or_else(|| "missing host".to_string())?;

    // "/docs/" and "/docs" bound the same subtree; the root path bounds
    // the whole domain.
    let path = url.path();
    let path_prefix = if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_string()
    } else {
        path.to_string()
    };

    Ok(RecursiveRoot {
        url,
        domain,
        path_prefix,
    })
}

fn parse_extra_root(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty entry".to_string());
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        let url = Url::parse(raw).map_err(|e| e.to_string())?;
        return extract_domain(&url).ok_or_else(|| "missing host".to_string());
    }

    let pattern = raw.to_lowercase();
    let domain_part = pattern.strip_prefix("*.").unwrap_or(&pattern);
    if domain_part.is_empty()
        || !domain_part
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(format!("invalid domain pattern '{}'", raw));
    }

    Ok(pattern)
}
