use crate::UrlError;
use url::Url;

/// File extensions that are never worth fetching, recorded lowercase.
///
/// PDFs are deliberately absent: whether a PDF is fetched is a policy
/// decision made by the worker, not a normalization concern.
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "zip", "ods", "odt", "xls", "p7m",
    "rar", "mp3", "xml", "7z", "exe",
];

/// Options controlling URL normalization
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Strip the query string entirely (skip-get-params mode)
    pub skip_get_params: bool,

    /// Path extensions (lowercase, without the dot) to exclude
    pub skip_extensions: Vec<String>,
}

impl NormalizeOptions {
    /// Builds options from the default extension list plus extras
    pub fn with_extra_extensions(skip_get_params: bool, extra: &[String]) -> Self {
        let mut skip_extensions: Vec<String> = DEFAULT_SKIP_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .collect();
        for ext in extra {
            let ext = ext.trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !skip_extensions.contains(&ext) {
                skip_extensions.push(ext);
            }
        }
        Self {
            skip_get_params,
            skip_extensions,
        }
    }
}

/// Outcome of normalizing a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedUrl {
    /// The canonical form of the URL
    Canonical(Url),

    /// The URL's path extension is in the excluded set
    Excluded { extension: String },
}

/// Normalizes a raw href into its canonical crawl form
///
/// # Normalization Steps
///
/// 1. Resolve relative references against `base` (when provided)
/// 2. Reject non-HTTP(S) schemes and host-less URLs
/// 3. Remove the fragment
/// 4. Remove the query string when `skip_get_params` is set
/// 5. Check the path extension (case-insensitive, query ignored) against
///    the excluded-extension set
///
/// # Arguments
///
/// * `raw` - The URL or href to normalize
/// * `base` - Base URL for resolving relative references
/// * `opts` - Normalization options
///
/// # Returns
///
/// * `Ok(NormalizedUrl::Canonical)` - The canonical URL
/// * `Ok(NormalizedUrl::Excluded)` - Well-formed but excluded by extension
/// * `Err(UrlError)` - Malformed or out-of-protocol URL
pub fn normalize_url(
    raw: &str,
    base: Option<&Url>,
    opts: &NormalizeOptions,
) -> Result<NormalizedUrl, UrlError> {
    let raw = raw.trim();

    let mut url = match base {
        Some(base) => base.join(raw).map_err(|e| UrlError::Parse(e.to_string()))?,
        None => Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if opts.skip_get_params {
        url.set_query(None);
    }

    if let Some(extension) = path_extension(&url) {
        if opts.skip_extensions.contains(&extension) {
            return Ok(NormalizedUrl::Excluded { extension });
        }
    }

    Ok(NormalizedUrl::Canonical(url))
}

/// Returns the lowercase extension of the URL's path, if any
///
/// The query string and fragment never participate, so
/// `/report.PDF?dl=1` yields `pdf`.
pub fn path_extension(url: &Url) -> Option<String> {
    let path = url.path();
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> NormalizeOptions {
        NormalizeOptions::with_extra_extensions(false, &[])
    }

    fn canonical(result: NormalizedUrl) -> Url {
        match result {
            NormalizedUrl::Canonical(url) => url,
            other => panic!("expected canonical URL, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section", None, &opts()).unwrap();
        assert_eq!(canonical(result).as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_kept_by_default() {
        let result = normalize_url("https://example.com/page?a=1", None, &opts()).unwrap();
        assert_eq!(canonical(result).as_str(), "https://example.com/page?a=1");
    }

    #[test]
    fn test_query_stripped_in_skip_get_params_mode() {
        let opts = NormalizeOptions::with_extra_extensions(true, &[]);
        let result = normalize_url("https://example.com/page?a=1&b=2", None, &opts).unwrap();
        assert_eq!(canonical(result).as_str(), "https://example.com/page");
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let base = Url::parse("https://example.com/docs/intro").unwrap();
        let result = normalize_url("chapter2", Some(&base), &opts()).unwrap();
        assert_eq!(
            canonical(result).as_str(),
            "https://example.com/docs/chapter2"
        );
    }

    #[test]
    fn test_resolve_absolute_path_against_base() {
        let base = Url::parse("https://example.com/docs/intro").unwrap();
        let result = normalize_url("/about", Some(&base), &opts()).unwrap();
        assert_eq!(canonical(result).as_str(), "https://example.com/about");
    }

    #[test]
    fn test_excluded_extension() {
        let result = normalize_url("https://example.com/logo.png", None, &opts()).unwrap();
        assert_eq!(
            result,
            NormalizedUrl::Excluded {
                extension: "png".to_string()
            }
        );
    }

    #[test]
    fn test_excluded_extension_case_insensitive() {
        let result = normalize_url("https://example.com/archive.ZIP", None, &opts()).unwrap();
        assert_eq!(
            result,
            NormalizedUrl::Excluded {
                extension: "zip".to_string()
            }
        );
    }

    #[test]
    fn test_extension_checked_on_path_not_query() {
        let result = normalize_url("https://example.com/page?file=a.png", None, &opts()).unwrap();
        assert!(matches!(result, NormalizedUrl::Canonical(_)));
    }

    #[test]
    fn test_pdf_not_excluded_by_default() {
        let result = normalize_url("https://example.com/report.pdf", None, &opts()).unwrap();
        assert!(matches!(result, NormalizedUrl::Canonical(_)));
    }

    #[test]
    fn test_extra_extensions_extend_defaults() {
        let opts = NormalizeOptions::with_extra_extensions(false, &["docx".to_string()]);
        let result = normalize_url("https://example.com/spec.docx", None, &opts).unwrap();
        assert_eq!(
            result,
            NormalizedUrl::Excluded {
                extension: "docx".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/file", None, &opts());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url", None, &opts());
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_path_extension() {
        let url = Url::parse("https://example.com/dir/report.PDF?dl=1").unwrap();
        assert_eq!(path_extension(&url), Some("pdf".to_string()));

        let url = Url::parse("https://example.com/dir/page").unwrap();
        assert_eq!(path_extension(&url), None);

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(path_extension(&url), None);
    }
}
