use url::Url;

/// Extracts the scope-comparison domain from a URL
///
/// The host is lowercased, a leading `www.` is removed, and a non-default
/// port is kept (`example.com:8080`), so that two servers on the same host
/// but different ports classify as different domains while
/// `https://www.example.com/` and `https://example.com/` classify as the
/// same one. Returns None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use websift::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://example.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let host = match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    };
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns the authority (host plus non-default port) of a URL
///
/// Used as the robots-cache key. Unlike `extract_domain` the host is not
/// www-stripped: robots.txt is fetched from the host exactly as linked.
pub fn url_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_strips_www() {
        let url = Url::parse("https://www.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_keeps_other_subdomains() {
        let url = Url::parse("https://docs.example.com/guide").unwrap();
        assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
    }

    #[test]
    fn test_extract_uppercase_converted_to_lowercase() {
        let url = Url::parse("https://EXAMPLE.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_keeps_non_default_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com:8080".to_string()));
    }

    #[test]
    fn test_extract_drops_default_port() {
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_authority_without_port() {
        let url = Url::parse("https://example.com/page").unwrap();
        assert_eq!(url_authority(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_authority_with_port() {
        let url = Url::parse("http://127.0.0.1:4567/page").unwrap();
        assert_eq!(url_authority(&url), Some("127.0.0.1:4567".to_string()));
    }

    #[test]
    fn test_authority_keeps_www() {
        let url = Url::parse("https://www.example.com/page").unwrap();
        assert_eq!(url_authority(&url), Some("www.example.com".to_string()));
    }
}
