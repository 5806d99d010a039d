//! HTML parser for extracting text, links, and metadata
//!
//! This module turns a fetched HTML document into the pieces the crawler
//! needs: the page title, the visible body text (whitespace-normalized for
//! chunking), and candidate outbound hrefs.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible body text, whitespace-normalized
    pub text: String,

    /// Candidate hrefs exactly as they appear in the document
    ///
    /// Relative references are not resolved here; the worker resolves them
    /// against the page URL during normalization.
    pub links: Vec<String>,
}

/// Parses an HTML document
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` tags.
///
/// **Exclude:** `javascript:`, `mailto:`, `tel:` and `data:` hrefs,
/// fragment-only hrefs (same-page anchors), empty hrefs, and links carrying
/// the `download` attribute.
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts and whitespace-normalizes the visible body text
fn extract_text(document: &Html) -> String {
    let body_selector = match Selector::parse("body") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    document
        .select(&body_selector)
        .flat_map(|node| node.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts candidate link hrefs from the document
fn extract_links(document: &Html) -> Vec<String> {
    let a_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();
    for element in document.select(&a_selector) {
        // Links with the download attribute point at files, not pages.
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
                || href.starts_with("tel:")
                || href.starts_with("data:")
            {
                continue;
            }
            links.push(href.to_string());
        }
    }
    links
}
