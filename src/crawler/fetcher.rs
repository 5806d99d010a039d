//! HTTP fetcher implementation
//!
//! This module defines the narrow fetch interface shared by the primary
//! HTTP fetcher and the optional rendering collaborator, plus the primary
//! implementation itself: a reqwest GET with per-page timeout, status and
//! content-type handling, and PDF text extraction.

use crate::config::UserAgentConfig;
use crate::url::path_extension;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connect timeout for the primary HTTP client
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Content kind of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

/// A successfully fetched page
///
/// `body` holds the raw HTML source for HTML pages and the extracted text
/// for PDFs.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub kind: ContentKind,
    pub body: String,
}

/// Errors a fetch strategy can produce
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("PDF extraction failed for {url}: {message}")]
    Pdf { url: String, message: String },

    #[error("Renderer error for {url}: {message}")]
    Renderer { url: String, message: String },
}

/// A fetch strategy
///
/// Both the primary HTTP fetcher and the rendering collaborator implement
/// this; the worker composes them in a fixed fallback order.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page within the given timeout
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// Builds the HTTP client shared by page fetches and robots.txt loads
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.full_string())
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// The primary fetcher: plain HTTP GET
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let is_pdf = content_type.contains("application/pdf")
            || path_extension(url).as_deref() == Some("pdf");

        if is_pdf {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| classify_reqwest_error(url, e))?;
            let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| FetchError::Pdf {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            Ok(FetchedPage {
                url: url.clone(),
                kind: ContentKind::Pdf,
                body: text,
            })
        } else {
            let body = response
                .text()
                .await
                .map_err(|e| classify_reqwest_error(url, e))?;
            Ok(FetchedPage {
                url: url.clone(),
                kind: ContentKind::Html,
                body,
            })
        }
    }
}

fn classify_reqwest_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}
