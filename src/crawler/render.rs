//! WebDriver-based rendering collaborator
//!
//! The optional content-extraction strategy: pages are loaded in a real
//! browser session behind a WebDriver endpoint, so JavaScript-built content
//! is present in the returned source. The crawler treats this as just
//! another `PageFetcher`; when it fails, the worker falls back to the
//! primary HTTP fetcher rather than failing the page.

use crate::crawler::fetcher::{ContentKind, FetchError, FetchedPage, PageFetcher};
use async_trait::async_trait;
use fantoccini::ClientBuilder;
use std::time::Duration;
use url::Url;

/// Fetcher backed by a WebDriver session
pub struct RenderingFetcher {
    webdriver_url: String,
}

impl RenderingFetcher {
    pub fn new(webdriver_url: &str) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
        }
    }

    /// Verifies that the WebDriver endpoint accepts sessions
    ///
    /// Used by the `setup-renderer` command so a misconfigured endpoint is
    /// discovered before a crawl depends on it.
    pub async fn probe(&self) -> Result<(), FetchError> {
        let client = self.connect().await?;
        if let Err(e) = client.close().await {
            tracing::warn!("failed to close WebDriver probe session: {}", e);
        }
        Ok(())
    }

    async fn connect(&self) -> Result<fantoccini::Client, FetchError> {
        ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| FetchError::Renderer {
                url: self.webdriver_url.clone(),
                message: format!("failed to connect to WebDriver: {}", e),
            })
    }
}

#[async_trait]
impl PageFetcher for RenderingFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let rendered = tokio::time::timeout(timeout, async {
            let mut client = self.connect().await?;

            let navigation = async {
                client
                    .goto(url.as_str())
                    .await
                    .map_err(|e| FetchError::Renderer {
                        url: url.to_string(),
                        message: format!("navigation failed: {}", e),
                    })?;
                client.source().await.map_err(|e| FetchError::Renderer {
                    url: url.to_string(),
                    message: format!("failed to read page source: {}", e),
                })
            };

            let source = navigation.await;

            if let Err(e) = client.close().await {
                tracing::warn!("failed to close WebDriver session: {}", e);
            }

            source
        })
        .await;

        match rendered {
            Ok(Ok(source)) => Ok(FetchedPage {
                url: url.clone(),
                kind: ContentKind::Html,
                body: source,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }
}
