//! Websift: a crawl-and-ingest engine
//!
//! This crate implements a bounded web crawler that discovers pages and PDF
//! documents from a set of start URLs, extracts their text, splits it into
//! overlapping chunks, and submits the chunks to a pluggable ingestion sink,
//! reporting per-run success/failure counts.

pub mod config;
pub mod crawler;
pub mod hooks;
pub mod ingest;
pub mod robots;
pub mod session;
pub mod url;

use thiserror::Error;

/// Main error type for websift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] ingest::IngestError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interactive runs are disabled while only-scheduled mode is active")]
    OnlyScheduled,

    #[error("No valid start URLs to seed the crawl")]
    EmptySeedSet,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for websift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunReport};
pub use hooks::{HookPoint, HookRegistry};
pub use ingest::{IngestSink, ProgressNotifier};
pub use session::SessionContext;
pub use url::{classify_url, extract_domain, normalize_url, RootSet, Scope};
