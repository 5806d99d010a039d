//! Crawler module: fetching, traversal, and run orchestration
//!
//! This module contains the core crawling machinery:
//! - The shared frontier (queue, visited set, bound counters)
//! - HTTP fetching and the optional WebDriver rendering fallback
//! - HTML parsing and link extraction
//! - The concurrent fetch worker pool
//! - The coordinator that drives a whole crawl-and-ingest run

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod render;
mod worker;

pub use coordinator::{Coordinator, RunReport};
pub use fetcher::{build_http_client, ContentKind, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_page, ParsedPage};
pub use render::RenderingFetcher;
