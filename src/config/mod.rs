//! Configuration module for websift
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The validated `Config` is the resolved crawl policy consumed by
//! the coordinator.
//!
//! # Example
//!
//! ```no_run
//! use websift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, IngestConfig, RendererConfig, ScheduleConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::load_config;
