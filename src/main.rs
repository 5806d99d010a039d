//! Websift main entry point
//!
//! This is the command-line interface for the websift crawl-and-ingest
//! engine.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use websift::config::{load_config, Config};
use websift::crawler::RenderingFetcher;
use websift::ingest::JsonlSink;
use websift::url::RootSet;
use websift::Coordinator;

/// Websift: crawl websites and feed their text to an ingestion sink
///
/// Websift crawls the given start URLs within configurable depth, page,
/// and scope bounds, respecting robots.txt, extracts page and PDF text,
/// and submits overlapping text chunks to the configured sink.
#[derive(Parser, Debug)]
#[command(name = "websift")]
#[command(version)]
#[command(about = "Crawl websites and feed their text to an ingestion sink", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the given start URLs and ingest their text
    Crawl {
        /// Start URLs; each is crawled recursively within its domain and
        /// path prefix
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// Extra allowed roots: domains fetched as single pages when
        /// linked, never expanded
        #[arg(long, value_name = "URL")]
        allow: Vec<String>,

        /// Mark this run as scheduler-invoked (suppresses live progress
        /// notifications)
        #[arg(long)]
        scheduled: bool,
    },

    /// Check that the configured WebDriver endpoint accepts sessions
    SetupRenderer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl {
            urls,
            allow,
            scheduled,
        } => handle_crawl(config, urls, allow, scheduled).await,
        Command::SetupRenderer => handle_setup_renderer(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("websift=info,warn"),
            1 => EnvFilter::new("websift=debug,info"),
            2 => EnvFilter::new("websift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config: Config,
    urls: Vec<String>,
    allow: Vec<String>,
    scheduled: bool,
) -> anyhow::Result<()> {
    // Config-level extra roots and --allow flags are one pool.
    let mut extra_roots = config.crawler.allow.clone();
    extra_roots.extend(allow);

    let roots = RootSet::build(&urls, &extra_roots);
    tracing::info!(
        "Roots: {} recursive, {} single-page",
        roots.recursive_len(),
        roots.extra_len()
    );

    let command = format!("crawl {}", urls.join(" "));
    let output_path = config.ingest.output_path.clone();
    let sink = Arc::new(JsonlSink::create(Path::new(&output_path))?);

    let coordinator = Coordinator::new(config, roots, sink)?;
    match coordinator.run(&command, scheduled).await {
        Ok(report) => {
            println!("{}", report.summary());
            println!("Chunks written to {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the setup-renderer subcommand: probes the WebDriver endpoint
async fn handle_setup_renderer(config: &Config) -> anyhow::Result<()> {
    let endpoint = &config.renderer.webdriver_url;
    println!("Probing WebDriver endpoint: {}", endpoint);

    let renderer = RenderingFetcher::new(endpoint);
    match renderer.probe().await {
        Ok(()) => {
            println!("✓ WebDriver endpoint is ready");
            Ok(())
        }
        Err(e) => {
            tracing::error!("WebDriver endpoint is not usable: {}", e);
            Err(anyhow::anyhow!(
                "WebDriver endpoint {} is not usable: {}",
                endpoint,
                e
            ))
        }
    }
}
