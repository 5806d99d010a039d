use serde::Deserialize;

/// Main configuration structure for websift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Crawler behavior configuration: the per-run crawl policy
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth from the seeds (-1 = unbounded, 0 = seeds only)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: i32,

    /// Maximum number of pages fetched per run (-1 = unbounded)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: i64,

    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-page fetch timeout in seconds (5-300)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Whether robots.txt policies are honored
    #[serde(rename = "follow-robots", default = "default_true")]
    pub follow_robots: bool,

    /// Whether linked PDF documents are fetched and ingested
    #[serde(rename = "ingest-pdf", default)]
    pub ingest_pdf: bool,

    /// Strip query strings from discovered URLs
    #[serde(rename = "skip-get-params", default)]
    pub skip_get_params: bool,

    /// Extra path extensions to exclude, on top of the built-in set
    #[serde(rename = "skip-extensions", default)]
    pub skip_extensions: Vec<String>,

    /// Reject interactive runs; only the scheduler may start a crawl
    #[serde(rename = "only-scheduled", default)]
    pub only_scheduled: bool,

    /// Extra allowed roots: domains fetched as single pages when linked
    #[serde(default)]
    pub allow: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            workers: default_workers(),
            page_timeout: default_page_timeout(),
            follow_robots: true,
            ingest_pdf: false,
            skip_get_params: false,
            skip_extensions: Vec::new(),
            only_scheduled: false,
            allow: Vec::new(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Composes the outbound User-Agent string
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn full_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Optional WebDriver-based rendering collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Try the renderer first for HTML pages, falling back to plain HTTP
    #[serde(default)]
    pub enabled: bool,

    /// URL of the WebDriver endpoint
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Retry thin-looking pages through the renderer even when it is not
    /// the primary strategy
    #[serde(rename = "fallback-on-empty", default)]
    pub fallback_on_empty: bool,

    /// Extracted text shorter than this is considered "needs rendering"
    #[serde(rename = "min-text-length", default = "default_min_text_length")]
    pub min_text_length: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webdriver_url: default_webdriver_url(),
            fallback_on_empty: false,
            min_text_length: default_min_text_length(),
        }
    }
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Size of each text chunk
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks (must be smaller than the size)
    #[serde(rename = "chunk-overlap", default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Where the default JSONL sink writes submitted chunks
    #[serde(rename = "output-path", default = "default_output_path")]
    pub output_path: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            output_path: default_output_path(),
        }
    }
}

/// Daily schedule settings, consumed by the external scheduler
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Command to run on schedule (empty = no scheduled crawl)
    #[serde(default)]
    pub command: String,

    /// Hour of day, UTC (0-23)
    #[serde(default = "default_schedule_hour")]
    pub hour: u8,

    /// Minute (0-59)
    #[serde(default)]
    pub minute: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            hour: default_schedule_hour(),
            minute: 0,
        }
    }
}

fn default_max_depth() -> i32 {
    -1
}

fn default_max_pages() -> i64 {
    -1
}

fn default_workers() -> usize {
    1
}

fn default_page_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_min_text_length() -> usize {
    40
}

fn default_chunk_size() -> usize {
    512
}

fn default_chunk_overlap() -> usize {
    128
}

fn default_output_path() -> String {
    "./chunks.jsonl".to_string()
}

fn default_schedule_hour() -> u8 {
    3
}
