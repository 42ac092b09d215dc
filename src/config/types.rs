use serde::Deserialize;

use crate::url::DEFAULT_TRACKING_PARAMS;

/// Main configuration structure for Dredge
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of independent crawl workers
    pub workers: u32,

    /// Seed URLs injected into the frontier at startup
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Per-request fetch timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum outbound links extracted per page
    #[serde(rename = "max-outlinks-per-page")]
    pub max_outlinks_per_page: usize,

    /// Sleep between polls when the frontier is empty (milliseconds)
    #[serde(rename = "idle-poll-ms", default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,

    /// Tracking query parameters stripped during canonicalization
    #[serde(rename = "tracking-params", default = "default_tracking_params")]
    pub tracking_params: Vec<String>,
}

fn default_idle_poll_ms() -> u64 {
    200
}

fn default_tracking_params() -> Vec<String> {
    DEFAULT_TRACKING_PARAMS
        .iter()
        .map(|s| s.to_string())
        .collect()
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
    /// Formats the full user agent string: `name/version (+url; email)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Search server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(rename = "bind-addr")]
    pub bind_addr: String,

    /// Default number of hits per result page
    #[serde(rename = "results-per-page", default = "default_results_per_page")]
    pub results_per_page: usize,

    /// Upper bound for the `limit` query parameter
    #[serde(rename = "max-per-page", default = "default_max_per_page")]
    pub max_per_page: usize,

    /// Upper bound for the `page` query parameter
    #[serde(rename = "max-page", default = "default_max_page")]
    pub max_page: usize,

    /// Queries longer than this are truncated
    #[serde(rename = "max-query-len", default = "default_max_query_len")]
    pub max_query_len: usize,
}

fn default_results_per_page() -> usize {
    10
}

fn default_max_per_page() -> usize {
    50
}

fn default_max_page() -> usize {
    1000
}

fn default_max_query_len() -> usize {
    512
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
