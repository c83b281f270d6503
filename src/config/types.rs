use serde::Deserialize;

/// Default browser-like user agent, kept realistic to reduce bot-blocking
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Policy-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages to fetch in one session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of ranked URLs to return
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: usize,

    /// Number of frontier URLs dispatched per concurrent batch
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Starting minimum delay between requests to one host (milliseconds)
    #[serde(rename = "host-delay", default = "default_host_delay")]
    pub host_delay_ms: u64,

    /// Delay between crawl batches when the target host has no adapted delay
    /// (milliseconds)
    #[serde(rename = "batch-delay", default = "default_batch_delay")]
    pub batch_delay_ms: u64,

    /// Ceiling for exponential backoff after repeated 429s (milliseconds)
    #[serde(rename = "backoff-cap", default = "default_backoff_cap")]
    pub backoff_cap_ms: u64,

    /// Floor applied to a Retry-After delay (milliseconds)
    #[serde(rename = "retry-after-floor", default = "default_retry_after_floor")]
    pub retry_after_floor_ms: u64,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Ceiling on concurrent connections to the target
    #[serde(rename = "max-connections", default = "default_max_connections")]
    pub max_connections: usize,

    /// Idle connections kept alive per host
    #[serde(rename = "max-keepalive", default = "default_max_keepalive")]
    pub max_keepalive: usize,

    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_max_pages() -> u32 {
    300
}

fn default_max_results() -> usize {
    30
}

fn default_batch_size() -> usize {
    10
}

fn default_host_delay() -> u64 {
    2_000
}

fn default_batch_delay() -> u64 {
    3_000
}

fn default_backoff_cap() -> u64 {
    30_000
}

fn default_retry_after_floor() -> u64 {
    5_000
}

fn default_request_timeout() -> u64 {
    15_000
}

fn default_max_connections() -> usize {
    2
}

fn default_max_keepalive() -> usize {
    1
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_results: default_max_results(),
            batch_size: default_batch_size(),
            host_delay_ms: default_host_delay(),
            batch_delay_ms: default_batch_delay(),
            backoff_cap_ms: default_backoff_cap(),
            retry_after_floor_ms: default_retry_after_floor(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout(),
            max_connections: default_max_connections(),
            max_keepalive: default_max_keepalive(),
            user_agent: default_user_agent(),
        }
    }
}
