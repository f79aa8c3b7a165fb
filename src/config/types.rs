use serde::Deserialize;

/// Main configuration structure for Sitelens
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub audit: AuditTarget,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The site being audited
#[derive(Debug, Clone, Deserialize)]
pub struct AuditTarget {
    /// Domain whose internal link graph is analyzed (e.g. "example.com")
    pub domain: String,

    /// URL discovery starts from; defaults to https://{domain}/
    #[serde(rename = "start-url")]
    pub start_url: Option<String>,
}

/// Discovery behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Maximum number of pages to discover in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum BFS depth for the fallback crawl
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: usize,

    /// Cap on newly enqueued links per crawled page (bounded fan-out)
    #[serde(rename = "max-links-per-page", default = "default_max_links_per_page")]
    pub max_links_per_page: usize,

    /// Number of pages fetched concurrently in one batch
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Delay between batches in milliseconds (backpressure toward the target)
    #[serde(rename = "batch-delay-ms", default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Per-page request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for sitemap probe and child-sitemap fetches in seconds
    #[serde(rename = "sitemap-timeout-secs", default = "default_sitemap_timeout")]
    pub sitemap_timeout_secs: u64,
}

fn default_max_pages() -> usize {
    100
}

fn default_max_depth() -> usize {
    3
}

fn default_max_links_per_page() -> usize {
    20
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay_ms() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    10
}

fn default_sitemap_timeout() -> u64 {
    5
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            max_links_per_page: default_max_links_per_page(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            request_timeout_secs: default_request_timeout(),
            sitemap_timeout_secs: default_sitemap_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the auditor
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the auditor
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the auditor
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: Name/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the text summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
