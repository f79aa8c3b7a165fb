//! Sitelens: site discovery and internal-link-graph analysis
//!
//! This crate crawls a target website (sitemap-first, with a BFS fallback),
//! extracts per-page metadata, and derives a directed internal link graph
//! used for orphan detection, link-depth analysis, and anchor-text
//! diagnostics. Report rendering and LLM-based content analysis are external
//! consumers of its output.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod fetch;
pub mod graph;
pub mod output;
pub mod page;
pub mod render;
pub mod robots;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sitelens operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Crawling {url} is disallowed by robots.txt: {reason}")]
    RobotsDisallowed { url: String, reason: String },

    #[error("Root URL is unreachable: {url}")]
    RootUnreachable { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitelens operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{discover_pages, Discovery};
pub use graph::{analyze_links, LinkAnalysisReport};
pub use page::{PageRecord, PageSource};
pub use url::{extract_host, is_internal_host, normalize_url};
