//! Page records produced by discovery
//!
//! A [`PageRecord`] is created once per canonical URL when it is first
//! fetched (or sitemap-enumerated) and is not mutated afterwards. Records
//! live for one audit run; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a page entered the discovered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    /// Listed in the site's XML sitemap
    Sitemap,
    /// Found by the fallback BFS crawl
    Crawl,
    /// Reached through navigation (e.g. a redirect target)
    Navigation,
}

/// Redirect metadata captured when the initial response was a 3xx
#[derive(Debug, Clone, Serialize)]
pub struct RedirectInfo {
    /// The URL that answered with the redirect
    pub original_url: String,
    /// Resolved absolute target of the Location header
    pub final_url: String,
    /// The original 3xx status (301/302/307/308)
    pub status_code: u16,
    /// True for 301 and 308
    pub permanent: bool,
}

/// Optional sitemap attributes attached to sitemap-discovered pages
#[derive(Debug, Clone, Default, Serialize)]
pub struct SitemapMeta {
    pub last_modified: Option<DateTime<Utc>>,
    pub priority: Option<f32>,
    pub change_freq: Option<String>,
}

/// A link extracted from a page, prior to graph filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedLink {
    /// Absolute URL the link points to (resolved against the page URL)
    pub target: String,
    /// Visible anchor text, whitespace-collapsed
    pub anchor_text: String,
    /// Whether the link carries rel="nofollow"
    pub is_nofollow: bool,
}

/// One fetched or sitemap-known URL
///
/// `url` is always the canonicalized form; raw variants are normalized
/// before use as a map key. A `status_code` of 0 means the fetch failed at
/// the transport layer ("unreachable"), distinct from HTTP 4xx/5xx.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub status_code: u16,
    pub has_title: bool,
    pub has_description: bool,
    pub has_h1: bool,
    pub image_count: usize,
    /// Outgoing links with anchor text, in document order
    pub outgoing_links: Vec<ExtractedLink>,
    pub source: PageSource,
    pub sitemap: SitemapMeta,
    pub redirect: Option<RedirectInfo>,
}

impl PageRecord {
    /// A degraded record for a URL that could not be fetched
    ///
    /// Transport errors and timeouts produce this rather than an `Err`, so
    /// the page still counts toward discovery totals.
    pub fn unreachable(url: String, source: PageSource) -> Self {
        Self {
            url,
            title: "Error loading page".to_string(),
            status_code: 0,
            has_title: false,
            has_description: false,
            has_h1: false,
            image_count: 0,
            outgoing_links: Vec::new(),
            source,
            sitemap: SitemapMeta::default(),
            redirect: None,
        }
    }

    /// True if the fetch failed at the transport layer
    pub fn is_unreachable(&self) -> bool {
        self.status_code == 0
    }

    /// True if the recorded HTTP status is a client or server error
    pub fn is_http_error(&self) -> bool {
        self.status_code >= 400
    }
}
