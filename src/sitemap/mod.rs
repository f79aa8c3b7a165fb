//! Sitemap location probing and fetching
//!
//! Probes the well-known candidate paths in order and hands parsed
//! documents back to the discovery session, which interleaves page analysis
//! with resolution. Child-sitemap failures are isolated per child.

mod parser;

pub use parser::{parse_sitemap, ParsedSitemap, SitemapEntry};

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Candidate sitemap paths, probed in order
pub const CANDIDATE_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/wp-sitemap.xml",
    "/sitemap",
];

/// A sitemap found at one of the candidate locations
#[derive(Debug)]
pub struct ProbedSitemap {
    /// The URL the sitemap was found at
    pub url: String,
    pub parsed: ParsedSitemap,
}

/// Probes the candidate paths and returns the first parseable sitemap
///
/// A 2xx response that does not contain a urlset or sitemapindex does not
/// stop probing; later candidates are still tried.
pub async fn probe(client: &Client, base: &Url, timeout: Duration) -> Option<ProbedSitemap> {
    for path in CANDIDATE_PATHS {
        let Ok(candidate) = base.join(path) else {
            continue;
        };
        let candidate = candidate.to_string();

        tracing::debug!("Probing sitemap candidate {}", candidate);
        if let Some(parsed) = fetch_and_parse(client, &candidate, timeout).await {
            tracing::info!("Found sitemap at {}", candidate);
            return Some(ProbedSitemap {
                url: candidate,
                parsed,
            });
        }
    }

    tracing::info!("No sitemap found for {}", base);
    None
}

/// Fetches one sitemap URL with a bounded timeout and parses it
///
/// Returns `None` on timeout, transport error, non-2xx status, or a body
/// that is not sitemap XML.
pub async fn fetch_and_parse(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Option<ParsedSitemap> {
    let response = match tokio::time::timeout(timeout, client.get(url).send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::debug!("Sitemap fetch failed for {}: {}", url, e);
            return None;
        }
        Err(_) => {
            tracing::debug!("Sitemap fetch timed out for {}", url);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Sitemap candidate {} answered {}", url, response.status());
        return None;
    }

    let body = match tokio::time::timeout(timeout, response.text()).await {
        Ok(Ok(body)) => body,
        _ => {
            tracing::debug!("Failed to read sitemap body from {}", url);
            return None;
        }
    };

    parse_sitemap(&body)
}
