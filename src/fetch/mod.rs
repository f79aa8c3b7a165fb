//! HTTP fetching and page analysis
//!
//! Requests are issued with redirect following disabled so the original
//! status code of every page is captured; redirect targets are fetched as an
//! explicit second step by the analyzer.

mod analyzer;
mod extract;

pub use analyzer::{analyze_page, AnalyzeOptions};
pub use extract::{count_images, extract_links, extract_title, has_description, has_h1};

use crate::page::PageRecord;
use futures::future::join_all;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds the HTTP client used for all audit requests
///
/// Redirects are never followed automatically; the analyzer resolves them
/// itself so 3xx statuses can be reported instead of masked.
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
/// * `timeout_secs` - Total per-request timeout in seconds
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Analyzes a set of URLs in fixed-size concurrent batches
///
/// Batches are awaited with all-settled semantics: `analyze_page` is total,
/// so one slow or failing page never aborts its siblings. A delay between
/// batches keeps request pressure on the target bounded.
pub async fn analyze_chunked(
    client: &Client,
    jobs: Vec<(String, AnalyzeOptions<'_>)>,
    batch_size: usize,
    batch_delay: Duration,
) -> Vec<PageRecord> {
    let batch_size = batch_size.max(1);
    let total = jobs.len();
    let mut records = Vec::with_capacity(total);

    let mut jobs = jobs.into_iter().peekable();
    while jobs.peek().is_some() {
        let batch: Vec<_> = jobs.by_ref().take(batch_size).collect();
        let futures = batch
            .into_iter()
            .map(|(url, opts)| async move { analyze_page(client, &url, opts).await });

        records.extend(join_all(futures).await);
        tracing::debug!("Analyzed {}/{} pages", records.len(), total);

        if jobs.peek().is_some() && !batch_delay.is_zero() {
            tokio::time::sleep(batch_delay).await;
        }
    }

    records
}
