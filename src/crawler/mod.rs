//! Fallback BFS crawler
//!
//! Used when a site has no parseable sitemap. Traversal is breadth-first
//! from the start URL, bounded by total pages, depth, and per-page fan-out;
//! fetches run in the same batched fashion as sitemap-driven discovery.

mod frontier;

pub use frontier::{CrawlState, QueuedPage};

use crate::config::DiscoveryConfig;
use crate::fetch::{analyze_chunked, analyze_page, AnalyzeOptions};
use crate::page::{PageRecord, PageSource};
use crate::render::Renderer;
use crate::url::{extract_host, is_internal_host, normalize_url};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Crawls a site breadth-first starting at `start_url`
///
/// The start page may use the rendered-DOM path when a renderer is
/// provided; every later page uses the plain fetch. Terminates when the
/// frontier empties, `max_pages` is reached, or all remaining queued pages
/// exceed `max_depth`.
///
/// # Arguments
///
/// * `start_url` - Canonical URL to begin from
/// * `state` - Session-scoped visited/frontier state, owned by the caller
pub async fn crawl(
    client: &Client,
    config: &DiscoveryConfig,
    domain: &str,
    start_url: &str,
    renderer: Option<&dyn Renderer>,
    state: &mut CrawlState,
) -> Vec<PageRecord> {
    let batch_delay = Duration::from_millis(config.batch_delay_ms);
    let mut pages: Vec<PageRecord> = Vec::new();

    // Depth 0: the start page alone, optionally rendered
    state.mark_visited(start_url);
    let root = analyze_page(
        client,
        start_url,
        AnalyzeOptions {
            source: Some(PageSource::Crawl),
            renderer,
            ..Default::default()
        },
    )
    .await;

    if root.is_unreachable() {
        state.mark_failed(start_url);
    }
    if config.max_depth > 0 {
        enqueue_internal_links(&root, domain, 0, config, state);
    }
    pages.push(root);

    while pages.len() < config.max_pages {
        let remaining = config.max_pages - pages.len();
        // Clamped like analyze_chunked: a hand-built config with
        // batch_size = 0 must still make progress.
        let limit = config.batch_size.min(remaining).max(1);

        // Visited is claimed on pop, so duplicate frontier entries collapse
        // here rather than at enqueue time.
        let mut batch: Vec<QueuedPage> = Vec::new();
        while batch.len() < limit {
            let Some(queued) = state.pop() else {
                break;
            };
            if queued.depth > config.max_depth {
                continue;
            }
            if !state.mark_visited(&queued.url) {
                continue;
            }
            batch.push(queued);
        }

        if batch.is_empty() {
            if state.frontier_len() == 0 {
                break;
            }
            continue;
        }

        let depths: Vec<(String, usize)> = batch
            .iter()
            .map(|q| (q.url.clone(), q.depth))
            .collect();
        let jobs: Vec<(String, AnalyzeOptions)> = batch
            .into_iter()
            .map(|q| {
                (
                    q.url,
                    AnalyzeOptions {
                        source: Some(PageSource::Crawl),
                        ..Default::default()
                    },
                )
            })
            .collect();

        let records = analyze_chunked(client, jobs, config.batch_size, batch_delay).await;

        for record in records {
            if record.is_unreachable() {
                state.mark_failed(&record.url);
            }
            let depth = depths
                .iter()
                .find(|(url, _)| *url == record.url)
                .map(|(_, d)| *d)
                .unwrap_or(config.max_depth);
            if depth < config.max_depth {
                enqueue_internal_links(&record, domain, depth, config, state);
            }
            pages.push(record);
        }

        if state.frontier_len() > 0 && !batch_delay.is_zero() {
            tokio::time::sleep(batch_delay).await;
        }
    }

    tracing::info!(
        "Fallback crawl finished: {} pages, {} fetch failures, {} still queued",
        pages.len(),
        state.failure_count(),
        state.frontier_len()
    );

    pages
}

/// Enqueues a page's same-domain links at the next depth
///
/// Fan-out is capped per page so a link-farm page cannot explode the
/// frontier. Targets are normalized before dedup.
fn enqueue_internal_links(
    record: &PageRecord,
    domain: &str,
    depth: usize,
    config: &DiscoveryConfig,
    state: &mut CrawlState,
) {
    let mut added = 0;
    let mut seen_on_page: HashSet<String> = HashSet::new();

    for link in &record.outgoing_links {
        if added >= config.max_links_per_page {
            break;
        }

        let Ok(parsed) = Url::parse(&link.target) else {
            continue;
        };
        let Some(host) = extract_host(&parsed) else {
            continue;
        };
        if !is_internal_host(&host, domain) {
            continue;
        }

        let Ok(normalized) = normalize_url(&link.target) else {
            continue;
        };
        if state.is_visited(&normalized) || !seen_on_page.insert(normalized.clone()) {
            continue;
        }

        state.enqueue(normalized, depth + 1);
        added += 1;
    }
}
