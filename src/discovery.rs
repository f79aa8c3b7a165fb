//! Discovery session orchestration
//!
//! One [`Discovery`] instance runs one audit: robots gate first, then
//! sitemap-driven enumeration, then the fallback BFS crawl when no sitemap
//! resolves. All state is instance-local; concurrent audits of different
//! domains must use independent sessions.

use crate::config::{Config, DiscoveryConfig};
use crate::crawler::{self, CrawlState};
use crate::fetch::{analyze_chunked, build_http_client, AnalyzeOptions};
use crate::page::{PageRecord, PageSource, SitemapMeta};
use crate::render::Renderer;
use crate::robots;
use crate::sitemap::{self, ParsedSitemap, SitemapEntry};
use crate::url::normalize_url;
use crate::{AuditError, Result};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Output of one discovery run
#[derive(Debug)]
pub struct DiscoveryResult {
    /// All discovered pages, in discovery order
    pub pages: Vec<PageRecord>,
    /// The sitemap the pages came from, when one resolved
    pub sitemap_url: Option<String>,
}

/// A single discovery session for one domain
pub struct Discovery<'a> {
    client: Client,
    config: DiscoveryConfig,
    domain: String,
    start_url: String,
    user_agent: String,
    renderer: Option<&'a dyn Renderer>,
    state: CrawlState,
}

impl<'a> Discovery<'a> {
    /// Creates a session for the configured audit target
    pub fn new(config: &Config, renderer: Option<&'a dyn Renderer>) -> Result<Self> {
        let raw_start = config
            .audit
            .start_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/", config.audit.domain));
        let start_url = normalize_url(&raw_start)?;

        let user_agent = config.user_agent.header_value();
        let client = build_http_client(&user_agent, config.discovery.request_timeout_secs)?;

        Ok(Self {
            client,
            config: config.discovery.clone(),
            domain: config.audit.domain.to_lowercase(),
            start_url,
            user_agent,
            renderer,
            state: CrawlState::new(),
        })
    }

    /// Runs discovery to completion
    ///
    /// # Errors
    ///
    /// * [`AuditError::RobotsDisallowed`] when robots.txt forbids the start
    ///   URL (fail-closed; nothing is fetched beyond robots.txt)
    /// * [`AuditError::RootUnreachable`] when no sitemap resolves and the
    ///   start URL cannot be fetched
    ///
    /// Per-page failures never abort the run; they surface as status-0
    /// records.
    pub async fn run(mut self) -> Result<DiscoveryResult> {
        let base = Url::parse(&self.start_url)?;

        let verdict = robots::check_start_url(&self.client, &base, &self.user_agent).await;
        if !verdict.allowed {
            return Err(AuditError::RobotsDisallowed {
                url: self.start_url,
                reason: verdict
                    .reason
                    .unwrap_or_else(|| "disallowed by robots.txt".to_string()),
            });
        }
        if let Some(delay) = verdict.crawl_delay {
            tracing::info!("robots.txt requests a crawl delay of {}s", delay);
        }

        let sitemap_timeout = Duration::from_secs(self.config.sitemap_timeout_secs);

        let (pages, sitemap_url) =
            match sitemap::probe(&self.client, &base, sitemap_timeout).await {
                Some(probed) => {
                    let sitemap_url = probed.url.clone();
                    let pages = self.resolve_sitemap_pages(probed.parsed).await;
                    if pages.is_empty() {
                        tracing::warn!(
                            "Sitemap at {} yielded no usable pages, falling back to crawl",
                            sitemap_url
                        );
                        (self.fallback_crawl().await?, None)
                    } else {
                        (pages, Some(sitemap_url))
                    }
                }
                None => (self.fallback_crawl().await?, None),
            };

        tracing::info!(
            "Discovery complete: {} pages ({} sitemap, {} crawl), {} fetch failures",
            pages.len(),
            pages
                .iter()
                .filter(|p| p.source == PageSource::Sitemap)
                .count(),
            pages
                .iter()
                .filter(|p| p.source == PageSource::Crawl)
                .count(),
            self.state.failure_count()
        );

        Ok(DiscoveryResult { pages, sitemap_url })
    }

    /// Enumerates and analyzes all pages reachable from a parsed sitemap
    ///
    /// Child sitemaps are resolved recursively; one failing child never
    /// aborts its siblings. Page analysis is interleaved with resolution:
    /// each urlset's entries are fetched before the next child is opened.
    async fn resolve_sitemap_pages(&mut self, parsed: ParsedSitemap) -> Vec<PageRecord> {
        let sitemap_timeout = Duration::from_secs(self.config.sitemap_timeout_secs);
        let mut pages: Vec<PageRecord> = Vec::new();
        let mut queue: VecDeque<ParsedSitemap> = VecDeque::from([parsed]);
        let mut seen_sitemaps: HashSet<String> = HashSet::new();

        while let Some(doc) = queue.pop_front() {
            if pages.len() >= self.config.max_pages {
                break;
            }

            match doc {
                ParsedSitemap::UrlSet(entries) => {
                    self.analyze_sitemap_entries(entries, &mut pages).await;
                }
                ParsedSitemap::Index(children) => {
                    for child in children {
                        if !seen_sitemaps.insert(child.clone()) {
                            continue;
                        }
                        match sitemap::fetch_and_parse(&self.client, &child, sitemap_timeout)
                            .await
                        {
                            Some(child_doc) => queue.push_back(child_doc),
                            None => {
                                // Isolated: the remaining children still run
                                tracing::warn!("Skipping unreadable child sitemap {}", child);
                            }
                        }
                    }
                }
            }
        }

        pages
    }

    /// Fetches one urlset's pages in batches, deduplicating via the
    /// session visited-set
    async fn analyze_sitemap_entries(
        &mut self,
        entries: Vec<SitemapEntry>,
        pages: &mut Vec<PageRecord>,
    ) {
        let mut jobs: Vec<(String, AnalyzeOptions)> = Vec::new();

        for entry in entries {
            if pages.len() + jobs.len() >= self.config.max_pages {
                break;
            }

            let normalized = match normalize_url(&entry.loc) {
                Ok(u) => u,
                Err(e) => {
                    tracing::debug!("Skipping sitemap entry {}: {}", entry.loc, e);
                    continue;
                }
            };
            // Duplicates across child sitemaps collapse here
            if !self.state.mark_visited(&normalized) {
                continue;
            }

            jobs.push((
                normalized,
                AnalyzeOptions {
                    source: Some(PageSource::Sitemap),
                    sitemap_meta: Some(SitemapMeta {
                        last_modified: entry.lastmod,
                        priority: entry.priority,
                        change_freq: entry.changefreq,
                    }),
                    ..Default::default()
                },
            ));
        }

        let records = analyze_chunked(
            &self.client,
            jobs,
            self.config.batch_size,
            Duration::from_millis(self.config.batch_delay_ms),
        )
        .await;

        for record in records {
            if record.is_unreachable() {
                self.state.mark_failed(&record.url);
            }
            pages.push(record);
        }
    }

    /// BFS crawl used when no sitemap resolves
    async fn fallback_crawl(&mut self) -> Result<Vec<PageRecord>> {
        tracing::info!("Falling back to BFS crawl from {}", self.start_url);

        let pages = crawler::crawl(
            &self.client,
            &self.config,
            &self.domain,
            &self.start_url,
            self.renderer,
            &mut self.state,
        )
        .await;

        // Only a dead root is fatal; individual page failures are data
        if pages.len() == 1 && pages[0].is_unreachable() {
            return Err(AuditError::RootUnreachable {
                url: self.start_url.clone(),
            });
        }

        Ok(pages)
    }
}

/// Discovers all pages for the configured audit target
///
/// Convenience wrapper that creates a session and runs it to completion.
pub async fn discover_pages(
    config: &Config,
    renderer: Option<&dyn Renderer>,
) -> Result<DiscoveryResult> {
    Discovery::new(config, renderer)?.run().await
}
