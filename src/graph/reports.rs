//! Report projections over the built link graph
//!
//! Every sub-report is an independent pure function of the graph: one pass
//! over the edge list plus a single BFS, with no projection feeding
//! another. That keeps each diagnostic unit-testable in isolation.

use super::builder::{build_graph, LinkEdge, LinkGraph};
use crate::page::{PageRecord, PageSource};
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// Anchor phrases that carry no descriptive value for the linked page.
/// Matched case-insensitively, exact or as a substring.
pub const GENERIC_ANCHOR_PHRASES: [&str; 7] = [
    "click here",
    "read more",
    "learn more",
    "here",
    "this",
    "link",
    "more",
];

/// A (target, anchor) pair repeated this many times is over-optimized
pub const OVER_OPTIMIZED_THRESHOLD: usize = 5;

/// One flagged anchor-text usage pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorIssue {
    pub target: String,
    pub anchor_text: String,
    pub count: usize,
}

/// The full set of link-graph diagnostics for one audit
#[derive(Debug, Default)]
pub struct LinkAnalysisReport {
    /// Discovered pages with exactly one incoming link
    pub one_incoming: Vec<String>,
    /// Sitemap-listed pages nothing links to
    pub sitemap_orphans: Vec<String>,
    /// Any discovered page with zero incoming links
    pub true_orphans: Vec<String>,
    /// Broken internal links grouped by the page carrying them
    pub broken_by_source: HashMap<String, Vec<LinkEdge>>,
    /// Nofollow internal links grouped by the page carrying them
    pub nofollow_by_source: HashMap<String, Vec<LinkEdge>>,
    /// Shortest link depth from the homepage; unreached pages are absent
    pub depth_by_url: HashMap<String, usize>,
    /// Pages more than three clicks from the homepage
    pub deep_pages: Vec<String>,
    /// Discovered pages the homepage BFS never reached
    pub unreachable_from_home: Vec<String>,
    /// Targets linked with generic anchor phrases, with total counts
    pub generic_anchors: Vec<AnchorIssue>,
    /// (target, anchor) pairs repeated at or past the threshold
    pub over_optimized: Vec<AnchorIssue>,
    /// deep / (homepage + deep) over all internal edges
    pub deep_link_ratio: f64,
    /// True when edges exist and the ratio falls below 0.6
    pub low_deep_link_ratio: bool,
}

/// Builds the internal link graph for `pages` and derives every report
///
/// # Arguments
///
/// * `pages` - The discovered page set, canonical URLs throughout
/// * `domain` - The audited domain; `www.`-variant hosts count as internal
pub fn analyze_links(pages: &[PageRecord], domain: &str) -> LinkAnalysisReport {
    let graph = build_graph(pages, domain);

    let mut report = LinkAnalysisReport {
        depth_by_url: link_depths(&graph, domain),
        ..Default::default()
    };

    collect_orphans(&graph, pages, &mut report);
    collect_edge_inventories(&graph, &mut report);
    collect_anchor_issues(&graph, &mut report);
    collect_depth_findings(&graph, &mut report);
    collect_deep_link_ratio(&graph, &mut report);

    tracing::debug!(
        "Link analysis: {} true orphans, {} sitemap orphans, {} deep pages, ratio {:.2}",
        report.true_orphans.len(),
        report.sitemap_orphans.len(),
        report.deep_pages.len(),
        report.deep_link_ratio
    );

    report
}

/// Orphan and one-incoming sets, restricted to discovered pages
fn collect_orphans(graph: &LinkGraph, pages: &[PageRecord], report: &mut LinkAnalysisReport) {
    for page in pages {
        match graph.incoming_count(&page.url) {
            0 => {
                report.true_orphans.push(page.url.clone());
                if page.source == PageSource::Sitemap {
                    report.sitemap_orphans.push(page.url.clone());
                }
            }
            1 => report.one_incoming.push(page.url.clone()),
            _ => {}
        }
    }
}

/// Broken and nofollow edges, grouped by source page
fn collect_edge_inventories(graph: &LinkGraph, report: &mut LinkAnalysisReport) {
    for edge in graph.edges() {
        if edge.is_broken {
            report
                .broken_by_source
                .entry(edge.source.clone())
                .or_default()
                .push(edge.clone());
        }
        if edge.is_nofollow {
            report
                .nofollow_by_source
                .entry(edge.source.clone())
                .or_default()
                .push(edge.clone());
        }
    }
}

/// Anchor-text tallies per (target, lowercased anchor) pair
fn collect_anchor_issues(graph: &LinkGraph, report: &mut LinkAnalysisReport) {
    let mut tallies: HashMap<(String, String), usize> = HashMap::new();
    for edge in graph.edges() {
        let key = (edge.target.clone(), edge.anchor_text.to_lowercase());
        *tallies.entry(key).or_insert(0) += 1;
    }

    let mut generic_totals: HashMap<String, usize> = HashMap::new();
    for ((target, anchor), count) in &tallies {
        if is_generic_anchor(anchor) {
            *generic_totals.entry(target.clone()).or_insert(0) += count;
        }
        if *count >= OVER_OPTIMIZED_THRESHOLD {
            report.over_optimized.push(AnchorIssue {
                target: target.clone(),
                anchor_text: anchor.clone(),
                count: *count,
            });
        }
    }

    // One entry per target, summing all its generic-anchor usages
    report.generic_anchors = generic_totals
        .into_iter()
        .map(|(target, count)| AnchorIssue {
            target,
            anchor_text: String::new(),
            count,
        })
        .collect();

    report.generic_anchors.sort_by(|a, b| a.target.cmp(&b.target));
    report.over_optimized.sort_by(|a, b| a.target.cmp(&b.target));
}

fn is_generic_anchor(anchor: &str) -> bool {
    if anchor.is_empty() {
        return false;
    }
    GENERIC_ANCHOR_PHRASES
        .iter()
        .any(|phrase| anchor == *phrase || anchor.contains(phrase))
}

/// Shortest link depth per page, BFS from the canonical homepage
fn link_depths(graph: &LinkGraph, domain: &str) -> HashMap<String, usize> {
    let home = format!("https://{}/", domain);
    let mut depths: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    if graph.known_urls.contains(&home) || graph.outgoing.contains_key(&home) {
        depths.insert(home.clone(), 0);
        queue.push_back(home);
    }

    while let Some(url) = queue.pop_front() {
        let depth = depths[&url];
        let Some(targets) = graph.outgoing.get(&url) else {
            continue;
        };
        for target in targets {
            if !depths.contains_key(target) {
                depths.insert(target.clone(), depth + 1);
                queue.push_back(target.clone());
            }
        }
    }

    depths
}

/// Deep pages and the discovered pages the BFS never reached
fn collect_depth_findings(graph: &LinkGraph, report: &mut LinkAnalysisReport) {
    for (url, depth) in &report.depth_by_url {
        if *depth > 3 {
            report.deep_pages.push(url.clone());
        }
    }
    report.deep_pages.sort();

    // Absent from the depth map means unknown depth, not depth 0. Surfaced
    // as its own category rather than silently dropped from statistics.
    report.unreachable_from_home = graph
        .known_urls
        .iter()
        .filter(|url| !report.depth_by_url.contains_key(*url))
        .cloned()
        .collect();
    report.unreachable_from_home.sort();
}

/// Homepage-vs-deep split over all internal edges
fn collect_deep_link_ratio(graph: &LinkGraph, report: &mut LinkAnalysisReport) {
    let mut homepage_links = 0usize;
    let mut deep_links = 0usize;

    for edge in graph.edges() {
        if is_homepage_url(&edge.target) {
            homepage_links += 1;
        } else {
            deep_links += 1;
        }
    }

    report.deep_link_ratio = if deep_links == 0 {
        0.0
    } else {
        deep_links as f64 / (homepage_links + deep_links) as f64
    };
    report.low_deep_link_ratio =
        homepage_links + deep_links > 0 && report.deep_link_ratio < 0.6;
}

fn is_homepage_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path();
            path == "/" || path.is_empty()
        }
        Err(_) => false,
    }
}
