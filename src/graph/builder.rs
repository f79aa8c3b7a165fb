//! Link graph construction
//!
//! Edges are derived transiently from each page's extracted links on every
//! analysis run; nothing is persisted. Only internal edges (target host
//! equal to the audited domain or its www variant) enter the graph, and
//! self-loops are excluded from all statistics.

use crate::page::PageRecord;
use crate::url::{extract_host, is_internal_host, normalize_url};
use std::collections::{HashMap, HashSet};
use url::Url;

/// A directed internal link between two canonical URLs
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEdge {
    pub source: String,
    pub target: String,
    pub anchor_text: String,
    pub is_nofollow: bool,
    /// True when the target is a known page with an HTTP error status
    pub is_broken: bool,
}

/// The built internal-link graph
#[derive(Debug, Default)]
pub struct LinkGraph {
    /// Incoming edges keyed by target. Every known page URL is present,
    /// with an empty vec when nothing links to it.
    pub incoming: HashMap<String, Vec<LinkEdge>>,
    /// Outgoing adjacency for BFS, deduplicated per source
    pub outgoing: HashMap<String, Vec<String>>,
    /// The set of canonical URLs discovery produced records for
    pub known_urls: HashSet<String>,
}

/// Builds the internal link graph from the discovered page set
///
/// Link targets are normalized before use as keys, so raw trailing-slash
/// or fragment variants collapse onto the same node. Targets that were
/// never discovered still appear as incoming-map keys; no reference
/// dangles.
pub fn build_graph(pages: &[PageRecord], domain: &str) -> LinkGraph {
    let mut graph = LinkGraph::default();

    for page in pages {
        graph.known_urls.insert(page.url.clone());
        graph.incoming.entry(page.url.clone()).or_default();
    }

    let status_by_url: HashMap<&str, u16> = pages
        .iter()
        .map(|p| (p.url.as_str(), p.status_code))
        .collect();

    for page in pages {
        let mut outgoing_targets: Vec<String> = Vec::new();
        let mut seen_targets: HashSet<String> = HashSet::new();

        for link in &page.outgoing_links {
            let Ok(parsed) = Url::parse(&link.target) else {
                continue;
            };
            let Some(host) = extract_host(&parsed) else {
                continue;
            };
            if !is_internal_host(&host, domain) {
                continue;
            }

            let Ok(target) = normalize_url(&link.target) else {
                continue;
            };
            if target == page.url {
                continue;
            }

            let is_broken = status_by_url
                .get(target.as_str())
                .is_some_and(|status| *status >= 400);

            graph.incoming.entry(target.clone()).or_default().push(LinkEdge {
                source: page.url.clone(),
                target: target.clone(),
                anchor_text: link.anchor_text.clone(),
                is_nofollow: link.is_nofollow,
                is_broken,
            });

            if seen_targets.insert(target.clone()) {
                outgoing_targets.push(target);
            }
        }

        if !outgoing_targets.is_empty() {
            graph.outgoing.insert(page.url.clone(), outgoing_targets);
        }
    }

    graph
}

impl LinkGraph {
    /// All edges in the graph, in incoming-map order
    pub fn edges(&self) -> impl Iterator<Item = &LinkEdge> {
        self.incoming.values().flatten()
    }

    /// Number of incoming links for a canonical URL
    pub fn incoming_count(&self, url: &str) -> usize {
        self.incoming.get(url).map_or(0, |edges| edges.len())
    }
}
