//! Internal link graph construction and analysis
//!
//! Consumes the discovered page set and derives the directed internal-link
//! graph, then a set of independent report projections: orphan pages, link
//! depth from the homepage, broken and nofollow inventories, anchor-text
//! diagnostics, and the homepage-vs-deep-link ratio.

mod builder;
mod reports;

pub use builder::{build_graph, LinkEdge, LinkGraph};
pub use reports::{
    analyze_links, AnchorIssue, LinkAnalysisReport, GENERIC_ANCHOR_PHRASES,
    OVER_OPTIMIZED_THRESHOLD,
};
