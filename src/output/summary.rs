//! Audit summary aggregation and console output

use crate::graph::LinkAnalysisReport;
use crate::page::{PageRecord, PageSource};
use chrono::{DateTime, Utc};

/// Aggregated results of one audit run
#[derive(Debug)]
pub struct AuditSummary {
    /// The audited domain
    pub domain: String,

    /// When the audit finished
    pub completed_at: DateTime<Utc>,

    /// Sitemap the pages came from, when one resolved
    pub sitemap_url: Option<String>,

    /// Total pages discovered
    pub total_pages: usize,

    /// Pages enumerated from the sitemap
    pub sitemap_pages: usize,

    /// Pages found by the fallback crawl
    pub crawl_pages: usize,

    /// Pages that could not be fetched at all
    pub unreachable_pages: usize,

    /// Pages that answered with an HTTP error status
    pub error_pages: usize,

    /// Pages missing a title element
    pub missing_title: usize,

    /// Pages missing a meta description
    pub missing_description: usize,

    /// Pages missing an H1 heading
    pub missing_h1: usize,

    /// Link-graph diagnostics
    pub report: LinkAnalysisReport,
}

/// Aggregates page records and the link report into a summary
///
/// # Arguments
///
/// * `domain` - The audited domain
/// * `pages` - All discovered page records
/// * `report` - The link analysis produced for the same page set
pub fn build_summary(
    domain: &str,
    pages: &[PageRecord],
    report: LinkAnalysisReport,
    sitemap_url: Option<String>,
) -> AuditSummary {
    let reachable = pages.iter().filter(|p| !p.is_unreachable());

    AuditSummary {
        domain: domain.to_string(),
        completed_at: Utc::now(),
        sitemap_url,
        total_pages: pages.len(),
        sitemap_pages: pages
            .iter()
            .filter(|p| p.source == PageSource::Sitemap)
            .count(),
        crawl_pages: pages
            .iter()
            .filter(|p| p.source == PageSource::Crawl)
            .count(),
        unreachable_pages: pages.iter().filter(|p| p.is_unreachable()).count(),
        error_pages: pages.iter().filter(|p| p.is_http_error()).count(),
        missing_title: reachable.clone().filter(|p| !p.has_title).count(),
        missing_description: reachable.clone().filter(|p| !p.has_description).count(),
        missing_h1: reachable.filter(|p| !p.has_h1).count(),
        report,
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &AuditSummary) {
    println!("=== Site Audit Summary: {} ===\n", summary.domain);

    println!("Discovery:");
    println!("  Total pages: {}", summary.total_pages);
    match &summary.sitemap_url {
        Some(url) => println!("  Sitemap: {} ({} pages)", url, summary.sitemap_pages),
        None => println!("  Sitemap: none found, used fallback crawl"),
    }
    println!("  Crawled pages: {}", summary.crawl_pages);
    println!("  Unreachable: {}", summary.unreachable_pages);
    println!("  HTTP errors: {}", summary.error_pages);
    println!();

    println!("On-page elements:");
    println!("  Missing title: {}", summary.missing_title);
    println!("  Missing description: {}", summary.missing_description);
    println!("  Missing H1: {}", summary.missing_h1);
    println!();

    let report = &summary.report;
    println!("Internal linking:");
    println!("  True orphans: {}", report.true_orphans.len());
    println!("  Sitemap orphans: {}", report.sitemap_orphans.len());
    println!("  Single-incoming-link pages: {}", report.one_incoming.len());
    println!(
        "  Pages with broken links: {}",
        report.broken_by_source.len()
    );
    println!(
        "  Pages with nofollow links: {}",
        report.nofollow_by_source.len()
    );
    println!("  Deep pages (>3 clicks): {}", report.deep_pages.len());
    println!(
        "  Unreachable from homepage: {}",
        report.unreachable_from_home.len()
    );
    println!(
        "  Deep-link ratio: {:.2}{}",
        report.deep_link_ratio,
        if report.low_deep_link_ratio {
            " (low)"
        } else {
            ""
        }
    );
    println!();

    if !report.generic_anchors.is_empty() {
        println!("Generic anchor text ({} targets):", report.generic_anchors.len());
        for issue in &report.generic_anchors {
            println!("  - {} ({} uses)", issue.target, issue.count);
        }
        println!();
    }

    if !report.over_optimized.is_empty() {
        println!("Over-optimized anchors ({}):", report.over_optimized.len());
        for issue in &report.over_optimized {
            println!(
                "  - \"{}\" -> {} ({} uses)",
                issue.anchor_text, issue.target, issue.count
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, source: PageSource, status: u16) -> PageRecord {
        let mut record = PageRecord::unreachable(url.to_string(), source);
        record.status_code = status;
        if status > 0 {
            record.has_title = true;
            record.has_description = true;
            record.has_h1 = false;
        }
        record
    }

    #[test]
    fn test_build_summary_counts() {
        let pages = vec![
            page("https://example.com/", PageSource::Sitemap, 200),
            page("https://example.com/a", PageSource::Sitemap, 404),
            page("https://example.com/b", PageSource::Crawl, 0),
        ];
        let summary = build_summary(
            "example.com",
            &pages,
            LinkAnalysisReport::default(),
            Some("https://example.com/sitemap.xml".to_string()),
        );

        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.sitemap_pages, 2);
        assert_eq!(summary.crawl_pages, 1);
        assert_eq!(summary.unreachable_pages, 1);
        assert_eq!(summary.error_pages, 1);
        // Element counts only cover reachable pages
        assert_eq!(summary.missing_title, 0);
        assert_eq!(summary.missing_h1, 2);
    }
}
