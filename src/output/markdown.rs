//! Markdown summary generation

use crate::output::summary::AuditSummary;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the audit summary as a markdown file
///
/// # Arguments
///
/// * `summary` - The audit summary data
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_summary(summary: &AuditSummary, output_path: &Path) -> Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats an audit summary as markdown
pub fn format_markdown_summary(summary: &AuditSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Site Audit: {}\n\n", summary.domain));
    md.push_str(&format!(
        "- **Completed**: {}\n",
        summary.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    match &summary.sitemap_url {
        Some(url) => md.push_str(&format!("- **Sitemap**: {}\n", url)),
        None => md.push_str("- **Sitemap**: none found (fallback crawl)\n"),
    }
    md.push('\n');

    md.push_str("## Discovery\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Total pages | {} |\n", summary.total_pages));
    md.push_str(&format!("| From sitemap | {} |\n", summary.sitemap_pages));
    md.push_str(&format!("| From crawl | {} |\n", summary.crawl_pages));
    md.push_str(&format!("| Unreachable | {} |\n", summary.unreachable_pages));
    md.push_str(&format!("| HTTP errors | {} |\n\n", summary.error_pages));

    md.push_str("## On-Page Elements\n\n");
    md.push_str("| Issue | Pages |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| Missing title | {} |\n", summary.missing_title));
    md.push_str(&format!(
        "| Missing description | {} |\n",
        summary.missing_description
    ));
    md.push_str(&format!("| Missing H1 | {} |\n\n", summary.missing_h1));

    let report = &summary.report;
    md.push_str("## Internal Linking\n\n");
    md.push_str(&format!(
        "- **Deep-link ratio**: {:.2}{}\n",
        report.deep_link_ratio,
        if report.low_deep_link_ratio {
            " (below 0.6)"
        } else {
            ""
        }
    ));
    md.push_str(&format!(
        "- **Pages with broken links**: {}\n",
        report.broken_by_source.len()
    ));
    md.push_str(&format!(
        "- **Pages with nofollow links**: {}\n\n",
        report.nofollow_by_source.len()
    ));

    if !report.true_orphans.is_empty() {
        md.push_str(&format!("### Orphan Pages ({})\n\n", report.true_orphans.len()));
        for url in &report.true_orphans {
            let tag = if report.sitemap_orphans.contains(url) {
                " (in sitemap)"
            } else {
                ""
            };
            md.push_str(&format!("- {}{}\n", url, tag));
        }
        md.push('\n');
    }

    if !report.one_incoming.is_empty() {
        md.push_str(&format!(
            "### Single-Incoming-Link Pages ({})\n\n",
            report.one_incoming.len()
        ));
        for url in &report.one_incoming {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !report.deep_pages.is_empty() {
        md.push_str(&format!(
            "### Deep Pages, more than 3 clicks from home ({})\n\n",
            report.deep_pages.len()
        ));
        for url in &report.deep_pages {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !report.unreachable_from_home.is_empty() {
        md.push_str(&format!(
            "### Not Reachable From Homepage ({})\n\n",
            report.unreachable_from_home.len()
        ));
        for url in &report.unreachable_from_home {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !report.generic_anchors.is_empty() {
        md.push_str("### Generic Anchor Text\n\n");
        md.push_str("| Target | Uses |\n");
        md.push_str("|--------|------|\n");
        for issue in &report.generic_anchors {
            md.push_str(&format!("| {} | {} |\n", issue.target, issue.count));
        }
        md.push('\n');
    }

    if !report.over_optimized.is_empty() {
        md.push_str("### Over-Optimized Anchors\n\n");
        md.push_str("| Anchor | Target | Uses |\n");
        md.push_str("|--------|--------|------|\n");
        for issue in &report.over_optimized {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                issue.anchor_text, issue.target, issue.count
            ));
        }
        md.push('\n');
    }

    md
}
