//! HTML metadata extraction
//!
//! Each extraction rule is independent and tolerant of absence: a page with
//! no title still yields an image count, and vice versa.

use crate::page::ExtractedLink;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

fn h1_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h1[^>]*>.*?</h1>").expect("valid h1 regex"))
}

/// Extracts the page title from the parsed document
pub fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Checks whether the page carries any usable description meta tag
///
/// Accepts the standard description, Open Graph, or Twitter variant; any one
/// with non-empty content suffices.
pub fn has_description(document: &Html) -> bool {
    const SELECTORS: &[&str] = &[
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
        r#"meta[name="twitter:description"]"#,
    ];

    for sel in SELECTORS {
        if let Ok(selector) = Selector::parse(sel) {
            if document
                .select(&selector)
                .any(|el| el.value().attr("content").is_some_and(|c| !c.trim().is_empty()))
            {
                return true;
            }
        }
    }
    false
}

/// Detects an H1 on the page with a layered heuristic
///
/// The strict regex catches well-formed headings. If that misses, a page
/// that contains both an opening and a closing h1 tag still counts; page
/// builders often nest spans or populate the heading text from JavaScript,
/// and an empty-but-present H1 is an H1.
pub fn has_h1(html: &str) -> bool {
    if h1_regex().is_match(html) {
        return true;
    }

    let lower = html.to_lowercase();
    lower.contains("<h1") && lower.contains("</h1>")
}

/// Counts `<img>` tags in the document
pub fn count_images(document: &Html) -> usize {
    match Selector::parse("img") {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

/// Extracts outgoing links with anchor text and nofollow flags
///
/// Fragment-only, `mailto:`, `tel:`, `javascript:`, and `data:` targets are
/// excluded. Each href is resolved to an absolute URL against the page's own
/// URL; unresolvable hrefs are skipped.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<ExtractedLink> {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(target) = resolve_href(href, base_url) else {
            continue;
        };

        let anchor_text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let is_nofollow = element
            .value()
            .attr("rel")
            .map(|rel| rel.to_lowercase().contains("nofollow"))
            .unwrap_or(false);

        links.push(ExtractedLink {
            target,
            anchor_text,
            is_nofollow,
        });
    }

    links
}

/// Resolves an href to an absolute HTTP(S) URL, or None if excluded
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}
