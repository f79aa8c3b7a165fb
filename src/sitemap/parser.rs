//! Sitemap XML parsing
//!
//! Handles both `<urlset>` documents and `<sitemapindex>` documents. One
//! malformed `<url>` block is skipped, never fatal for the rest of the file.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use url::Url;

/// One `<url>` entry from a urlset
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    /// Validated absolute URL from `<loc>`
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub priority: Option<f32>,
    pub changefreq: Option<String>,
}

/// A parsed sitemap document
#[derive(Debug, Clone)]
pub enum ParsedSitemap {
    /// `<sitemapindex>`: locations of child sitemaps
    Index(Vec<String>),
    /// `<urlset>`: page entries
    UrlSet(Vec<SitemapEntry>),
}

impl ParsedSitemap {
    pub fn is_empty(&self) -> bool {
        match self {
            ParsedSitemap::Index(children) => children.is_empty(),
            ParsedSitemap::UrlSet(entries) => entries.is_empty(),
        }
    }
}

/// Parses sitemap XML
///
/// Returns `None` when the document is neither a urlset nor a sitemap
/// index (a 200 HTML error page at /sitemap must not end probing).
/// Entries whose `<loc>` is empty or does not parse to an absolute URL
/// with a hostname are skipped individually.
pub fn parse_sitemap(xml: &str) -> Option<ParsedSitemap> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut is_index = false;
    let mut saw_root = false;

    let mut entries: Vec<SitemapEntry> = Vec::new();
    let mut children: Vec<String> = Vec::new();

    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut loc = String::new();
    let mut lastmod = String::new();
    let mut priority = String::new();
    let mut changefreq = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "sitemapindex" => {
                        saw_root = true;
                        is_index = true;
                    }
                    "urlset" => {
                        saw_root = true;
                        is_index = false;
                    }
                    "url" | "sitemap" => {
                        in_entry = true;
                        loc.clear();
                        lastmod.clear();
                        priority.clear();
                        changefreq.clear();
                    }
                    _ => current_tag = name,
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "url" | "sitemap" if in_entry => {
                        in_entry = false;
                        if let Some(valid_loc) = validate_loc(&loc) {
                            if is_index {
                                children.push(valid_loc);
                            } else {
                                entries.push(SitemapEntry {
                                    loc: valid_loc,
                                    lastmod: parse_lastmod(&lastmod),
                                    priority: parse_priority(&priority),
                                    changefreq: (!changefreq.is_empty())
                                        .then(|| changefreq.clone()),
                                });
                            }
                        } else {
                            tracing::debug!("Skipping sitemap entry with invalid loc: '{}'", loc);
                        }
                    }
                    _ => current_tag.clear(),
                }
            }
            Ok(Event::Text(e)) => {
                if !in_entry {
                    continue;
                }
                let text = e.unescape().unwrap_or_default().trim().to_string();
                match current_tag.as_str() {
                    "loc" => loc = text,
                    "lastmod" => lastmod = text,
                    "priority" => priority = text,
                    "changefreq" => changefreq = text,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Sitemap XML parse error: {}", e);
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return None;
    }

    Some(if is_index {
        ParsedSitemap::Index(children)
    } else {
        ParsedSitemap::UrlSet(entries)
    })
}

/// Accepts a loc only if it parses to an absolute URL with a hostname
fn validate_loc(loc: &str) -> Option<String> {
    let trimmed = loc.trim();
    if trimmed.is_empty() {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    if url.host_str().map_or(true, |h| h.is_empty()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Priorities outside the protocol's 0.0-1.0 range are dropped, not clamped
fn parse_priority(s: &str) -> Option<f32> {
    s.trim()
        .parse::<f32>()
        .ok()
        .filter(|p| (0.0..=1.0).contains(p))
}

fn parse_lastmod(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    // Date-only form is common in generated sitemaps
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
