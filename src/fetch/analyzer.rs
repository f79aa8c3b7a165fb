//! Single-page analysis
//!
//! `analyze_page` is total: network failures come back as a degraded record
//! with status 0, never as an `Err`. Redirect handling is a two-step
//! protocol: the first request has redirects disabled to capture the true
//! status, then the Location target is fetched for content while the
//! original 3xx code is preserved on the record.

use crate::fetch::extract::{count_images, extract_links, extract_title, has_description, has_h1};
use crate::page::{PageRecord, PageSource, RedirectInfo, SitemapMeta};
use crate::render::Renderer;
use reqwest::Client;
use scraper::Html;
use url::Url;

/// Options for a single page analysis
#[derive(Default)]
pub struct AnalyzeOptions<'a> {
    /// How this URL was discovered
    pub source: Option<PageSource>,
    /// Sitemap attributes to attach, if sitemap-discovered
    pub sitemap_meta: Option<SitemapMeta>,
    /// Optional rendered-DOM path; failure falls back to plain fetch
    pub renderer: Option<&'a dyn Renderer>,
}

/// Fetch progress for one page
///
/// The redirect dance is an explicit state machine rather than ad hoc
/// branching: Initial -> Redirected -> Resolved, with Failed terminal at any
/// step.
enum FetchPhase {
    Initial,
    Redirected {
        info: RedirectInfo,
    },
    Resolved {
        status_code: u16,
        body: Option<String>,
        redirect: Option<RedirectInfo>,
    },
    Failed,
}

/// Fetches and analyzes one page
///
/// # Arguments
///
/// * `client` - HTTP client built with redirects disabled
/// * `url` - Canonical URL of the page
/// * `opts` - Source tagging, sitemap metadata, optional renderer
///
/// # Returns
///
/// A fully populated [`PageRecord`]. Status 0 means the page was
/// unreachable at the transport layer; HTTP error statuses are recorded as
/// data with empty metadata.
pub async fn analyze_page(client: &Client, url: &str, opts: AnalyzeOptions<'_>) -> PageRecord {
    let source = opts.source.unwrap_or(PageSource::Crawl);

    // Rendered-DOM path first, when offered; it captures JS-populated
    // content the raw fetch misses.
    if let Some(renderer) = opts.renderer {
        match renderer.render(url).await {
            Ok(rendered) => {
                tracing::debug!("Rendered {} via headless browser", url);
                return build_record(
                    url,
                    rendered.status,
                    Some(&rendered.html),
                    None,
                    source,
                    opts.sitemap_meta,
                );
            }
            Err(e) => {
                tracing::debug!("Render failed for {}, falling back to HTTP: {}", url, e);
            }
        }
    }

    let mut phase = FetchPhase::Initial;

    loop {
        phase = match phase {
            FetchPhase::Initial => match client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_redirection() {
                        match redirect_info(url, status.as_u16(), response.headers()) {
                            Some(info) => FetchPhase::Redirected { info },
                            None => FetchPhase::Resolved {
                                status_code: status.as_u16(),
                                body: None,
                                redirect: None,
                            },
                        }
                    } else if status.is_client_error() || status.is_server_error() {
                        // Report the error status; do not mask it behind
                        // content fetching.
                        FetchPhase::Resolved {
                            status_code: status.as_u16(),
                            body: None,
                            redirect: None,
                        }
                    } else {
                        let status_code = status.as_u16();
                        match response.text().await {
                            Ok(body) => FetchPhase::Resolved {
                                status_code,
                                body: Some(body),
                                redirect: None,
                            },
                            Err(e) => {
                                tracing::warn!("Failed to read body of {}: {}", url, e);
                                FetchPhase::Failed
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", url, e);
                    FetchPhase::Failed
                }
            },

            FetchPhase::Redirected { info } => {
                // Fetch the target for content, but keep the original 3xx
                // status and redirect metadata on the record.
                let body = match client.get(&info.final_url).send().await {
                    Ok(response) if response.status().is_success() => response.text().await.ok(),
                    Ok(response) => {
                        tracing::debug!(
                            "Redirect target {} answered {}",
                            info.final_url,
                            response.status()
                        );
                        None
                    }
                    Err(e) => {
                        tracing::debug!("Redirect target fetch failed for {}: {}", url, e);
                        None
                    }
                };
                FetchPhase::Resolved {
                    status_code: info.status_code,
                    body,
                    redirect: Some(info),
                }
            }

            FetchPhase::Resolved {
                status_code,
                body,
                redirect,
            } => {
                return build_record(
                    url,
                    status_code,
                    body.as_deref(),
                    redirect,
                    source,
                    opts.sitemap_meta,
                );
            }

            FetchPhase::Failed => {
                let mut record = PageRecord::unreachable(url.to_string(), source);
                record.sitemap = opts.sitemap_meta.unwrap_or_default();
                return record;
            }
        };
    }
}

/// Resolves the Location header into redirect metadata
///
/// Relative Location values are resolved against the redirecting URL. A 3xx
/// without a usable Location is treated as a plain status.
fn redirect_info(
    url: &str,
    status_code: u16,
    headers: &reqwest::header::HeaderMap,
) -> Option<RedirectInfo> {
    let location = headers.get(reqwest::header::LOCATION)?.to_str().ok()?;
    let base = Url::parse(url).ok()?;
    let final_url = base.join(location).ok()?.to_string();

    Some(RedirectInfo {
        original_url: url.to_string(),
        final_url,
        status_code,
        permanent: matches!(status_code, 301 | 308),
    })
}

fn build_record(
    url: &str,
    status_code: u16,
    body: Option<&str>,
    redirect: Option<RedirectInfo>,
    source: PageSource,
    sitemap_meta: Option<SitemapMeta>,
) -> PageRecord {
    // When the record carries a redirect, the body came from the target;
    // relative hrefs are relative to where the content actually lives.
    let content_url = redirect
        .as_ref()
        .map(|r| r.final_url.as_str())
        .unwrap_or(url);

    let (title, has_desc, h1, image_count, outgoing_links) = match body {
        Some(html) => {
            let document = Html::parse_document(html);
            let base = Url::parse(content_url).ok();
            let links = base
                .as_ref()
                .map(|b| extract_links(&document, b))
                .unwrap_or_default();
            (
                extract_title(&document),
                has_description(&document),
                has_h1(html),
                count_images(&document),
                links,
            )
        }
        None => (None, false, false, 0, Vec::new()),
    };

    let has_title = title.is_some();
    PageRecord {
        url: url.to_string(),
        title: title.unwrap_or_default(),
        status_code,
        has_title,
        has_description: has_desc,
        has_h1: h1,
        image_count,
        outgoing_links,
        source,
        sitemap: sitemap_meta.unwrap_or_default(),
        redirect,
    }
}
