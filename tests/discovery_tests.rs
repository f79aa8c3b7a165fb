//! Integration tests for page discovery
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full discovery cycle end-to-end: sitemap resolution, redirect capture,
//! the fallback crawl, and the robots gate.

use sitelens::config::{AuditTarget, Config, DiscoveryConfig, OutputConfig, UserAgentConfig};
use sitelens::graph::analyze_links;
use sitelens::page::PageSource;
use sitelens::{discover_pages, AuditError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at a mock server
fn test_config(domain: &str, start_url: &str) -> Config {
    Config {
        audit: AuditTarget {
            domain: domain.to_string(),
            start_url: Some(start_url.to_string()),
        },
        discovery: DiscoveryConfig {
            batch_delay_ms: 10,
            request_timeout_secs: 5,
            sitemap_timeout_secs: 2,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            summary_path: "./test_summary.md".to_string(),
        },
    }
}

/// Extracts the host from a mock server URI
fn server_domain(uri: &str) -> String {
    url::Url::parse(uri)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{}</title><meta name="description" content="A page"></head><body><h1>{}</h1>{}</body></html>"#,
        title, title, body
    )
}

async fn mount_html(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sitemap_driven_discovery() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/</loc><lastmod>2024-01-15</lastmod><priority>1.0</priority></url>
  <url><loc>{base}/about</loc></url>
  <url><loc></loc></url>
</urlset>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&mock_server)
        .await;

    mount_html(&mock_server, "/", html_page("Home", "")).await;
    mount_html(&mock_server, "/about", html_page("About", "")).await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();

    // Empty loc is dropped during parsing; two usable entries remain
    assert_eq!(result.pages.len(), 2);
    assert!(result.sitemap_url.is_some());
    assert!(result.pages.iter().all(|p| p.source == PageSource::Sitemap));

    let home = result
        .pages
        .iter()
        .find(|p| p.url.ends_with('/'))
        .expect("home page missing");
    assert_eq!(home.status_code, 200);
    assert!(home.has_title);
    assert!(home.has_description);
    assert!(home.has_h1);
    assert!(home.sitemap.last_modified.is_some());
    assert_eq!(home.sitemap.priority, Some(1.0));
}

#[tokio::test]
async fn test_sitemap_index_with_failing_child() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/sitemap-posts.xml</loc></sitemap>
  <sitemap><loc>{base}/sitemap-broken.xml</loc></sitemap>
  <sitemap><loc>{base}/sitemap-pages.xml</loc></sitemap>
</sitemapindex>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index))
        .mount(&mock_server)
        .await;

    let posts: String = (0..5)
        .map(|i| format!("<url><loc>{base}/post{i}</loc></url>"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/sitemap-posts.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0"?><urlset>{posts}</urlset>"#
        )))
        .mount(&mock_server)
        .await;

    // The broken child answers 404; its siblings must still resolve
    Mock::given(method("GET"))
        .and(path("/sitemap-broken.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let pages: String = (0..3)
        .map(|i| format!("<url><loc>{base}/page{i}</loc></url>"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/sitemap-pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0"?><urlset>{pages}</urlset>"#
        )))
        .mount(&mock_server)
        .await;

    for i in 0..5 {
        mount_html(&mock_server, &format!("/post{}", i), html_page("Post", "")).await;
    }
    for i in 0..3 {
        mount_html(&mock_server, &format!("/page{}", i), html_page("Page", "")).await;
    }

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();

    // Union of the surviving children: 5 posts + 3 pages
    assert_eq!(result.pages.len(), 8);
}

#[tokio::test]
async fn test_redirect_captured_with_original_status() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let sitemap = format!(
        r#"<?xml version="1.0"?><urlset><url><loc>{base}/old</loc></url></urlset>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/new", html_page("Moved Page", "")).await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();

    assert_eq!(result.pages.len(), 1);
    let record = &result.pages[0];

    // The record keeps the redirect status but carries the target's content
    assert_eq!(record.status_code, 301);
    assert!(record.has_title);
    assert!(record.has_h1);

    let redirect = record.redirect.as_ref().expect("redirect info missing");
    assert!(redirect.final_url.ends_with("/new"));
    assert_eq!(redirect.status_code, 301);
    assert!(redirect.permanent);
}

#[tokio::test]
async fn test_fallback_crawl_without_sitemap() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    // No sitemap mocks: every candidate answers 404, forcing the crawl
    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &format!(
                r#"<a href="{base}/page1">Page 1</a><a href="{base}/page2">Page 2</a>
                <a href="https://elsewhere.example/x">External</a>"#
            ),
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/page1",
        html_page("Page 1", &format!(r#"<a href="{base}/page2">Page 2</a>"#)),
    )
    .await;
    mount_html(&mock_server, "/page2", html_page("Page 2", "")).await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();

    assert!(result.sitemap_url.is_none());
    assert_eq!(result.pages.len(), 3);
    assert!(result.pages.iter().all(|p| p.source == PageSource::Crawl));

    // The external link was extracted but never crawled
    let home = &result.pages[0];
    assert_eq!(home.outgoing_links.len(), 3);
}

#[tokio::test]
async fn test_crawl_respects_max_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="{base}/page{i}">Page {i}</a>"#))
        .collect();
    mount_html(&mock_server, "/", html_page("Home", &links)).await;
    for i in 0..10 {
        mount_html(&mock_server, &format!("/page{}", i), html_page("Page", "")).await;
    }

    let mut config = test_config(&domain, &base);
    config.discovery.max_pages = 4;
    let result = discover_pages(&config, None).await.unwrap();

    assert_eq!(result.pages.len(), 4);
}

#[tokio::test]
async fn test_crawl_respects_max_depth() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    // A four-page chain: / -> /d1 -> /d2 -> /d3
    mount_html(
        &mock_server,
        "/",
        html_page("Home", &format!(r#"<a href="{base}/d1">Level 1</a>"#)),
    )
    .await;
    mount_html(
        &mock_server,
        "/d1",
        html_page("Level 1", &format!(r#"<a href="{base}/d2">Level 2</a>"#)),
    )
    .await;
    mount_html(
        &mock_server,
        "/d2",
        html_page("Level 2", &format!(r#"<a href="{base}/d3">Level 3</a>"#)),
    )
    .await;
    mount_html(&mock_server, "/d3", html_page("Level 3", "")).await;

    let mut config = test_config(&domain, &base);
    config.discovery.max_depth = 1;
    let result = discover_pages(&config, None).await.unwrap();

    // Only the start page and its direct children are fetched
    assert_eq!(result.pages.len(), 2);
    assert!(result.pages.iter().any(|p| p.url.ends_with("/d1")));
    assert!(!result.pages.iter().any(|p| p.url.ends_with("/d2")));
}

#[tokio::test]
async fn test_zero_batch_size_still_progresses() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    mount_html(
        &mock_server,
        "/",
        html_page("Home", &format!(r#"<a href="{base}/a">A</a>"#)),
    )
    .await;
    mount_html(&mock_server, "/a", html_page("A", "")).await;

    // Bypasses config validation on purpose; the crawl must not spin
    let mut config = test_config(&domain, &base);
    config.discovery.batch_size = 0;
    let result = discover_pages(&config, None).await.unwrap();

    assert_eq!(result.pages.len(), 2);
}

#[tokio::test]
async fn test_robots_disallow_aborts_audit() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/", html_page("Home", "")).await;

    let config = test_config(&domain, &base);
    let err = discover_pages(&config, None).await.unwrap_err();

    assert!(matches!(err, AuditError::RobotsDisallowed { .. }));
    // Fail-closed: nothing beyond robots.txt was requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/robots.txt");
}

#[tokio::test]
async fn test_unfetchable_robots_allows_audit() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    // robots.txt answers 404 like every unmocked path; discovery proceeds
    mount_html(&mock_server, "/", html_page("Home", "")).await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();
    assert_eq!(result.pages.len(), 1);
}

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    // Nothing listens on port 1; every request fails at the transport layer
    let config = test_config("127.0.0.1", "http://127.0.0.1:1/");
    let err = discover_pages(&config, None).await.unwrap_err();

    assert!(matches!(err, AuditError::RootUnreachable { .. }));
}

#[tokio::test]
async fn test_http_error_page_is_recorded_not_fatal() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let sitemap = format!(
        r#"<?xml version="1.0"?><urlset>
          <url><loc>{base}/</loc></url>
          <url><loc>{base}/gone</loc></url>
        </urlset>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&mock_server)
        .await;

    mount_html(&mock_server, "/", html_page("Home", "")).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();

    assert_eq!(result.pages.len(), 2);
    let gone = result.pages.iter().find(|p| p.url.ends_with("/gone")).unwrap();
    assert_eq!(gone.status_code, 404);
    assert!(!gone.has_title);
}

#[tokio::test]
async fn test_discovery_feeds_link_analysis() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let domain = server_domain(&base);

    let sitemap = format!(
        r#"<?xml version="1.0"?><urlset>
          <url><loc>{base}/</loc></url>
          <url><loc>{base}/linked</loc></url>
          <url><loc>{base}/orphan</loc></url>
        </urlset>"#
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/",
        html_page("Home", &format!(r#"<a href="{base}/linked">click here</a>"#)),
    )
    .await;
    mount_html(&mock_server, "/linked", html_page("Linked", "")).await;
    mount_html(&mock_server, "/orphan", html_page("Orphan", "")).await;

    let config = test_config(&domain, &base);
    let result = discover_pages(&config, None).await.unwrap();
    let report = analyze_links(&result.pages, &domain);

    // The sitemap-listed page nothing links to is an orphan both ways
    let orphan_url = format!("{base}/orphan");
    assert!(report.sitemap_orphans.contains(&orphan_url));
    assert!(report.true_orphans.contains(&orphan_url));

    // The only link into /linked uses a generic phrase
    assert_eq!(report.one_incoming, vec![format!("{base}/linked")]);
    assert_eq!(report.generic_anchors.len(), 1);
    assert_eq!(report.generic_anchors[0].count, 1);
}
