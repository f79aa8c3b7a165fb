use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical string form used as a graph key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or missing a host
/// 2. Lowercase scheme and host (done by the URL parser)
/// 3. Remove the fragment (everything after #)
/// 4. Strip a single trailing slash from the path, unless the path is
///    exactly `/`
/// 5. Retain the query string as-is
///
/// Two URLs that differ only by fragment or a non-root trailing slash
/// normalize to the same string and are treated as the same page.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize (must be absolute)
///
/// # Returns
///
/// * `Ok(String)` - Canonical URL string
/// * `Err(UrlError)` - Failed to parse, unsupported scheme, or no host
///
/// # Examples
///
/// ```
/// use sitelens::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/page/#top").unwrap();
/// assert_eq!(url, "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves a possibly-relative href against a base URL, then normalizes it
///
/// # Arguments
///
/// * `href` - Absolute or relative URL reference
/// * `base` - The URL of the page the reference appeared on
///
/// # Returns
///
/// * `Ok(String)` - Canonical absolute URL string
/// * `Err(UrlError)` - The reference could not be resolved to a valid URL
pub fn resolve_and_normalize(href: &str, base: &Url) -> Result<String, UrlError> {
    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

fn normalize_parsed(mut url: Url) -> Result<String, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, |h| h.is_empty()) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    // Strip one trailing slash; the root path stays "/"
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result, "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result, "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_query_is_retained() {
        let result = normalize_url("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(result, "https://example.com/page?b=2&a=1");
    }

    #[test]
    fn test_lowercase_host() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result, "https://example.com/Page");
    }

    #[test]
    fn test_slash_and_fragment_variants_collapse() {
        let a = normalize_url("https://example.com/blog/").unwrap();
        let b = normalize_url("https://example.com/blog#latest").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_www_is_preserved() {
        // Hosts are kept as-audited; www-folding happens at edge filtering
        let result = normalize_url("https://www.example.com/page").unwrap();
        assert_eq!(result, "https://www.example.com/page");
    }

    #[test]
    fn test_resolve_relative() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        let result = resolve_and_normalize("/about/", &base).unwrap();
        assert_eq!(result, "https://example.com/about");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        let result = resolve_and_normalize("other", &base).unwrap();
        assert_eq!(result, "https://example.com/blog/other");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(matches!(result.unwrap_err(), UrlError::Parse(_)));
    }

    #[test]
    fn test_relative_without_base_fails() {
        let result = normalize_url("/just/a/path");
        assert!(result.is_err());
    }
}
