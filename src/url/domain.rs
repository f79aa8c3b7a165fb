use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitelens::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a host belongs to the audited domain
///
/// A link target counts as internal when its host equals the audited domain
/// or the `www.` variant of it, in either direction. Subdomains other than
/// `www` are external for link-graph purposes.
pub fn is_internal_host(host: &str, domain: &str) -> bool {
    let host = host.to_lowercase();
    let domain = domain.to_lowercase();

    if host == domain {
        return true;
    }

    let bare_host = host.strip_prefix("www.").unwrap_or(&host);
    let bare_domain = domain.strip_prefix("www.").unwrap_or(&domain);
    bare_host == bare_domain
}
