use crate::url::matcher::is_subdomain_of;
use serde::Serialize;
use url::Url;

/// Scope of a host relative to the crawl's base domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Same host as the base domain (or no host at all)
    Internal,
    /// A proper subdomain of the base domain
    Subdomain,
    /// Anything else
    External,
}

impl Scope {
    /// Returns true if URLs in this scope are fetched and parsed
    pub fn is_crawlable(&self) -> bool {
        matches!(self, Self::Internal | Self::Subdomain)
    }
}

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_census::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Determines the scope of `host` relative to `base_domain`
///
/// An absent host is treated as a same-document reference and is Internal.
pub fn scope_of(host: Option<&str>, base_domain: &str) -> Scope {
    match host {
        None => Scope::Internal,
        Some(h) if h.is_empty() || h.eq_ignore_ascii_case(base_domain) => Scope::Internal,
        Some(h) if is_subdomain_of(&h.to_lowercase(), base_domain) => Scope::Subdomain,
        Some(_) => Scope::External,
    }
}
