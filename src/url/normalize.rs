use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes an absolute URL string into the form used as a crawl key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Host lowercasing, default-port removal, dot-segment removal and the
/// empty-path-to-`/` rule are applied by the `url` parser itself. Query
/// strings are kept as-is: `/page?a=1` and `/page?a=2` are different pages.
///
/// # Examples
///
/// ```
/// use site_census::url::normalize_url;
///
/// let url = normalize_url("http://Test.COM:80/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "http://test.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(strip_fragment(url))
}

/// Removes the fragment from an already-parsed URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
