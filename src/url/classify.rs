//! Link classification
//!
//! Resolves a raw `href`/`src` value against the page it was found on and
//! assigns it exactly one category.

use crate::url::domain::{scope_of, Scope};
use crate::url::normalize::strip_fragment;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Category assigned to a classified link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkKind {
    /// Same host as the base domain
    Internal,
    /// Proper subdomain of the base domain
    Subdomain,
    /// Outside the base domain's scope
    External,
    /// Path ends with a recognized document extension, whatever the host
    File {
        /// The matched extension, lowercase, with leading dot
        extension: String,
    },
}

impl LinkKind {
    /// Returns true if links of this kind go into the frontier
    ///
    /// Documents are leaves and are never fetched.
    pub fn is_crawlable(&self) -> bool {
        matches!(self, Self::Internal | Self::Subdomain)
    }
}

impl From<Scope> for LinkKind {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Internal => Self::Internal,
            Scope::Subdomain => Self::Subdomain,
            Scope::External => Self::External,
        }
    }
}

/// Outcome of classifying one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClassification {
    /// The assigned category
    pub kind: LinkKind,

    /// Absolute URL, fragment removed
    pub url: Url,

    /// The page the link was found on
    pub source: Url,
}

impl LinkClassification {
    /// Lowercase host of the resolved URL
    pub fn host(&self) -> Option<String> {
        self.url.host_str().map(str::to_lowercase)
    }
}

/// Reasons a raw link is not classified at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty link")]
    Empty,

    #[error("in-page anchor")]
    FragmentOnly,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unresolvable link: {0}")]
    Unparseable(String),
}

/// Classifies a raw link found on `source`
///
/// # Rules
///
/// 1. Empty links, in-page anchors and non-`http(s)` schemes are rejected
/// 2. The link is resolved against `source` and its fragment dropped
/// 3. A path ending in one of `extensions` (compared case-insensitively)
///    makes the link a File, regardless of host
/// 4. Otherwise the host decides: Internal, Subdomain or External
///
/// `extensions` must already be lowercase with a leading dot, as
/// [`SeedConfig`](crate::config::SeedConfig) stores them.
///
/// # Examples
///
/// ```
/// use site_census::url::{classify, LinkKind};
/// use url::Url;
///
/// let source = Url::parse("http://test.com/").unwrap();
/// let exts = vec![".pdf".to_string()];
///
/// let link = classify(&source, "/doc.PDF", "test.com", &exts).unwrap();
/// assert_eq!(link.kind, LinkKind::File { extension: ".pdf".to_string() });
///
/// let link = classify(&source, "//cs.test.com/a", "test.com", &exts).unwrap();
/// assert_eq!(link.kind, LinkKind::Subdomain);
/// assert!(classify(&source, "mailto:a@test.com", "test.com", &exts).is_err());
/// ```
pub fn classify(
    source: &Url,
    raw_link: &str,
    base_domain: &str,
    extensions: &[String],
) -> Result<LinkClassification, Rejection> {
    let raw = raw_link.trim();

    if raw.is_empty() {
        return Err(Rejection::Empty);
    }

    if raw.starts_with('#') {
        return Err(Rejection::FragmentOnly);
    }

    let resolved = source
        .join(raw)
        .map_err(|e| Rejection::Unparseable(format!("{}: {}", raw, e)))?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return Err(Rejection::UnsupportedScheme(resolved.scheme().to_string()));
    }

    let had_fragment = resolved.fragment().is_some();
    let url = strip_fragment(resolved);

    if had_fragment && same_document(&url, source) {
        return Err(Rejection::FragmentOnly);
    }

    let kind = match file_extension(&url, extensions) {
        Some(extension) => LinkKind::File { extension },
        None => scope_of(url.host_str(), base_domain).into(),
    };

    Ok(LinkClassification {
        kind,
        url,
        source: source.clone(),
    })
}

/// Returns the longest configured extension the URL path ends with
fn file_extension(url: &Url, extensions: &[String]) -> Option<String> {
    let path = url.path().to_lowercase();

    extensions
        .iter()
        .filter(|ext| path.ends_with(ext.as_str()))
        .max_by_key(|ext| ext.len())
        .cloned()
}

/// True if both URLs name the same document once fragments are ignored
fn same_document(url: &Url, source: &Url) -> bool {
    let mut source = source.clone();
    source.set_fragment(None);
    *url == source
}
