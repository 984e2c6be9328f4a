use crate::config::types::{CrawlerConfig, MAX_WORKERS};
use crate::url::{extract_domain, normalize_url};
use crate::{CensusError, UrlError};
use std::time::Duration;
use url::Url;

/// Immutable per-run crawl settings derived from a seed URL and the
/// crawler configuration
///
/// A malformed seed does not make construction fail: it is kept as
/// `seed_error` and the engine reports it as a single broken link.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// The seed exactly as supplied by the caller
    pub seed: String,

    /// Normalized seed URL, `None` when the seed could not be parsed
    pub base_url: Option<Url>,

    /// Why the seed was rejected, if it was
    pub seed_error: Option<UrlError>,

    /// Lowercase host of the seed URL (empty for a malformed seed)
    pub base_domain: String,

    /// Maximum number of distinct pages to fetch
    pub page_budget: usize,

    /// Number of concurrent fetch workers
    pub workers: usize,

    /// Timeout for each individual request
    pub request_timeout: Duration,

    /// Maximum redirect hops per request
    pub max_redirects: usize,

    /// Recognized document extensions, lowercased, with leading dot
    pub file_extensions: Vec<String>,
}

impl SeedConfig {
    /// Builds the settings for one crawl
    ///
    /// # Errors
    ///
    /// Fails fast on contract violations (zero budget, worker count out of
    /// range). A malformed seed is not an error here.
    pub fn new(seed: &str, crawler: &CrawlerConfig) -> Result<Self, CensusError> {
        if crawler.page_budget == 0 {
            return Err(CensusError::InvalidBudget(crawler.page_budget));
        }

        if crawler.workers == 0 || crawler.workers > MAX_WORKERS {
            return Err(CensusError::InvalidWorkers {
                got: crawler.workers,
                max: MAX_WORKERS,
            });
        }

        let (base_url, seed_error) = match normalize_url(seed.trim()) {
            Ok(url) => (Some(url), None),
            Err(e) => (None, Some(e)),
        };

        let base_domain = base_url
            .as_ref()
            .and_then(extract_domain)
            .unwrap_or_default();

        Ok(Self {
            seed: seed.to_string(),
            base_url,
            seed_error,
            base_domain,
            page_budget: crawler.page_budget,
            workers: crawler.workers,
            request_timeout: Duration::from_millis(crawler.request_timeout_ms),
            max_redirects: crawler.max_redirects,
            file_extensions: crawler
                .file_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        })
    }
}
