use crate::crawler::Frontier;
use crate::state::CrawlPhase;
use crate::url::{LinkClassification, LinkKind, Rejection};
use crate::CensusError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Occurrences of one document extension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileLinks {
    /// Every occurrence, duplicates included
    pub count: u64,

    /// Distinct URLs in first-seen order
    pub urls: Vec<String>,
}

impl FileLinks {
    fn record(&mut self, url: &Url) {
        self.count += 1;
        if !self.urls.iter().any(|seen| seen == url.as_str()) {
            self.urls.push(url.to_string());
        }
    }
}

/// A URL that did not produce a usable 2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub url: String,

    /// HTTP status, absent for network failures
    pub status_code: Option<u16>,

    pub reason: String,
}

/// Everything one crawl run has accumulated
///
/// Owned by the coordinator while the crawl runs and handed back read-only
/// once it terminates. Only the coordinator mutates it.
#[derive(Debug, Clone)]
pub struct CrawlState {
    phase: CrawlPhase,
    frontier: Frontier,
    internal_pages: BTreeSet<Url>,
    subdomains: BTreeSet<String>,
    external_resources: BTreeSet<String>,
    file_links: BTreeMap<String, FileLinks>,
    total_links: u64,
    external_link_occurrences: u64,
    rejected_links: u64,
    broken: Vec<BrokenLink>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlState {
    /// Creates an idle state with an empty frontier
    pub fn new() -> Self {
        Self {
            phase: CrawlPhase::Idle,
            frontier: Frontier::new(),
            internal_pages: BTreeSet::new(),
            subdomains: BTreeSet::new(),
            external_resources: BTreeSet::new(),
            file_links: BTreeMap::new(),
            total_links: 0,
            external_link_occurrences: 0,
            rejected_links: 0,
            broken: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Creates an idle state whose frontier holds only `seed`
    pub fn with_seed(seed: Url) -> Self {
        Self {
            frontier: Frontier::with_seed(seed),
            ..Self::new()
        }
    }

    /// Moves the crawl to `next`
    ///
    /// Entering Running stamps the start time; entering a terminal phase
    /// stamps the finish time.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::InvalidTransition` for any move the lifecycle
    /// does not allow.
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), CensusError> {
        if !self.phase.can_transition_to(next) {
            return Err(CensusError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        let now = Utc::now();
        if next == CrawlPhase::Running {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.finished_at = Some(now);
        }

        self.phase = next;
        Ok(())
    }

    /// Folds one classifier outcome into the counters and sets
    ///
    /// Internal and subdomain URLs are offered to the frontier. Returns
    /// true if the frontier accepted the URL.
    pub(crate) fn record_link(&mut self, outcome: Result<LinkClassification, Rejection>) -> bool {
        let link = match outcome {
            Ok(link) => link,
            Err(_) => {
                self.rejected_links += 1;
                return false;
            }
        };

        self.total_links += 1;

        match link.kind {
            LinkKind::Internal => {
                self.internal_pages.insert(link.url.clone());
                self.frontier.enqueue(link.url)
            }
            LinkKind::Subdomain => {
                if let Some(host) = link.host() {
                    self.subdomains.insert(host);
                }
                self.frontier.enqueue(link.url)
            }
            LinkKind::External => {
                if let Some(host) = link.host() {
                    self.external_resources.insert(host);
                }
                self.external_link_occurrences += 1;
                false
            }
            LinkKind::File { extension } => {
                self.file_links.entry(extension).or_default().record(&link.url);
                false
            }
        }
    }

    /// Records a successful fetch; true if `final_url` was newly visited
    pub(crate) fn record_visit(&mut self, final_url: &Url) -> bool {
        self.frontier.mark_visited(final_url)
    }

    /// Records a URL that failed to fetch
    pub(crate) fn record_broken(
        &mut self,
        url: impl Into<String>,
        status_code: Option<u16>,
        reason: impl Into<String>,
    ) {
        self.broken.push(BrokenLink {
            url: url.into(),
            status_code,
            reason: reason.into(),
        });
    }

    pub(crate) fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Final URLs of every successfully fetched page
    pub fn visited(&self) -> &BTreeSet<Url> {
        self.frontier.visited()
    }

    /// Number of distinct pages fetched
    pub fn pages(&self) -> usize {
        self.frontier.visited_count()
    }

    pub fn internal_pages(&self) -> &BTreeSet<Url> {
        &self.internal_pages
    }

    pub fn subdomains(&self) -> &BTreeSet<String> {
        &self.subdomains
    }

    pub fn external_resources(&self) -> &BTreeSet<String> {
        &self.external_resources
    }

    /// Document links keyed by extension
    pub fn file_links(&self) -> &BTreeMap<String, FileLinks> {
        &self.file_links
    }

    /// Classified links, every occurrence
    pub fn total_links(&self) -> u64 {
        self.total_links
    }

    pub fn external_link_occurrences(&self) -> u64 {
        self.external_link_occurrences
    }

    pub fn rejected_links(&self) -> u64 {
        self.rejected_links
    }

    /// Number of failed fetches
    pub fn broken_links(&self) -> usize {
        self.broken.len()
    }

    pub fn broken(&self) -> &[BrokenLink] {
        &self.broken
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}
