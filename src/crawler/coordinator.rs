//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Dispatching frontier URLs to a bounded pool of fetch tasks
//! - Folding fetch results into the crawl state
//! - Classifying discovered links and growing the frontier
//! - Budget accounting, termination and cancellation
//!
//! The coordinator task is the only owner of [`CrawlState`]. Workers fetch
//! and parse, then hand the raw links back through their join handle.
//! Results are folded strictly in dispatch order, so the frontier grows in
//! the same order a one-at-a-time crawl would grow it, whatever the worker
//! count or response latencies.

use crate::config::{validate, Config, SeedConfig};
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::parser::{extract_links, is_html_content_type};
use crate::state::{CrawlPhase, CrawlState};
use crate::url::{classify, scope_of};
use crate::CensusError;
use futures::stream::{FuturesOrdered, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Extra time a worker gets beyond the client timeout before it is cut off
const TIMEOUT_GRACE: Duration = Duration::from_millis(250);

/// How often (in visited pages) progress is logged
const PROGRESS_INTERVAL: usize = 10;

/// What a worker sends back for one dispatched URL
#[derive(Debug)]
struct WorkerOutcome {
    result: FetchResult,
    /// Raw links from the body, empty unless the fetch returned HTML
    links: Vec<String>,
}

/// Fetches underway, oldest dispatch first
///
/// `results` yields in push order; `urls` holds the matching requested URL
/// and abort handle at the same position.
#[derive(Default)]
struct InFlight {
    results: FuturesOrdered<JoinHandle<WorkerOutcome>>,
    urls: VecDeque<(Url, AbortHandle)>,
}

impl InFlight {
    fn len(&self) -> usize {
        self.urls.len()
    }

    fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn push(&mut self, url: Url, handle: JoinHandle<WorkerOutcome>) {
        self.urls.push_back((url, handle.abort_handle()));
        self.results.push_back(handle);
    }

    /// Waits for the oldest fetch and pairs it with its URL
    async fn next(&mut self) -> Option<(Url, Result<WorkerOutcome, JoinError>)> {
        let joined = self.results.next().await?;
        let (url, _) = self.urls.pop_front()?;
        Some((url, joined))
    }

    /// Aborts every fetch and returns their URLs in dispatch order
    async fn abort_all(&mut self) -> Vec<Url> {
        for (_, handle) in &self.urls {
            handle.abort();
        }
        while self.results.next().await.is_some() {}

        self.urls.drain(..).map(|(url, _)| url).collect()
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        for (_, handle) in &self.urls {
            handle.abort();
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: SeedConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Errors
    ///
    /// * `CensusError::InvalidBudget` / `CensusError::InvalidWorkers` for
    ///   contract violations
    /// * `CensusError::Config` if the configuration does not validate
    /// * `CensusError::Reqwest` if the HTTP client cannot be built
    pub fn new(seed: &str, config: &Config) -> Result<Self, CensusError> {
        let seed_config = Self::prepare(seed, config)?;
        let fetcher = HttpFetcher::new(
            &config.user_agent,
            seed_config.request_timeout,
            seed_config.max_redirects,
        )?;

        Ok(Self {
            seed: seed_config,
            fetcher: Arc::new(fetcher),
        })
    }

    /// Creates a coordinator that uses the given fetcher
    pub fn with_fetcher(
        seed: &str,
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, CensusError> {
        Ok(Self {
            seed: Self::prepare(seed, config)?,
            fetcher,
        })
    }

    fn prepare(seed: &str, config: &Config) -> Result<SeedConfig, CensusError> {
        // Budget and worker range are reported as their own errors, so they
        // are checked before general validation
        let seed_config = SeedConfig::new(seed, &config.crawler)?;
        validate(config)?;
        Ok(seed_config)
    }

    /// The settings this coordinator crawls with
    pub fn seed_config(&self) -> &SeedConfig {
        &self.seed
    }

    /// Runs the crawl to completion
    pub async fn run(&self) -> Result<CrawlState, CensusError> {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Runs the crawl until it terminates or `token` is cancelled
    ///
    /// On cancellation every in-flight fetch is aborted, its URL goes back
    /// to the front of the frontier, and the state ends in
    /// [`CrawlPhase::Cancelled`] with everything gathered so far.
    pub async fn run_until_cancelled(
        &self,
        token: CancellationToken,
    ) -> Result<CrawlState, CensusError> {
        let Some(base_url) = self.seed.base_url.clone() else {
            return self.malformed_seed();
        };

        let mut state = CrawlState::with_seed(base_url);
        state.transition(CrawlPhase::Running)?;

        tracing::info!(
            "Starting crawl of {} (budget {}, {} workers)",
            self.seed.base_domain,
            self.seed.page_budget,
            self.seed.workers
        );

        let start_time = Instant::now();
        let mut in_flight = InFlight::default();

        let outcome = loop {
            self.dispatch(&mut state, &mut in_flight);

            if in_flight.is_empty() {
                break if state.frontier().is_empty() {
                    CrawlPhase::Completed
                } else {
                    CrawlPhase::Exhausted
                };
            }

            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    let released = in_flight.abort_all().await;
                    let count = released.len();

                    // Front-inserted in reverse so the queue keeps dispatch order
                    for url in released.into_iter().rev() {
                        state.frontier_mut().release(url);
                    }
                    tracing::info!("Crawl cancelled, {} in-flight URLs released", count);
                    break CrawlPhase::Cancelled;
                }

                Some((requested, joined)) = in_flight.next() => {
                    let before = state.pages();
                    self.handle_joined(&mut state, requested, joined);

                    let after = state.pages();
                    if after > before && after % PROGRESS_INTERVAL == 0 {
                        let rate = after as f64 / start_time.elapsed().as_secs_f64();
                        tracing::info!(
                            "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                            after,
                            state.frontier().len(),
                            rate
                        );
                    }
                }
            }
        };

        state.transition(outcome)?;

        tracing::info!(
            "Crawl {}: {} pages, {} links, {} broken in {:?}",
            outcome,
            state.pages(),
            state.total_links(),
            state.broken_links(),
            start_time.elapsed()
        );

        Ok(state)
    }

    /// A seed that cannot be fetched is one broken link and nothing else
    fn malformed_seed(&self) -> Result<CrawlState, CensusError> {
        let reason = self
            .seed
            .seed_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "invalid seed URL".to_string());

        tracing::warn!("Broken seed {}: {}", self.seed.seed, reason);

        let mut state = CrawlState::new();
        state.transition(CrawlPhase::Running)?;
        state.record_broken(self.seed.seed.as_str(), None, reason);
        state.transition(CrawlPhase::Completed)?;
        Ok(state)
    }

    /// Fills free worker slots from the frontier
    ///
    /// A slot is only used while `visited + in_flight < budget`, so the
    /// budget can never be overrun by fetches already underway.
    fn dispatch(&self, state: &mut CrawlState, in_flight: &mut InFlight) {
        let free_workers = self.seed.workers.saturating_sub(in_flight.len());
        let free_budget = self
            .seed
            .page_budget
            .saturating_sub(state.pages() + in_flight.len());

        let batch = state
            .frontier_mut()
            .next_batch(free_workers.min(free_budget));

        for url in batch {
            tracing::debug!("Dispatching {}", url);

            let fetcher = Arc::clone(&self.fetcher);
            let limit = self.seed.request_timeout + TIMEOUT_GRACE;
            let handle = tokio::spawn(fetch_and_parse(fetcher, url.clone(), limit));
            in_flight.push(url, handle);
        }
    }

    fn handle_joined(
        &self,
        state: &mut CrawlState,
        requested: Url,
        joined: Result<WorkerOutcome, JoinError>,
    ) {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Fetch task for {} failed: {}", requested, e);
                state.record_broken(requested.as_str(), None, "worker panicked");
                return;
            }
        };

        match outcome.result {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                ..
            } => {
                if !scope_of(final_url.host_str(), &self.seed.base_domain).is_crawlable() {
                    tracing::debug!("{} redirected off-site to {}", requested, final_url);
                    return;
                }

                if !is_html_content_type(content_type.as_deref()) {
                    let reason = format!(
                        "Not an HTML page ({})",
                        content_type.as_deref().unwrap_or_default()
                    );
                    tracing::warn!("Broken link {}: {}", requested, reason);
                    state.record_broken(requested.as_str(), Some(status_code), reason);
                    return;
                }

                if !state.record_visit(&final_url) {
                    tracing::debug!("{} resolved to already visited {}", requested, final_url);
                    return;
                }

                tracing::debug!("Visited {} ({} links)", final_url, outcome.links.len());

                for raw in &outcome.links {
                    let classified = classify(
                        &final_url,
                        raw,
                        &self.seed.base_domain,
                        &self.seed.file_extensions,
                    );
                    if let Err(rejection) = &classified {
                        tracing::trace!("Rejected link {:?} on {}: {}", raw, final_url, rejection);
                    }
                    state.record_link(classified);
                }
            }

            failure => {
                let reason = failure
                    .failure_reason()
                    .unwrap_or_else(|| "fetch failed".to_string());
                let status_code = match failure {
                    FetchResult::HttpError { status_code } => Some(status_code),
                    _ => None,
                };

                tracing::warn!("Broken link {}: {}", requested, reason);
                state.record_broken(requested.as_str(), status_code, reason);
            }
        }
    }
}

/// Worker body: fetch one URL and extract its raw links
async fn fetch_and_parse(fetcher: Arc<dyn Fetcher>, url: Url, limit: Duration) -> WorkerOutcome {
    let result = match tokio::time::timeout(limit, fetcher.fetch(&url)).await {
        Ok(result) => result,
        Err(_) => FetchResult::NetworkError {
            reason: "Request timeout".to_string(),
        },
    };

    let links = match &result {
        FetchResult::Success {
            body, content_type, ..
        } => extract_links(body, content_type.as_deref()),
        _ => Vec::new(),
    };

    WorkerOutcome { result, links }
}

/// Crawls `seed_url` with the default configuration and the given budget
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), site_census::CensusError> {
/// let state = site_census::crawl("https://example.org", 50).await?;
/// println!("{} pages", state.pages());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed_url: &str, page_budget: usize) -> Result<CrawlState, CensusError> {
    let mut config = Config::default();
    config.crawler.page_budget = page_budget;

    Coordinator::new(seed_url, &config)?.run().await
}
