//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! report every handler consumes.

use crate::config::SeedConfig;
use crate::output::stats::CrawlStatistics;
use crate::state::{BrokenLink, CrawlState};
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything known about one finished crawl
///
/// Set-valued fields are sorted so two reports of the same crawl compare
/// and serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlReport {
    /// The seed as supplied
    pub seed: String,

    /// Host the crawl was scoped to
    pub base_domain: String,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,

    /// SHA-256 of the configuration file, when one was used
    pub config_hash: Option<String>,

    pub statistics: CrawlStatistics,

    /// Final URLs of visited pages
    pub visited: Vec<String>,

    pub subdomains: Vec<String>,

    pub external_resources: Vec<String>,

    pub broken: Vec<BrokenLink>,
}

impl CrawlReport {
    /// Builds a report from a crawl's settings and final state
    pub fn from_state(seed: &SeedConfig, state: &CrawlState) -> Self {
        Self {
            seed: seed.seed.clone(),
            base_domain: seed.base_domain.clone(),
            started_at: state.started_at(),
            finished_at: state.finished_at(),
            config_hash: None,
            statistics: CrawlStatistics::from_state(state),
            visited: state.visited().iter().map(|u| u.to_string()).collect(),
            subdomains: state.subdomains().iter().cloned().collect(),
            external_resources: state.external_resources().iter().cloned().collect(),
            broken: state.broken().to_vec(),
        }
    }

    /// Records which configuration produced this report
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

/// Trait for output handlers
///
/// A handler receives the finished report once and writes it somewhere.
pub trait OutputHandler {
    /// Short description of where the report goes, for logging
    fn target(&self) -> String;

    /// Writes the report
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::state::CrawlPhase;

    #[test]
    fn test_report_from_state() {
        let seed = SeedConfig::new("http://Test.com", &CrawlerConfig::default()).unwrap();
        let mut state = CrawlState::new();
        state.transition(CrawlPhase::Running).unwrap();
        state.record_broken("http://test.com/", Some(500), "HTTP 500");
        state.transition(CrawlPhase::Completed).unwrap();

        let report = CrawlReport::from_state(&seed, &state);

        assert_eq!(report.seed, "http://Test.com");
        assert_eq!(report.base_domain, "test.com");
        assert_eq!(report.statistics.broken_links, 1);
        assert_eq!(report.broken.len(), 1);
        assert!(report.config_hash.is_none());
        assert!(report.duration_seconds().is_some());
    }

    #[test]
    fn test_with_config_hash() {
        let seed = SeedConfig::new("http://test.com", &CrawlerConfig::default()).unwrap();
        let report = CrawlReport::from_state(&seed, &CrawlState::new()).with_config_hash("abc123");

        assert_eq!(report.config_hash.as_deref(), Some("abc123"));
        assert!(report.duration_seconds().is_none());
    }
}
