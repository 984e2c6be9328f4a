//! Site-Census: a single-domain link census
//!
//! This crate crawls one web domain from a seed URL under a fixed page
//! budget and reports aggregate statistics about its link graph: pages
//! visited, internal pages, subdomains, external hosts, broken links and
//! document-file references.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Census operations
///
/// Fetch failures never surface here; they are absorbed into the crawl
/// statistics as broken links. Only contract violations and collaborator
/// failures (config, export, storage) are reported as errors.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page budget must be at least 1, got {0}")]
    InvalidBudget(usize),

    #[error("Worker count must be between 1 and {max}, got {got}")]
    InvalidWorkers { got: usize, max: usize },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid file extension: {0}")]
    InvalidExtension(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, SeedConfig};
pub use crawler::{crawl, Coordinator, FetchResult, Fetcher, HttpFetcher};
pub use output::CrawlStatistics;
pub use state::{CrawlPhase, CrawlState};
pub use url::{classify, LinkClassification, LinkKind, Rejection};
