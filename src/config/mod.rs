//! Configuration module for Site-Census
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and derives the immutable per-run [`SeedConfig`].
//!
//! # Example
//!
//! ```no_run
//! use site_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.page_budget);
//! ```

mod parser;
mod seed;
mod types;
mod validation;

// Re-export types
pub use seed::SeedConfig;
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_FILE_EXTENSIONS,
    DEFAULT_MAX_REDIRECTS, DEFAULT_PAGE_BUDGET, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_WORKERS,
    MAX_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
