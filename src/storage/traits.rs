//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::output::CrawlReport;
use crate::storage::{HostScope, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid stored value: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A backend archives finished crawl reports. Each saved report becomes a
/// run; runs are append-only and never resumed.
pub trait Storage {
    // ===== Writing =====

    /// Saves a finished report as a new run
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn save_report(&mut self, report: &CrawlReport) -> StorageResult<i64>;

    // ===== Run Queries =====

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Lists every run, oldest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    // ===== Run Contents =====

    /// Visited page URLs of a run, sorted
    fn get_pages(&self, run_id: i64) -> StorageResult<Vec<String>>;

    /// Hosts of a run in the given scope, sorted
    fn get_hosts(&self, run_id: i64, scope: HostScope) -> StorageResult<Vec<String>>;

    /// `(extension, url)` pairs of a run, ordered by extension then first
    /// sighting
    fn get_file_links(&self, run_id: i64) -> StorageResult<Vec<(String, String)>>;

    /// Occurrence count of each extension in a run
    fn count_file_links_by_extension(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>>;
}
