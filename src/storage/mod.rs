//! Storage module for persisting crawl reports
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Archiving finished crawl reports as runs
//! - Querying the pages, hosts and documents of past runs

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::CrawlPhase;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a crawl run in the database
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: i64,
    pub seed: String,
    pub base_domain: String,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub outcome: CrawlPhase,
    pub config_hash: Option<String>,
    pub total_pages: u64,
    pub total_links: u64,
    pub internal_pages: u64,
    pub subdomains: u64,
    pub external_hosts: u64,
    pub external_link_occurrences: u64,
    pub rejected_links: u64,
    pub broken_links: u64,
}

/// Which host set a stored host belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostScope {
    Subdomain,
    External,
}

impl HostScope {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::External => "external",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "subdomain" => Some(Self::Subdomain),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}
