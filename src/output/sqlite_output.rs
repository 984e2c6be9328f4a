//! SQLite-based output handler implementation
//!
//! This module provides an output handler that archives finished reports
//! in the SQLite storage backend.

use crate::output::traits::{CrawlReport, OutputError, OutputHandler, OutputResult};
use crate::storage::Storage;
use std::sync::{Arc, Mutex};

/// SQLite-based output handler
///
/// Each report written through this handler becomes one run in the
/// database. The ID of the last saved run is kept for the caller.
pub struct SqliteOutputHandler {
    storage: Arc<Mutex<dyn Storage + Send>>,
    last_run_id: Mutex<Option<i64>>,
}

impl SqliteOutputHandler {
    /// Creates a new SQLite output handler
    pub fn new(storage: Arc<Mutex<dyn Storage + Send>>) -> Self {
        Self {
            storage,
            last_run_id: Mutex::new(None),
        }
    }

    /// Run ID of the most recently saved report
    pub fn last_run_id(&self) -> Option<i64> {
        self.last_run_id.lock().ok().and_then(|id| *id)
    }
}

impl OutputHandler for SqliteOutputHandler {
    fn target(&self) -> String {
        "SQLite database".to_string()
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        let run_id = {
            let mut storage = self
                .storage
                .lock()
                .map_err(|e| OutputError::Write(format!("Failed to lock storage: {}", e)))?;
            storage.save_report(report)?
        };

        tracing::info!("Saved crawl of {} as run {}", report.base_domain, run_id);

        if let Ok(mut last) = self.last_run_id.lock() {
            *last = Some(run_id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, SeedConfig};
    use crate::state::CrawlState;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_write_report_creates_run() {
        let storage = Arc::new(Mutex::new(SqliteStorage::new_in_memory().unwrap()));
        let handler = SqliteOutputHandler::new(storage.clone());
        assert_eq!(handler.last_run_id(), None);

        let seed = SeedConfig::new("http://test.com", &CrawlerConfig::default()).unwrap();
        let mut report = CrawlReport::from_state(&seed, &CrawlState::new());
        report.visited = vec!["http://test.com/".to_string()];

        handler.write_report(&report).unwrap();

        let run_id = handler.last_run_id().unwrap();
        let storage = storage.lock().unwrap();
        assert_eq!(storage.get_run(run_id).unwrap().base_domain, "test.com");
        assert_eq!(storage.get_pages(run_id).unwrap(), vec!["http://test.com/"]);
    }
}
