//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Deriving statistics from a finished crawl
//! - Printing them to the console
//! - Exporting reports as JSON, markdown or SQLite rows

mod json;
mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::{format_json_report, write_json_report, JsonOutput};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownOutput};
pub use sqlite_output::SqliteOutputHandler;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CrawlReport, OutputError, OutputHandler, OutputResult};

/// Writes `report` through every handler, stopping at the first failure
pub fn write_all(handlers: &[Box<dyn OutputHandler>], report: &CrawlReport) -> OutputResult<()> {
    for handler in handlers {
        tracing::info!("Writing {}", handler.target());
        handler.write_report(report)?;
    }
    Ok(())
}
