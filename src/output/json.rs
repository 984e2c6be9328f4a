//! JSON report export

use crate::output::traits::{CrawlReport, OutputHandler, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serializes a report as pretty-printed JSON
pub fn format_json_report(report: &CrawlReport) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes a report as JSON to `output_path`
pub fn write_json_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the full report to a JSON file
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonOutput {
    fn target(&self) -> String {
        format!("JSON report {}", self.path.display())
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        write_json_report(report, &self.path)
    }
}
