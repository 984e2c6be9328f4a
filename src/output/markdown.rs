//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including statistics, document links, broken links and discovered hosts.

use crate::output::traits::{CrawlReport, OutputHandler, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum number of hosts or URLs listed per section
const LIST_LIMIT: usize = 50;

/// Generates a markdown summary of a crawl report
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let stats = &report.statistics;
    let mut md = String::new();

    md.push_str("# Site Census Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed));
    md.push_str(&format!("- **Base Domain**: {}\n", report.base_domain));
    if let Some(started) = report.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    md.push_str(&format!("- **Outcome**: {}\n", stats.outcome));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Crawled | {} |\n", stats.total_pages));
    md.push_str(&format!("| Total Links | {} |\n", stats.total_links));
    md.push_str(&format!("| Internal Pages | {} |\n", stats.internal_pages));
    md.push_str(&format!("| Subdomains | {} |\n", stats.subdomains));
    md.push_str(&format!("| External Hosts | {} |\n", stats.external_links));
    md.push_str(&format!(
        "| External Link Occurrences | {} |\n",
        stats.external_link_occurrences
    ));
    md.push_str(&format!("| Rejected Links | {} |\n", stats.rejected_links));
    md.push_str(&format!("| Broken Links | {} |\n", stats.broken_links));
    md.push_str(&format!("| Unique File Links | {} |\n", stats.unique_file_links));
    md.push_str(&format!("| Success Rate | {:.2}% |\n\n", stats.success_rate()));

    // Document links
    if !stats.file_links.is_empty() {
        md.push_str("## File Links\n\n");
        md.push_str("| Extension | Occurrences | Distinct URLs |\n");
        md.push_str("|-----------|-------------|---------------|\n");
        for (ext, links) in &stats.file_links {
            md.push_str(&format!("| {} | {} | {} |\n", ext, links.count, links.urls.len()));
        }
        md.push('\n');
    }

    if !report.broken.is_empty() {
        md.push_str("## Broken Links\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for broken in report.broken.iter().take(LIST_LIMIT) {
            md.push_str(&format!("| {} | {} |\n", broken.url, broken.reason));
        }
        push_overflow(&mut md, report.broken.len());
    }

    push_host_list(&mut md, "Subdomains", &report.subdomains);
    push_host_list(&mut md, "External Hosts", &report.external_resources);

    md
}

fn push_host_list(md: &mut String, title: &str, hosts: &[String]) {
    if hosts.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", title));
    md.push_str(&format!("Total: {}\n\n", hosts.len()));
    for host in hosts.iter().take(LIST_LIMIT) {
        md.push_str(&format!("- {}\n", host));
    }
    push_overflow(md, hosts.len());
}

fn push_overflow(md: &mut String, total: usize) {
    if total > LIST_LIMIT {
        md.push_str(&format!("\n... and {} more\n\n", total - LIST_LIMIT));
    } else {
        md.push('\n');
    }
}

/// Writes the markdown summary to a file
pub struct MarkdownOutput {
    path: PathBuf,
}

impl MarkdownOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownOutput {
    fn target(&self) -> String {
        format!("markdown summary {}", self.path.display())
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        generate_markdown_summary(report, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, SeedConfig};
    use crate::state::{BrokenLink, CrawlState, FileLinks};

    fn create_test_report() -> CrawlReport {
        let seed = SeedConfig::new("http://test.com", &CrawlerConfig::default()).unwrap();
        let mut report = CrawlReport::from_state(&seed, &CrawlState::new());
        report.statistics.total_pages = 42;
        report.statistics.total_links = 1234;
        report
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_report());

        assert!(markdown.contains("# Site Census Summary"));
        assert!(markdown.contains("**Base Domain**: test.com"));
        assert!(markdown.contains("| Pages Crawled | 42 |"));
        assert!(markdown.contains("| Total Links | 1234 |"));
        assert!(!markdown.contains("## File Links"));
        assert!(!markdown.contains("Config Hash"));
    }

    #[test]
    fn test_markdown_with_file_links_and_broken() {
        let mut report = create_test_report().with_config_hash("abc123");
        report.statistics.file_links.insert(
            ".pdf".to_string(),
            FileLinks {
                count: 3,
                urls: vec!["http://test.com/a.pdf".to_string()],
            },
        );
        report.broken.push(BrokenLink {
            url: "http://test.com/missing".to_string(),
            status_code: Some(404),
            reason: "HTTP 404".to_string(),
        });

        let markdown = format_markdown_summary(&report);

        assert!(markdown.contains("| .pdf | 3 | 1 |"));
        assert!(markdown.contains("| http://test.com/missing | HTTP 404 |"));
        assert!(markdown.contains("**Config Hash**: abc123"));
    }

    #[test]
    fn test_long_host_lists_are_truncated() {
        let mut report = create_test_report();
        report.external_resources = (0..60).map(|i| format!("host{}.org", i)).collect();

        let markdown = format_markdown_summary(&report);

        assert!(markdown.contains("Total: 60"));
        assert!(markdown.contains("... and 10 more"));
        assert!(!markdown.contains("host55.org"));
    }

    #[test]
    fn test_markdown_output_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        let handler = MarkdownOutput::new(&path);
        handler.write_report(&create_test_report()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Site Census Summary"));
        assert!(handler.target().contains("summary.md"));
    }
}
