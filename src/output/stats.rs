//! Statistics derived from a finished crawl
//!
//! [`CrawlStatistics`] is a pure read-only view computed from a
//! [`CrawlState`]; nothing here mutates or re-queries anything.

use crate::state::{CrawlPhase, CrawlState, FileLinks};
use serde::Serialize;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlStatistics {
    /// Distinct pages fetched successfully
    pub total_pages: usize,

    /// Classified links, duplicates and file links included
    pub total_links: u64,

    /// Distinct internal page URLs seen
    pub internal_pages: usize,

    /// Distinct subdomain hosts
    pub subdomains: usize,

    /// Distinct external hosts
    pub external_links: usize,

    /// Every link pointing outside the base domain
    pub external_link_occurrences: u64,

    /// Links dropped by the classifier (empty, anchors, other schemes)
    pub rejected_links: u64,

    /// Fetches that did not produce a 2xx page
    pub broken_links: usize,

    /// Distinct document URLs across all extensions
    pub unique_file_links: usize,

    /// Per-extension document links
    pub file_links: BTreeMap<String, FileLinks>,

    /// How the crawl ended
    pub outcome: CrawlPhase,
}

impl CrawlStatistics {
    /// Derives the statistics of a crawl state
    pub fn from_state(state: &CrawlState) -> Self {
        let file_links = state.file_links().clone();
        let unique_file_links = file_links.values().map(|f| f.urls.len()).sum();

        Self {
            total_pages: state.pages(),
            total_links: state.total_links(),
            internal_pages: state.internal_pages().len(),
            subdomains: state.subdomains().len(),
            external_links: state.external_resources().len(),
            external_link_occurrences: state.external_link_occurrences(),
            rejected_links: state.rejected_links(),
            broken_links: state.broken_links(),
            unique_file_links,
            file_links,
            outcome: state.phase(),
        }
    }

    /// Share of fetches that produced a page, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total_pages + self.broken_links;
        if attempted == 0 {
            return 0.0;
        }
        (self.total_pages as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Total pages crawled: {}", stats.total_pages);
    println!("Total links found: {}", stats.total_links);
    println!("Internal pages: {}", stats.internal_pages);
    println!("Broken links: {}", stats.broken_links);
    println!("Internal subdomains found: {}", stats.subdomains);
    println!(
        "External links: {} ({} occurrences)",
        stats.external_links, stats.external_link_occurrences
    );
    println!("Rejected links: {}", stats.rejected_links);
    println!("Unique file links: {}", stats.unique_file_links);

    println!("File links:");
    if stats.file_links.is_empty() {
        println!("  (none)");
    }
    for (ext, links) in &stats.file_links {
        println!("  {}: {}", ext, links.count);
    }
    println!();

    println!(
        "Outcome: {} (success rate {:.1}%)",
        stats.outcome,
        stats.success_rate()
    );
}
