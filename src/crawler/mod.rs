//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded redirects
//! - HTML parsing and link extraction
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{crawl, Coordinator};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{extract_links, is_html_content_type};
