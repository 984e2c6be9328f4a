//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: lifecycle of a crawl run (idle, running, and the three
//!   terminal outcomes)
//! - `CrawlState`: frontier, visited pages, link sets and counters owned by
//!   the coordinator

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::{BrokenLink, CrawlState, FileLinks};
pub use phase::CrawlPhase;
