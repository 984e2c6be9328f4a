//! Crawl frontier with deduplication
//!
//! URLs are handed out in FIFO (breadth-first) order so a given site and
//! budget always produce the same crawl trace. Every URL is handed out at
//! most once: after dispatch it either becomes visited, is recorded as
//! broken by the engine, or is released back by cancellation.

use std::collections::{BTreeSet, HashSet, VecDeque};
use url::Url;

/// Discovered-but-unfetched URLs plus the set of visited pages
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    /// Waiting URLs in dispatch order
    queue: VecDeque<Url>,

    /// Membership index for `queue`
    queued: HashSet<Url>,

    /// URLs handed to a worker that are not (yet) visited
    dispatched: HashSet<Url>,

    /// Final URLs of successfully fetched pages
    visited: BTreeSet<Url>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed URL
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::new();
        frontier.enqueue(seed);
        frontier
    }

    /// Adds a URL to the back of the queue
    ///
    /// No-op (returns false) if the URL is already visited, already queued,
    /// or was already dispatched to a worker.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url)
            || self.queued.contains(&url)
            || self.dispatched.contains(&url)
        {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Takes up to `n` URLs from the front of the queue for dispatch
    ///
    /// Taken URLs are remembered as dispatched so they can never be queued
    /// again.
    pub fn next_batch(&mut self, n: usize) -> Vec<Url> {
        let mut batch = Vec::with_capacity(n.min(self.queue.len()));

        while batch.len() < n {
            let Some(url) = self.queue.pop_front() else {
                break;
            };
            self.queued.remove(&url);

            // mark_visited keeps visited URLs out of the queue; this guards
            // the dispatch path regardless
            if self.visited.contains(&url) {
                continue;
            }

            self.dispatched.insert(url.clone());
            batch.push(url);
        }

        batch
    }

    /// Records `url` (a post-redirect final URL) as visited
    ///
    /// Returns true only the first time a URL is visited. A queued copy of
    /// the URL is dropped so visited and queued never overlap.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }

        self.dispatched.remove(url);
        if self.queued.remove(url) {
            self.queue.retain(|queued| queued != url);
        }

        true
    }

    /// Returns a dispatched URL to the front of the queue
    ///
    /// Used when an in-flight fetch is aborted so the URL stays eligible.
    pub fn release(&mut self, url: Url) {
        if !self.dispatched.remove(&url) || self.visited.contains(&url) {
            return;
        }

        self.queued.insert(url.clone());
        self.queue.push_front(url);
    }

    /// Returns true if `url` has been visited
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if `url` is waiting in the queue
    pub fn is_queued(&self, url: &Url) -> bool {
        self.queued.contains(url)
    }

    /// Visited URLs in sorted order
    pub fn visited(&self) -> &BTreeSet<Url> {
        &self.visited
    }

    /// Number of visited pages
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Queued URLs in dispatch order
    pub fn queued_urls(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
