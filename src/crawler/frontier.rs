//! Frontier and dedup store for one crawl
//!
//! [`CrawlState`] bundles the three sets a crawl owns:
//! - the frontier of URLs still to process
//! - the visited set (fetch attempted, successfully or not)
//! - the indexed set (text submitted to the index)
//!
//! All three are keyed by [`CanonicalUrl`], start empty, and are dropped with
//! the state at the end of the crawl.

use crate::config::FrontierOrder;
use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// Frontier, visited set and indexed set of a single crawl
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Pop order for the frontier
    order: FrontierOrder,

    /// URLs waiting to be processed
    frontier: VecDeque<CanonicalUrl>,

    /// Membership mirror of `frontier`, so a URL is queued at most once
    queued: HashSet<CanonicalUrl>,

    /// URLs that completed the fetch and extract phase
    visited: HashSet<CanonicalUrl>,

    /// URLs whose text was submitted to the index
    indexed: HashSet<CanonicalUrl>,
}

impl CrawlState {
    /// Creates an empty state
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            order,
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            indexed: HashSet::new(),
        }
    }

    /// Records that a URL finished its fetch phase
    ///
    /// Returns true if the URL was not visited before.
    pub fn mark_visited(&mut self, url: &CanonicalUrl) -> bool {
        self.visited.insert(url.clone())
    }

    /// Returns true if the URL has been visited
    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    /// Records that a URL's text was submitted to the index
    ///
    /// Returns true if the URL was not indexed before.
    pub fn mark_indexed(&mut self, url: &CanonicalUrl) -> bool {
        self.indexed.insert(url.clone())
    }

    /// Returns true if the URL has been indexed
    pub fn is_indexed(&self, url: &CanonicalUrl) -> bool {
        self.indexed.contains(url)
    }

    /// Adds URLs to the frontier
    ///
    /// URLs already visited or already waiting are silently dropped.
    /// Returns how many URLs were actually added.
    pub fn enqueue<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = CanonicalUrl>,
    {
        let mut added = 0;

        for url in urls {
            if self.visited.contains(&url) || self.queued.contains(&url) {
                continue;
            }
            self.queued.insert(url.clone());
            self.frontier.push_back(url);
            added += 1;
        }

        added
    }

    /// Removes one URL from the frontier
    ///
    /// Returns `None` when the frontier is empty.
    pub fn dequeue_one(&mut self) -> Option<CanonicalUrl> {
        let url = match self.order {
            FrontierOrder::Fifo => self.frontier.pop_front(),
            FrontierOrder::Lifo => self.frontier.pop_back(),
        }?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Number of URLs waiting in the frontier
    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    /// All visited URLs
    pub fn visited(&self) -> &HashSet<CanonicalUrl> {
        &self.visited
    }

    /// All indexed URLs
    pub fn indexed(&self) -> &HashSet<CanonicalUrl> {
        &self.indexed
    }

    /// Frontier pop order in use
    pub fn order(&self) -> FrontierOrder {
        self.order
    }
}
