//! End-of-crawl summary
//!
//! This module holds the counts a finished crawl produces and prints them.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of one finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// When the crawl loop started
    pub started_at: DateTime<Utc>,

    /// Wall-clock time spent in the crawl loop
    pub elapsed: Duration,

    /// URLs that completed processing
    pub visited: usize,

    /// URLs whose text was submitted to the index
    pub indexed: usize,

    /// URLs skipped for having no content (fetch failures included)
    pub skipped: usize,

    /// URLs whose fetch failed
    pub fetch_failures: usize,

    /// URLs still in the frontier when the crawl stopped
    pub remaining: usize,
}

impl CrawlReport {
    /// Pages processed per second over the whole crawl
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.visited as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns true if the crawl stopped with URLs still pending
    pub fn is_truncated(&self) -> bool {
        self.remaining > 0
    }
}

/// Prints the crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Duration: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Pages visited: {}", report.visited);
    println!("  Pages indexed: {}", report.indexed);
    println!("  Pages skipped: {}", report.skipped);
    println!("  Fetch failures: {}", report.fetch_failures);
    if report.is_truncated() {
        println!("  Left in frontier: {}", report.remaining);
    }
    println!("  Rate: {:.2} pages/sec", report.pages_per_second());
}
