//! Output module for progress display and crawl summaries
//!
//! This module handles:
//! - The per-URL console status line
//! - The end-of-crawl report

mod report;
mod status;

pub use report::{print_report, CrawlReport};
pub use status::{ConsoleReporter, SilentReporter, StatusReporter};
