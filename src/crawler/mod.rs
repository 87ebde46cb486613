//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with soft failure classification
//! - Visible text and link extraction
//! - Frontier and dedup bookkeeping
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::Coordinator;
pub use extractor::{clean_text, extract, ExtractedPage};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome, HttpFetcher, PageFetcher};
pub use frontier::CrawlState;

use crate::config::Config;
use crate::index::{open_or_create, HttpIndexClient};
use crate::output::{CrawlReport, StatusReporter};
use crate::url::CanonicalUrl;
use crate::SiftError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Canonicalize the seed URL, which also becomes the scope boundary
/// 2. Look up the named index, creating it if absent
/// 3. Build the HTTP fetcher
/// 4. Crawl until the frontier is empty
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; per-page fetch failures are not errors
/// * `Err(SiftError)` - Index lookup, creation or submission failed, or setup failed
///
/// # Example
///
/// ```no_run
/// use sitesift::config::Config;
/// use sitesift::crawler::run_crawl;
/// use sitesift::output::ConsoleReporter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let reporter = ConsoleReporter::stdout(config.status.url_width);
/// let report = run_crawl(&config, "api-key", "docs", "https://example.com/docs/", reporter).await?;
/// println!("{} pages indexed", report.indexed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<R: StatusReporter>(
    config: &Config,
    api_key: &str,
    index_name: &str,
    seed: &str,
    reporter: R,
) -> Result<CrawlReport, SiftError> {
    let seed = CanonicalUrl::parse(seed)?;

    let client = HttpIndexClient::new(&config.index, api_key)?;
    let index = open_or_create(&client, index_name).await?;

    let fetcher = HttpFetcher::new(&config.fetcher)?;

    let mut coordinator = Coordinator::new(seed, config.crawler.clone(), fetcher, index, reporter);
    coordinator.run().await
}
