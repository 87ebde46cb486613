//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. For each URL taken from the frontier
//! it runs fetch, extract, clean and index strictly in sequence, updates the
//! dedup sets, and reports every phase change. The next URL is not touched
//! until the previous one, including its index submission, has finished.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::{clean_text, extract};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::CrawlState;
use crate::index::{IndexDocument, IndexHandle};
use crate::output::{CrawlReport, StatusReporter};
use crate::state::PageState;
use crate::url::CanonicalUrl;
use crate::SiftError;
use chrono::Utc;
use std::time::Instant;

/// Main crawler coordinator structure
///
/// Owns the [`CrawlState`] for exactly one crawl.
pub struct Coordinator<F, H, R> {
    fetcher: F,
    index: H,
    reporter: R,
    base_url: CanonicalUrl,
    config: CrawlerConfig,
    state: CrawlState,
    skipped: usize,
    fetch_failures: usize,
}

impl<F, H, R> Coordinator<F, H, R>
where
    F: PageFetcher,
    H: IndexHandle,
    R: StatusReporter,
{
    /// Creates a coordinator whose frontier holds only the seed
    ///
    /// The seed also fixes the scope boundary for the whole crawl.
    pub fn new(
        seed: CanonicalUrl,
        config: CrawlerConfig,
        fetcher: F,
        index: H,
        reporter: R,
    ) -> Self {
        let mut state = CrawlState::new(config.frontier_order);
        state.enqueue([seed.clone()]);

        Self {
            fetcher,
            index,
            reporter,
            base_url: seed,
            config,
            state,
            skipped: 0,
            fetch_failures: 0,
        }
    }

    /// The crawl's frontier, visited and indexed sets
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl until the frontier is empty
    ///
    /// Fetch failures and empty pages are handled inside the loop. Index
    /// errors stop the crawl and are returned to the caller.
    pub async fn run(&mut self) -> Result<CrawlReport, SiftError> {
        tracing::info!(
            "Starting crawl of {} into index '{}' ({:?} frontier)",
            self.base_url,
            self.index.name(),
            self.state.order()
        );

        let started_at = Utc::now();
        let start_time = Instant::now();
        let mut pages_processed = 0usize;

        while let Some(url) = self.state.dequeue_one() {
            if self.state.is_visited(&url) {
                tracing::debug!("Discarding already visited URL {}", url);
                continue;
            }

            self.process_url(&url).await?;
            pages_processed += 1;

            if pages_processed % 10 == 0 {
                let rate = pages_processed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} indexed, {} in frontier, {:.2} pages/sec",
                    pages_processed,
                    self.state.indexed().len(),
                    self.state.pending(),
                    rate
                );
            }

            if self.config.max_pages > 0 && self.state.visited().len() >= self.config.max_pages {
                tracing::info!(
                    "Reached max-pages limit of {}, {} URLs left in frontier",
                    self.config.max_pages,
                    self.state.pending()
                );
                break;
            }
        }

        let report = CrawlReport {
            started_at,
            elapsed: start_time.elapsed(),
            visited: self.state.visited().len(),
            indexed: self.state.indexed().len(),
            skipped: self.skipped,
            fetch_failures: self.fetch_failures,
            remaining: self.state.pending(),
        };

        tracing::info!(
            "Crawl completed: {} pages visited, {} indexed in {:?}",
            report.visited,
            report.indexed,
            report.elapsed
        );
        self.reporter.crawl_done(&report);

        Ok(report)
    }

    /// Walks one URL through the page state machine
    ///
    /// Returns the outcome state reached before the URL became `Visited`.
    async fn process_url(&mut self, url: &CanonicalUrl) -> Result<PageState, SiftError> {
        let state = self.advance(url, PageState::Pending, PageState::Fetching)?;
        let outcome = self.fetcher.fetch(url).await;

        let Some((final_url, body)) = outcome.into_page() else {
            self.fetch_failures += 1;
            let state = self.advance(url, state, PageState::FetchFailed)?;
            let state = self.advance(url, state, PageState::Skipped)?;
            self.skipped += 1;
            return self.finish(url, state, Vec::<CanonicalUrl>::new());
        };

        let state = self.advance(url, state, PageState::Extracted)?;
        let page_url = served_from(url, &final_url);
        let page = extract(&body, &page_url, &self.base_url, self.config.link_base);
        let text = clean_text(&page.text);

        let state = if text.is_empty() {
            self.skipped += 1;
            self.advance(url, state, PageState::Skipped)?
        } else if self.state.is_indexed(url) {
            self.advance(url, state, PageState::AlreadyIndexed)?
        } else {
            let state = self.advance(url, state, PageState::Indexing)?;
            let document = IndexDocument::for_page(url, text);
            tracing::debug!("Submitting {} ({} chars)", url, document.content.len());
            self.index.upsert(&document).await?;
            self.state.mark_indexed(url);
            self.advance(url, state, PageState::Indexed)?
        };

        self.finish(url, state, page.links)
    }

    /// Marks the URL visited, then merges its links into the frontier
    fn finish<I>(
        &mut self,
        url: &CanonicalUrl,
        state: PageState,
        links: I,
    ) -> Result<PageState, SiftError>
    where
        I: IntoIterator<Item = CanonicalUrl>,
    {
        self.state.mark_visited(url);
        let added = self.state.enqueue(links);
        if added > 0 {
            tracing::debug!("{} new URLs queued from {}", added, url);
        }

        self.advance(url, state, PageState::Visited)?;
        self.reporter.url_done(url);
        Ok(state)
    }

    /// Moves a URL from one state to the next, reporting the new phase
    fn advance(
        &mut self,
        url: &CanonicalUrl,
        from: PageState,
        to: PageState,
    ) -> Result<PageState, SiftError> {
        if !from.can_transition_to(to) {
            return Err(SiftError::InvalidTransition { from, to });
        }

        tracing::trace!("{}: {} -> {}", url, from, to);
        self.reporter.phase(url, to);
        Ok(to)
    }
}

/// Canonical form of the URL a page was served from after redirects
///
/// Falls back to the requested URL if the final URL is unusable. The page is
/// still indexed under the requested URL either way.
fn served_from(requested: &CanonicalUrl, final_url: &str) -> CanonicalUrl {
    match CanonicalUrl::parse(final_url) {
        Ok(served) => served,
        Err(e) => {
            tracing::debug!("Ignoring final URL {} for {}: {}", final_url, requested, e);
            requested.clone()
        }
    }
}
