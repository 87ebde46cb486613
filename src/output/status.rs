//! Console status reporting
//!
//! The crawl controller tells a [`StatusReporter`] about every phase change.
//! Reporters are pure sinks: nothing they do feeds back into the crawl, and
//! write failures are ignored.

use crate::output::CrawlReport;
use crate::state::PageState;
use crate::url::CanonicalUrl;
use std::io::{self, Stdout, Write};

/// Receives progress notifications from the crawl controller
pub trait StatusReporter: Send {
    /// A URL entered a reportable phase
    fn phase(&mut self, url: &CanonicalUrl, state: PageState);

    /// Processing of a URL finished
    fn url_done(&mut self, url: &CanonicalUrl);

    /// The whole crawl finished
    fn crawl_done(&mut self, report: &CrawlReport);
}

impl<R: StatusReporter + ?Sized> StatusReporter for Box<R> {
    fn phase(&mut self, url: &CanonicalUrl, state: PageState) {
        (**self).phase(url, state)
    }

    fn url_done(&mut self, url: &CanonicalUrl) {
        (**self).url_done(url)
    }

    fn crawl_done(&mut self, report: &CrawlReport) {
        (**self).crawl_done(report)
    }
}

/// Rewrites one line per URL: truncated URL, then the current phase
///
/// ```text
/// http://site/docs/intro                                                 | Indexed
/// ```
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    url_width: usize,
}

impl ConsoleReporter<Stdout> {
    /// Reporter writing to standard output
    pub fn stdout(url_width: usize) -> Self {
        Self::new(io::stdout(), url_width)
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Reporter writing to any sink
    pub fn new(out: W, url_width: usize) -> Self {
        Self { out, url_width }
    }

    /// Consumes the reporter, returning the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StatusReporter for ConsoleReporter<W> {
    fn phase(&mut self, url: &CanonicalUrl, state: PageState) {
        let Some(label) = state.status_label() else {
            return;
        };
        let _ = write!(
            self.out,
            "\r{:<width$.width$} | {:<20}",
            url.as_str(),
            label,
            width = self.url_width
        );
        let _ = self.out.flush();
    }

    fn url_done(&mut self, _url: &CanonicalUrl) {
        let _ = writeln!(self.out);
    }

    fn crawl_done(&mut self, report: &CrawlReport) {
        let _ = writeln!(self.out, "\nTotal pages added to index: {}", report.indexed);
        let _ = self.out.flush();
    }
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn phase(&mut self, _url: &CanonicalUrl, _state: PageState) {}

    fn url_done(&mut self, _url: &CanonicalUrl) {}

    fn crawl_done(&mut self, _report: &CrawlReport) {}
}
