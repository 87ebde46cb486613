/// Page state definitions for tracking crawl progress
///
/// Every URL moves strictly forward through these states:
///
/// ```text
/// Pending -> Fetching -> FetchFailed -> Skipped ----------------------> Visited
///                     -> Extracted   -> Skipped ----------------------> Visited
///                                    -> Indexing -> Indexed ----------> Visited
///                                    -> AlreadyIndexed ---------------> Visited
/// ```
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is in the frontier, waiting to be processed
    Pending,

    /// URL is being fetched
    Fetching,

    /// Fetch failed (404, other HTTP error, or transport error)
    FetchFailed,

    /// Page was fetched and its text and links extracted
    Extracted,

    /// Cleaned text is being submitted to the index
    Indexing,

    // ===== Outcome States =====
    /// Page produced no content and will not be indexed
    Skipped,

    /// Page text was submitted to the index
    Indexed,

    /// Page had already been submitted during this crawl
    AlreadyIndexed,

    // ===== Final State =====
    /// URL is finished and will never be fetched again in this crawl
    Visited,
}

impl PageState {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, FetchFailed)
                | (Fetching, Extracted)
                | (FetchFailed, Skipped)
                | (Extracted, Skipped)
                | (Extracted, Indexing)
                | (Extracted, AlreadyIndexed)
                | (Indexing, Indexed)
                | (Skipped, Visited)
                | (Indexed, Visited)
                | (AlreadyIndexed, Visited)
        )
    }

    /// Label shown on the console status line for this phase
    ///
    /// Internal bookkeeping states have no label and are not reported.
    pub fn status_label(&self) -> Option<&'static str> {
        match self {
            Self::Fetching => Some("Fetching"),
            Self::Skipped => Some("Skipped (No content)"),
            Self::Indexing => Some("Indexing"),
            Self::Indexed => Some("Indexed"),
            Self::AlreadyIndexed => Some("Already indexed"),
            Self::Pending | Self::FetchFailed | Self::Extracted | Self::Visited => None,
        }
    }

    /// Short machine-friendly name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::FetchFailed => "fetch_failed",
            Self::Extracted => "extracted",
            Self::Indexing => "indexing",
            Self::Skipped => "skipped",
            Self::Indexed => "indexed",
            Self::AlreadyIndexed => "already_indexed",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
