//! State module for tracking crawl progress
//!
//! This module defines the per-URL state machine the crawl controller walks
//! each URL through, from `Pending` to `Visited`.

mod page_state;

// Re-export main types
pub use page_state::PageState;
