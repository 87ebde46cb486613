//! URL handling module for SiteSift
//!
//! This module provides the canonical URL type used for every membership
//! test during a crawl, and the scope filter that keeps the crawl on the
//! seed's site.

mod canonical;
mod scope;

// Re-export main types and functions
pub use canonical::CanonicalUrl;
pub use scope::in_scope;
