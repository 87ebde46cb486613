//! SiteSift: crawl one website and feed its text to a search index
//!
//! This crate walks every page reachable from a seed URL that stays under the
//! seed's prefix, extracts visible text and links from each page, and upserts
//! the cleaned text into an external full-text index keyed by canonical URL.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for SiteSift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Index error: {0}")]
    Index(#[from] index::IndexError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiftError {
    /// Returns true if this error came back from the index provider itself
    ///
    /// The entry point reports these distinctly from every other failure.
    pub fn is_index_api_error(&self) -> bool {
        matches!(self, Self::Index(e) if e.is_api_error())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for SiteSift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlState, Coordinator};
pub use index::{IndexDocument, IndexError, IndexHandle, SearchIndex};
pub use output::CrawlReport;
pub use state::PageState;
pub use url::{in_scope, CanonicalUrl};
