//! Configuration module for SiteSift
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file, [`Config::default`] is used.
//!
//! # Example
//!
//! ```no_run
//! use sitesift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitesift.toml")).unwrap();
//! println!("Fetch timeout: {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetcherConfig, FrontierOrder, IndexConfig, LinkBase, StatusConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
