use serde::Deserialize;

/// Main configuration structure for SiteSift
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to [`Default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub crawler: CrawlerConfig,
    pub index: IndexConfig,
    pub status: StatusConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Total time budget for one GET, in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Time budget for establishing the connection, in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("sitesift/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Order in which pending URLs leave the frontier
    #[serde(rename = "frontier-order")]
    pub frontier_order: FrontierOrder,

    /// URL that relative hrefs are resolved against
    #[serde(rename = "link-base")]
    pub link_base: LinkBase,

    /// Stop after visiting this many URLs (0 means no limit)
    #[serde(rename = "max-pages")]
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            frontier_order: FrontierOrder::Fifo,
            link_base: LinkBase::Page,
            max_pages: 0,
        }
    }
}

/// Frontier pop order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierOrder {
    /// Oldest discovered URL first (breadth-first)
    #[default]
    Fifo,
    /// Newest discovered URL first (depth-first)
    Lifo,
}

/// Base URL used when resolving relative links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkBase {
    /// Resolve against the page the link was found on
    #[default]
    Page,
    /// Resolve against the seed URL
    Seed,
}

/// External search index connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Root URL of the index API
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Total timeout for each index API request
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.opper.ai".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Console status line
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Characters of the URL shown before truncation
    #[serde(rename = "url-width")]
    pub url_width: usize,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { url_width: 70 }
    }
}
