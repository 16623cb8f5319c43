use crate::adapters::AdapterKind;
use crate::collector::DedupKey;
use crate::output::DEFAULT_CHUNK_SIZE;
use serde::Deserialize;

/// Main configuration structure for market-trawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    pub output: OutputConfig,
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryConfig>,
}

impl Config {
    /// Looks up a category by name
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of page fetches in flight at once
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Identity used to detect duplicate records
    #[serde(rename = "dedup-key", default)]
    pub dedup_key: DedupKey,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout_secs: default_request_timeout_secs(),
            dedup_key: DedupKey::default(),
        }
    }
}

/// Outbound publish configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    /// Value of the `x-api-key` header. Usually supplied on the command line
    /// or through the environment instead of the file.
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Records per publish request
    #[serde(rename = "chunk-size", default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chunk_size: default_chunk_size(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-category JSON files are written to
    pub directory: String,
}

/// One crawl category (vehicles, microphones, mobiles, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,

    /// File name of the JSON array written at the end of the run
    #[serde(rename = "output-file")]
    pub output_file: String,

    /// Publish API endpoint for this category
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(rename = "site", default)]
    pub sites: Vec<SiteConfig>,
}

/// A source site crawled for a category
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub adapter: AdapterKind,

    /// Listing pages each pagination chain starts from
    pub seeds: Vec<String>,

    /// Maximum number of next-page links followed for this site
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_user_agent() -> String {
    format!("market-trawler/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_concurrent_requests() -> u32 {
    16
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_pages() -> u32 {
    20
}
