use serde::Deserialize;

/// Main configuration structure for Catalog-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Where the catalog lives and how each request is issued
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Scheme and host of the catalog site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the page listing every brand, relative to `base-url`
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,

    /// Timeout for a single request attempt (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Value sent in the Accept-Language header
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Worker pool sizing and batching
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of brands processed at once across the run
    #[serde(rename = "brand-workers", default = "default_brand_workers")]
    pub brand_workers: usize,

    /// Maximum number of device detail fetches in flight per brand
    #[serde(rename = "device-workers", default = "default_device_workers")]
    pub device_workers: usize,

    /// Number of brands committed together in one checkpoint
    #[serde(rename = "brands-per-batch", default = "default_brands_per_batch")]
    pub brands_per_batch: usize,

    /// Ceiling on listing pages followed for a single brand
    #[serde(rename = "max-listing-pages", default = "default_max_listing_pages")]
    pub max_listing_pages: usize,

    /// Number of batches allowed to run at the same time
    #[serde(rename = "concurrent-batches", default = "default_concurrent_batches")]
    pub concurrent_batches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            brand_workers: default_brand_workers(),
            device_workers: default_device_workers(),
            brands_per_batch: default_brands_per_batch(),
            max_listing_pages: default_max_listing_pages(),
            concurrent_batches: default_concurrent_batches(),
        }
    }
}

/// Retry behaviour shared by every fetch site
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff unit (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// User agents rotated across attempts
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            user_agents: default_user_agents(),
        }
    }
}

/// CSS selectors describing the catalog's page layout
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(rename = "brand-links", default = "default_brand_links")]
    pub brand_links: String,

    #[serde(rename = "device-links", default = "default_device_links")]
    pub device_links: String,

    /// Pagination controls; the last match is the "next" pointer
    #[serde(rename = "next-page", default = "default_next_page")]
    pub next_page: String,

    #[serde(rename = "device-title", default = "default_device_title")]
    pub device_title: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            brand_links: default_brand_links(),
            device_links: default_device_links(),
            next_page: default_next_page(),
            device_title: default_device_title(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one file per committed batch
    #[serde(rename = "checkpoint-dir")]
    pub checkpoint_dir: String,

    /// File name prefix for batch files
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_accept_language() -> String {
    "*".to_string()
}

fn default_brand_workers() -> usize {
    2
}

fn default_device_workers() -> usize {
    4
}

fn default_brands_per_batch() -> usize {
    5
}

fn default_max_listing_pages() -> usize {
    500
}

fn default_concurrent_batches() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15".to_string(),
        "Mozilla/5.0 (Linux; Android 13; SM-A536B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36".to_string(),
    ]
}

fn default_brand_links() -> String {
    ".manufacturer-group ul li a".to_string()
}

fn default_device_links() -> String {
    "#vendor-browser-container div p a".to_string()
}

fn default_next_page() -> String {
    ".nav-pages a".to_string()
}

fn default_device_title() -> String {
    "#product-data .device-title".to_string()
}

fn default_file_prefix() -> String {
    "BrandsList_".to_string()
}
