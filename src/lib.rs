//! Catalog-Sweep: a resumable brand/device catalog crawler
//!
//! This crate walks a hierarchically paginated catalog (brand list → device
//! listings → device detail pages) and commits the results in durable,
//! append-only batches so that an interrupted run picks up where it left off.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Catalog-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Brand catalog unavailable: {0}")]
    Discovery(#[source] FetchFailed),

    #[error("Device listing for brand '{brand}' unavailable: {source}")]
    Listing { brand: String, source: FetchFailed },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// A single failed network attempt
///
/// Every variant is considered transient and is retried by the
/// [`RetryExecutor`](crawler::RetryExecutor).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

/// Returned once every retry attempt for a URL has failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Fetch failed for {url} after {attempts} attempt(s): {last_error}")]
pub struct FetchFailed {
    pub url: String,
    pub attempts: u32,
    pub last_error: FetchError,
}

/// Result type alias for Catalog-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Orchestrator};
pub use state::{Batch, Brand, DeviceRecord, DeviceReference, DeviceStatus, ProcessedSet};
