//! Configuration module for Catalog-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Brands per batch: {}", config.crawler.brands_per_batch);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, RetryConfig, SelectorConfig, SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub(crate) use validation::parse_selector;

use crate::ConfigError;
use url::Url;

impl Config {
    /// Absolute URL of the page listing every brand
    pub fn catalog_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.source.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        base.join(&self.source.catalog_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid catalog-path: {}", e)))
    }
}
