use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RetryConfig, SelectorConfig, SourceConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the catalog location
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    base.join(&config.catalog_path).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid catalog-path '{}': {}",
            config.catalog_path, e
        ))
    })?;

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker pool sizing
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    check_range("brand-workers", config.brand_workers, 1, 32)?;
    check_range("device-workers", config.device_workers, 1, 64)?;
    check_range("concurrent-batches", config.concurrent_batches, 1, 16)?;

    if config.brands_per_batch < 1 {
        return Err(ConfigError::Validation(format!(
            "brands-per-batch must be >= 1, got {}",
            config.brands_per_batch
        )));
    }

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-listing-pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    Ok(())
}

fn check_range(name: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

/// Validates retry policy settings
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one entry".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agents cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.brand_links,
        &config.device_links,
        &config.next_page,
        &config.device_title,
    ] {
        parse_selector(selector)?;
    }
    Ok(())
}

/// Parses a CSS selector, mapping failures into a [`ConfigError`]
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.checkpoint_dir.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint-dir cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file-prefix cannot be empty".to_string(),
        ));
    }

    if config
        .file_prefix
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "file-prefix '{}' cannot contain path separators or dots",
            config.file_prefix
        )));
    }

    Ok(())
}
