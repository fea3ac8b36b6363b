//! Crawler module for catalog traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - Retry with linear backoff and identity rotation
//! - HTML extraction of brands, devices, pagination and titles
//! - Brand discovery, listing pagination and device detail pools
//! - Batch scheduling and overall run orchestration

mod coordinator;
mod devices;
mod discovery;
mod enumerator;
mod fetcher;
mod parser;
mod retry;
mod scheduler;

#[cfg(test)]
mod test_support;

pub use coordinator::{run_crawl, Orchestrator};
pub use devices::{DeviceDetailFetcher, DeviceWorkerPool};
pub use discovery::BrandDiscoverer;
pub use enumerator::DeviceEnumerator;
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, RawDocument};
pub use parser::{Extractor, HtmlExtractor, UNKNOWN_TITLE};
pub use retry::{RetryExecutor, RetryPolicy};
pub use scheduler::{partition_batches, ScheduledBatch, Scheduler};
