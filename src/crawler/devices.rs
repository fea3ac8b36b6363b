//! Device detail fetching
//!
//! This module resolves device references into records:
//! - `DeviceDetailFetcher` turns one reference into one record and absorbs
//!   every failure into the record's status
//! - `DeviceWorkerPool` fans a brand's references out over a bounded number
//!   of concurrent fetches

use crate::crawler::parser::Extractor;
use crate::crawler::retry::RetryExecutor;
use crate::state::{DeviceRecord, DeviceReference};
use futures::stream::{self, StreamExt};

/// Resolves one device reference; never fails outward
pub struct DeviceDetailFetcher<'a> {
    executor: &'a RetryExecutor,
    extractor: &'a dyn Extractor,
}

impl<'a> DeviceDetailFetcher<'a> {
    pub fn new(executor: &'a RetryExecutor, extractor: &'a dyn Extractor) -> Self {
        Self {
            executor,
            extractor,
        }
    }

    pub async fn fetch(&self, reference: &DeviceReference) -> DeviceRecord {
        match self.executor.execute(&reference.detail_url).await {
            Ok(doc) => {
                let title = self.extractor.device_title(&doc);
                DeviceRecord::ok(&reference.model, title)
            }
            Err(failure) => {
                tracing::warn!(
                    "Device {} of {} recorded as error: {}",
                    reference.model,
                    reference.brand.name,
                    failure
                );
                DeviceRecord::error(&reference.model, failure.to_string())
            }
        }
    }
}

/// Bounded fan-out of [`DeviceDetailFetcher`] over one brand's devices
///
/// The pool lives only for the duration of [`run`](Self::run); each brand
/// gets a fresh one.
pub struct DeviceWorkerPool<'a> {
    fetcher: DeviceDetailFetcher<'a>,
    workers: usize,
}

impl<'a> DeviceWorkerPool<'a> {
    /// # Arguments
    ///
    /// * `fetcher` - Resolves individual references
    /// * `workers` - Maximum detail fetches in flight
    pub fn new(fetcher: DeviceDetailFetcher<'a>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// Fetches every reference, returning one record per reference in
    /// completion order
    pub async fn run(&self, references: Vec<DeviceReference>) -> Vec<DeviceRecord> {
        let fetcher = &self.fetcher;
        stream::iter(references)
            .map(|reference| async move { fetcher.fetch(&reference).await })
            .buffer_unordered(self.workers)
            .collect()
            .await
    }
}
