//! Crawl orchestration
//!
//! This module contains the top-level run that ties every stage together:
//! - Recovering the processed-brand set from checkpoints
//! - Discovering and partitioning unprocessed brands into batches
//! - Running brand tasks under the run-wide worker limit
//! - Committing each batch atomically once all of its brands have finished

use crate::config::{Config, CrawlerConfig};
use crate::crawler::devices::{DeviceDetailFetcher, DeviceWorkerPool};
use crate::crawler::discovery::BrandDiscoverer;
use crate::crawler::enumerator::DeviceEnumerator;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{Extractor, HtmlExtractor};
use crate::crawler::retry::{RetryExecutor, RetryPolicy};
use crate::crawler::scheduler::{partition_batches, ScheduledBatch, Scheduler};
use crate::output::RunSummary;
use crate::state::{Batch, Brand, DeviceRecord, ProcessedSet};
use crate::storage::{load_processed_set, next_batch_id, open_store, CheckpointStore, StorageError};
use crate::SweepError;
use chrono::Utc;
use futures::FutureExt;
use std::collections::BTreeSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinSet;

/// Everything a brand task needs, shared across all tasks of a run
struct CrawlContext {
    executor: RetryExecutor,
    extractor: Arc<dyn Extractor>,
    device_workers: usize,
    max_pages: usize,
}

impl CrawlContext {
    /// Enumerates a brand's devices and fetches every detail page
    async fn crawl_brand(&self, brand: &Brand) -> Result<Vec<DeviceRecord>, SweepError> {
        let extractor = self.extractor.as_ref();
        let references = DeviceEnumerator::new(&self.executor, extractor, self.max_pages)
            .enumerate(brand)
            .await?;

        tracing::debug!("{}: {} device(s) to fetch", brand.name, references.len());

        let pool = DeviceWorkerPool::new(
            DeviceDetailFetcher::new(&self.executor, extractor),
            self.device_workers,
        );
        Ok(pool.run(references).await)
    }
}

/// How a single batch ended
#[derive(Debug)]
enum BatchOutcome {
    Committed(Batch),
    Empty { id: u64 },
    WriteFailed { id: u64, error: StorageError },
    Aborted { id: u64 },
}

/// Drives a full crawl run
pub struct Orchestrator {
    context: Arc<CrawlContext>,
    store: Arc<dyn CheckpointStore>,
    catalog_url: String,
    crawler: CrawlerConfig,
}

impl Orchestrator {
    /// Builds an orchestrator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - HTTP client, selectors and checkpoint directory are ready
    /// * `Err(SweepError)` - One of them could not be set up
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        let catalog_url = config.catalog_url()?;
        let fetcher = HttpFetcher::from_config(&config.source)?;
        let extractor = HtmlExtractor::new(&config.selectors)?;
        let store = open_store(&config.output)?;

        Ok(Self::with_parts(
            Arc::new(fetcher),
            Arc::new(extractor),
            Arc::new(store),
            catalog_url.as_str(),
            config.crawler.clone(),
            RetryPolicy::from_config(&config.retry),
            Duration::from_millis(config.source.request_timeout_ms),
        ))
    }

    /// Assembles an orchestrator from already-built parts
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Transport for every request
    /// * `extractor` - Pulls links and titles out of fetched pages
    /// * `store` - Where batches are committed
    /// * `catalog_url` - Page listing every brand
    /// * `crawler` - Pool sizes, batch size and page ceiling
    /// * `policy` - Retry policy shared by all fetches
    /// * `timeout` - Per-attempt request timeout
    pub fn with_parts(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        store: Arc<dyn CheckpointStore>,
        catalog_url: impl Into<String>,
        crawler: CrawlerConfig,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        let context = CrawlContext {
            executor: RetryExecutor::new(fetcher, policy, timeout),
            extractor,
            device_workers: crawler.device_workers.max(1),
            max_pages: crawler.max_listing_pages,
        };

        Self {
            context: Arc::new(context),
            store,
            catalog_url: catalog_url.into(),
            crawler,
        }
    }

    /// Discovers unprocessed brands and returns the batches a run would
    /// execute, without crawling devices or writing anything
    pub async fn plan(&self) -> Result<Vec<ScheduledBatch>, SweepError> {
        let processed = load_processed_set(self.store.as_ref())?;
        self.schedule(&processed).await
    }

    async fn schedule(&self, processed: &ProcessedSet) -> Result<Vec<ScheduledBatch>, SweepError> {
        tracing::debug!("Discovering brands from {}", self.catalog_url);
        let discoverer = BrandDiscoverer::new(
            &self.context.executor,
            self.context.extractor.as_ref(),
            &self.catalog_url,
        );
        let brands = discoverer.discover(processed).await?;

        let first_id = next_batch_id(self.store.as_ref())?;
        Ok(partition_batches(
            brands,
            self.crawler.brands_per_batch,
            first_id,
        ))
    }

    /// Runs the crawl to completion
    ///
    /// Brand and device failures are absorbed and reported in the summary.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every scheduled batch has been attempted
    /// * `Err(SweepError)` - Checkpoints could not be read or the catalog was unreachable
    pub async fn run(&self) -> Result<RunSummary, SweepError> {
        let processed = load_processed_set(self.store.as_ref())?;
        let mut summary = RunSummary {
            previously_committed: processed.len(),
            ..Default::default()
        };
        tracing::info!("{} brand(s) already committed", processed.len());

        let batches = self.schedule(&processed).await?;
        let scheduled: BTreeSet<String> = batches
            .iter()
            .flat_map(|b| b.brand_names().map(str::to_string))
            .collect();
        summary.scheduled_brands = scheduled.len();

        if batches.is_empty() {
            tracing::info!("Nothing to crawl");
            return Ok(summary);
        }

        let brand_workers = self.crawler.brand_workers.max(1);
        tracing::info!(
            "Scheduled {} brand(s) in {} batch(es); up to {} brand(s) x {} device fetch(es) = {} concurrent request(s)",
            scheduled.len(),
            batches.len(),
            brand_workers,
            self.context.device_workers,
            brand_workers * self.context.device_workers
        );

        let processed = Arc::new(Mutex::new(processed));
        let scheduler = Scheduler::new(self.crawler.concurrent_batches, brand_workers);
        let mut running = JoinSet::new();

        for batch in batches {
            let Some(slot) = scheduler.admit_batch().await else {
                break;
            };
            tracing::debug!("Starting batch {} ({} brand(s))", batch.id, batch.brands.len());
            let id = batch.id;
            running.spawn(isolate_batch(
                id,
                run_batch(
                    self.context.clone(),
                    self.store.clone(),
                    processed.clone(),
                    scheduler.clone(),
                    batch,
                    slot,
                ),
            ));
        }

        while let Some(joined) = running.join_next().await {
            match joined {
                Ok(BatchOutcome::Committed(batch)) => {
                    summary.committed_batches.push(batch.id);
                    summary.committed_brands += batch.len();
                    summary.device_records += batch.device_count();
                    summary.device_errors += batch.error_count();
                }
                Ok(BatchOutcome::Empty { id }) => summary.failed_batches.push(id),
                Ok(BatchOutcome::WriteFailed { id, error }) => {
                    tracing::error!("Batch {} not committed: {}", id, error);
                    summary.failed_batches.push(id);
                }
                Ok(BatchOutcome::Aborted { id }) => {
                    tracing::error!("Batch {} aborted by a panic; not committed", id);
                    summary.failed_batches.push(id);
                }
                Err(e) => tracing::error!("Batch task cancelled: {}", e),
            }
        }

        summary.committed_batches.sort_unstable();
        summary.failed_batches.sort_unstable();

        let processed = processed.lock().unwrap_or_else(PoisonError::into_inner);
        summary.unprocessed = scheduled
            .into_iter()
            .filter(|name| !processed.contains(name))
            .collect();

        tracing::info!(
            "Run finished: {} batch(es) committed, {} brand(s) left unprocessed",
            summary.committed_batches.len(),
            summary.unprocessed.len()
        );

        Ok(summary)
    }
}

/// Runs a batch future, reporting a panic inside it as `Aborted` for `id`
async fn isolate_batch<F>(id: u64, batch: F) -> BatchOutcome
where
    F: Future<Output = BatchOutcome>,
{
    match AssertUnwindSafe(batch).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => BatchOutcome::Aborted { id },
    }
}

/// Crawls every brand of one batch, then commits the batch
async fn run_batch(
    context: Arc<CrawlContext>,
    store: Arc<dyn CheckpointStore>,
    processed: Arc<Mutex<ProcessedSet>>,
    scheduler: Scheduler,
    scheduled: ScheduledBatch,
    _slot: OwnedSemaphorePermit,
) -> BatchOutcome {
    let mut tasks = JoinSet::new();
    for brand in scheduled.brands {
        let context = context.clone();
        let scheduler = scheduler.clone();
        tasks.spawn(async move {
            let _worker = scheduler.admit_brand().await;
            let result = context.crawl_brand(&brand).await;
            (brand, result)
        });
    }

    let mut batch = Batch::new(scheduled.id);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((brand, Ok(records))) => {
                tracing::info!(
                    "Brand {} done: {} device(s), {} error(s)",
                    brand.name,
                    records.len(),
                    records.iter().filter(|r| r.is_error()).count()
                );
                batch.insert_brand(brand.name, records);
            }
            Ok((brand, Err(e))) => {
                tracing::warn!("Brand {} left unprocessed: {}", brand.name, e);
            }
            Err(e) => {
                tracing::error!("Brand task in batch {} panicked: {}", scheduled.id, e);
            }
        }
    }

    batch.completed_at = Utc::now();

    if batch.is_empty() {
        tracing::warn!("Batch {} has no successful brands; not writing it", scheduled.id);
        return BatchOutcome::Empty { id: scheduled.id };
    }

    let id = batch.id;
    let written = {
        let store = store.clone();
        tokio::task::spawn_blocking(move || store.write(&batch).map(|_| batch)).await
    };

    match written {
        Ok(Ok(batch)) => {
            processed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(batch.brand_names());
            tracing::info!(
                "Committed batch {}: {} brand(s), {} device record(s)",
                id,
                batch.len(),
                batch.device_count()
            );
            BatchOutcome::Committed(batch)
        }
        Ok(Err(error)) => BatchOutcome::WriteFailed { id, error },
        Err(e) => BatchOutcome::WriteFailed {
            id,
            error: StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)),
        },
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Crawl finished; see the summary for partial failures
/// * `Err(SweepError)` - Crawl could not start or the catalog was unreachable
pub async fn run_crawl(config: Config) -> Result<RunSummary, SweepError> {
    Orchestrator::new(&config)?.run().await
}
