//! Batch scheduling for brand work
//!
//! This module handles:
//! - Partitioning discovered brands into fixed-size batches
//! - Allocating batch ids that continue after existing checkpoints
//! - Bounding how many batches run at once

use crate::state::Brand;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A group of brands committed together under one checkpoint id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledBatch {
    /// Checkpoint id this batch will be written under
    pub id: u64,

    /// Brands crawled as part of this batch, in discovery order
    pub brands: Vec<Brand>,
}

impl ScheduledBatch {
    pub fn brand_names(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(|b| b.name.as_str())
    }
}

/// Splits `brands` into batches of at most `batch_size`
///
/// Ids are assigned consecutively starting at `first_id`. The last batch may
/// be shorter than `batch_size`.
///
/// # Arguments
///
/// * `brands` - Unprocessed brands in discovery order
/// * `batch_size` - Maximum brands per batch; zero is treated as one
/// * `first_id` - Id of the first batch
pub fn partition_batches(brands: Vec<Brand>, batch_size: usize, first_id: u64) -> Vec<ScheduledBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(brands.len().div_ceil(batch_size));
    let mut remaining = brands.into_iter().peekable();
    let mut id = first_id;

    while remaining.peek().is_some() {
        let chunk: Vec<Brand> = remaining.by_ref().take(batch_size).collect();
        batches.push(ScheduledBatch { id, brands: chunk });
        id += 1;
    }

    batches
}

/// Gates how many batches are in flight
///
/// With the default of one slot, batch N+1 starts only after batch N has
/// finished its checkpoint.
#[derive(Debug, Clone)]
pub struct Scheduler {
    batch_slots: Arc<Semaphore>,
    brand_slots: Arc<Semaphore>,
}

impl Scheduler {
    /// # Arguments
    ///
    /// * `concurrent_batches` - Batches allowed to run at once
    /// * `brand_workers` - Brands crawled at once across the whole run
    pub fn new(concurrent_batches: usize, brand_workers: usize) -> Self {
        Self {
            batch_slots: Arc::new(Semaphore::new(concurrent_batches.max(1))),
            brand_slots: Arc::new(Semaphore::new(brand_workers.max(1))),
        }
    }

    /// Waits for a free batch slot
    ///
    /// Returns `None` only if the scheduler has been closed.
    pub async fn admit_batch(&self) -> Option<OwnedSemaphorePermit> {
        self.batch_slots.clone().acquire_owned().await.ok()
    }

    /// Waits for a free brand worker
    pub async fn admit_brand(&self) -> Option<OwnedSemaphorePermit> {
        self.brand_slots.clone().acquire_owned().await.ok()
    }
}
