//! Statistics over committed checkpoints
//!
//! This module provides functionality for summarizing what the checkpoint
//! directory already holds, without touching the network.

use crate::storage::{CheckpointStore, StorageResult};
use chrono::{DateTime, Utc};

/// Totals across every readable batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointStatistics {
    /// Number of batch files found
    pub batches: usize,

    /// Batches that exist but could not be read
    pub unreadable_batches: Vec<u64>,

    /// Distinct brands committed
    pub brands: usize,

    /// Device records across all batches
    pub devices: usize,

    /// Device records carrying an error status
    pub device_errors: usize,

    /// Most recent batch completion time
    pub last_completed_at: Option<DateTime<Utc>>,

    /// Highest batch id on disk
    pub last_batch_id: Option<u64>,
}

/// Loads statistics from the checkpoint store
///
/// # Arguments
///
/// * `store` - The checkpoint store to summarize
///
/// # Returns
///
/// * `Ok(CheckpointStatistics)` - Totals over every readable batch
/// * `Err(StorageError)` - The batch listing itself failed
pub fn load_statistics(store: &dyn CheckpointStore) -> StorageResult<CheckpointStatistics> {
    let ids = store.list_existing()?;
    let mut stats = CheckpointStatistics {
        batches: ids.len(),
        last_batch_id: ids.last().copied(),
        ..Default::default()
    };
    let mut brands = std::collections::HashSet::new();

    for id in ids {
        let batch = match store.read(id) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!("Batch {} unreadable: {}", id, e);
                stats.unreadable_batches.push(id);
                continue;
            }
        };

        brands.extend(batch.brand_names().map(str::to_string));
        stats.devices += batch.device_count();
        stats.device_errors += batch.error_count();
        stats.last_completed_at = stats.last_completed_at.max(Some(batch.completed_at));
    }

    stats.brands = brands.len();
    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CheckpointStatistics) {
    println!("=== Checkpoint Statistics ===\n");

    println!("Overview:");
    println!("  Batches: {}", stats.batches);
    if let Some(id) = stats.last_batch_id {
        println!("  Last batch id: {}", id);
    }
    if let Some(at) = stats.last_completed_at {
        println!("  Last completed: {}", at.to_rfc3339());
    }
    println!("  Brands committed: {}", stats.brands);
    println!("  Device records: {}", stats.devices);
    println!();

    let error_rate = if stats.devices > 0 {
        (stats.device_errors as f64 / stats.devices as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Device Errors: {} ({:.1}% of records)",
        stats.device_errors, error_rate
    );

    if !stats.unreadable_batches.is_empty() {
        println!();
        println!("Unreadable Batches ({}):", stats.unreadable_batches.len());
        for id in &stats.unreadable_batches {
            println!("  - {}", id);
        }
    }
}
