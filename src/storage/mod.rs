//! Storage module for persisting committed batches
//!
//! This module handles checkpoint persistence for the crawler, including:
//! - Atomic, write-once batch files
//! - Recovery of the processed-brand set on start-up
//! - Batch id allocation for resumed runs

mod codec;
mod json_store;
mod traits;

pub use codec::JsonCodec;
pub use json_store::JsonCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use crate::config::OutputConfig;
use crate::state::ProcessedSet;

/// Opens the checkpoint store described by the output configuration
pub fn open_store(config: &OutputConfig) -> StorageResult<JsonCheckpointStore> {
    JsonCheckpointStore::open(
        &config.checkpoint_dir,
        &config.file_prefix,
        JsonCodec::pretty(),
    )
}

/// Rebuilds the set of committed brands from every readable batch
///
/// A batch that cannot be read is skipped with a warning; its brands will be
/// crawled again, which is safe because commitment only happens through a
/// successful write.
pub fn load_processed_set(store: &dyn CheckpointStore) -> StorageResult<ProcessedSet> {
    let mut processed = ProcessedSet::new();
    for id in store.list_existing()? {
        match store.read(id) {
            Ok(batch) => processed.extend(batch.brand_names()),
            Err(e) => tracing::warn!("Skipping unreadable batch {}: {}", id, e),
        }
    }
    Ok(processed)
}

/// Returns the id the next written batch should use
pub fn next_batch_id(store: &dyn CheckpointStore) -> StorageResult<u64> {
    match store.list_existing()?.last() {
        None => Ok(1),
        Some(&last) => last.checked_add(1).ok_or(StorageError::IdsExhausted(last)),
    }
}
