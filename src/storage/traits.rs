//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::state::Batch;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Batch not found: {0}")]
    BatchNotFound(u64),

    #[error("Batch {0} already committed")]
    AlreadyCommitted(u64),

    #[error("No batch id left after {0}")]
    IdsExhausted(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checkpoint directory unusable ({path}): {message}")]
    Directory { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// A checkpoint is one committed [`Batch`], addressed by its id. Writes must
/// be all-or-nothing: a batch is either fully readable or absent, never
/// half-written. Implementations hold no mutable state beyond what is on
/// disk, so they can be shared freely between tasks.
pub trait CheckpointStore: Send + Sync {
    /// Lists the ids of every committed batch in ascending order
    fn list_existing(&self) -> StorageResult<Vec<u64>>;

    /// Reads a committed batch
    fn read(&self, id: u64) -> StorageResult<Batch>;

    /// Commits a batch
    ///
    /// Fails with [`StorageError::AlreadyCommitted`] if a batch with the same
    /// id exists; batches are never overwritten.
    fn write(&self, batch: &Batch) -> StorageResult<()>;
}
