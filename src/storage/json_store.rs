//! File-per-batch checkpoint store
//!
//! Each batch lives in `<dir>/<prefix><id>.json`. Files are written to a
//! temporary sibling, synced, then renamed into place, so a crash never leaves
//! a partially written batch under a checkpoint name.

use crate::state::Batch;
use crate::storage::codec::JsonCodec;
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON file checkpoint backend
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    dir: PathBuf,
    prefix: String,
    codec: JsonCodec,
}

impl JsonCheckpointStore {
    /// Opens a store rooted at `dir`, creating the directory if missing
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding batch files
    /// * `prefix` - File name prefix placed before the batch id
    /// * `codec` - Encoding used for batch contents
    pub fn open(dir: impl Into<PathBuf>, prefix: &str, codec: JsonCodec) -> StorageResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            codec,
        })
    }

    /// Path of the file a batch with this id is committed to
    pub fn batch_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, id))
    }

    /// Id encoded in a batch file name; only the exact form `batch_path`
    /// produces is accepted
    fn parse_id(&self, file_name: &str) -> Option<u64> {
        let digits = file_name.strip_prefix(&self.prefix)?.strip_suffix(".json")?;
        let id: u64 = digits.parse().ok()?;
        (id.to_string() == digits).then_some(id)
    }
}

fn ensure_dir(dir: &Path) -> StorageResult<()> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StorageError::Directory {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(StorageError::Directory {
                path: dir.to_path_buf(),
                message: "path is not a directory".to_string(),
            });
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StorageError::Directory {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

/// Flushes directory entries so a completed rename survives power loss
#[cfg(unix)]
fn sync_dir(dir: &Path) -> StorageResult<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> StorageResult<()> {
    Ok(())
}

impl CheckpointStore for JsonCheckpointStore {
    fn list_existing(&self) -> StorageResult<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Temp files from an interrupted write never match the prefix
            if let Some(id) = entry.file_name().to_str().and_then(|n| self.parse_id(n)) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn read(&self, id: u64) -> StorageResult<Batch> {
        let path = self.batch_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::BatchNotFound(id))
            }
            Err(e) => return Err(e.into()),
        };
        self.codec.decode(&content)
    }

    fn write(&self, batch: &Batch) -> StorageResult<()> {
        let target = self.batch_path(batch.id);
        if target.exists() {
            return Err(StorageError::AlreadyCommitted(batch.id));
        }

        let encoded = self.codec.encode(batch)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist_noclobber(&target).map_err(|e| {
            if e.error.kind() == ErrorKind::AlreadyExists {
                StorageError::AlreadyCommitted(batch.id)
            } else {
                StorageError::Io(e.error)
            }
        })?;

        sync_dir(&self.dir)?;

        tracing::debug!("Committed batch {} to {}", batch.id, target.display());
        Ok(())
    }
}
