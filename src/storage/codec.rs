//! Batch serialization
//!
//! The codec is a plain value with no interior state; the store owns a copy
//! and any number of tasks may encode through it concurrently.

use crate::state::Batch;
use crate::storage::StorageResult;

/// JSON encoding for checkpoint files
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Indented output, readable by hand
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    #[cfg(test)]
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn encode(&self, batch: &Batch) -> StorageResult<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(batch)?
        } else {
            serde_json::to_string(batch)?
        };
        Ok(encoded)
    }

    pub fn decode(&self, content: &str) -> StorageResult<Batch> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::pretty()
    }
}
