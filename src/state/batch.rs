use crate::state::DeviceRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A group of fully processed brands committed as one checkpoint
///
/// Batches are written once and never modified afterwards. Records within a
/// brand are kept sorted by model so that the same results always produce
/// the same file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: u64,

    /// When the last brand task of the batch finished
    pub completed_at: DateTime<Utc>,

    pub brands: BTreeMap<String, Vec<DeviceRecord>>,
}

impl Batch {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            completed_at: Utc::now(),
            brands: BTreeMap::new(),
        }
    }

    /// Adds one brand's records, ordering them by model
    pub fn insert_brand(&mut self, brand: impl Into<String>, mut records: Vec<DeviceRecord>) {
        records.sort_by(|a, b| a.model.cmp(&b.model));
        self.brands.insert(brand.into(), records);
    }

    pub fn brand_names(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    pub fn device_count(&self) -> usize {
        self.brands.values().map(Vec::len).sum()
    }

    pub fn error_count(&self) -> usize {
        self.brands
            .values()
            .flatten()
            .filter(|record| record.is_error())
            .count()
    }
}
