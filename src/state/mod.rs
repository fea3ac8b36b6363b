//! State module for the catalog data model
//!
//! This module holds the values that flow through a crawl and end up in
//! checkpoints.
//!
//! # Components
//!
//! - `Brand` / `DeviceReference`: what discovery and pagination produce
//! - `DeviceRecord` / `DeviceStatus`: the terminal result of one device fetch
//! - `Batch`: a group of fully processed brands committed together
//! - `ProcessedSet`: brand names already committed by some batch

mod batch;
mod catalog;
mod device_record;
mod processed;

// Re-export main types
pub use batch::Batch;
pub use catalog::{Brand, DeviceReference};
pub use device_record::{DeviceRecord, DeviceStatus};
pub use processed::ProcessedSet;
