//! Output module for reporting crawl results
//!
//! This module handles:
//! - The end-of-run summary returned by the orchestrator
//! - Statistics over checkpoints already on disk

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, CheckpointStatistics};
pub use summary::{print_run_summary, RunSummary};
