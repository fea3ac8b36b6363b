//! End-of-run summary

use serde::Serialize;

/// What a crawl run achieved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Brands already committed before this run started
    pub previously_committed: usize,

    /// Brands discovered and scheduled by this run
    pub scheduled_brands: usize,

    /// Ids of batches written by this run, ascending
    pub committed_batches: Vec<u64>,

    /// Brands committed by this run
    pub committed_brands: usize,

    /// Ids of batches whose write failed or that had nothing to write
    pub failed_batches: Vec<u64>,

    /// Device records committed by this run
    pub device_records: usize,

    /// Committed device records carrying an error status
    pub device_errors: usize,

    /// Scheduled brands that were not committed, sorted
    pub unprocessed: Vec<String>,
}

impl RunSummary {
    /// True when every scheduled brand was committed
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty() && self.failed_batches.is_empty()
    }
}

/// Prints a run summary to stdout
pub fn print_run_summary(summary: &RunSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Brands:");
    println!("  Previously committed: {}", summary.previously_committed);
    println!("  Scheduled this run: {}", summary.scheduled_brands);
    println!("  Committed this run: {}", summary.committed_brands);
    println!();

    println!("Batches:");
    println!("  Written: {}", format_ids(&summary.committed_batches));
    if !summary.failed_batches.is_empty() {
        println!("  Not written: {}", format_ids(&summary.failed_batches));
    }
    println!();

    println!("Devices:");
    println!("  Records: {}", summary.device_records);
    println!("  Errors: {}", summary.device_errors);
    println!();

    if summary.unprocessed.is_empty() {
        println!("All scheduled brands committed.");
    } else {
        println!(
            "Unprocessed brands ({}), retried on the next run:",
            summary.unprocessed.len()
        );
        for brand in &summary.unprocessed {
            println!("  - {}", brand);
        }
    }
}

fn format_ids(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
