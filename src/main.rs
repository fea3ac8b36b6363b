//! Catalog-Sweep main entry point
//!
//! This is the command-line interface for the Catalog-Sweep crawler.

use anyhow::Context;
use catalog_sweep::config::{load_config_with_hash, Config};
use catalog_sweep::crawler::Orchestrator;
use catalog_sweep::output::{load_statistics, print_run_summary, print_statistics};
use catalog_sweep::storage::open_store;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Sweep: a resumable brand/device catalog crawler
///
/// Catalog-Sweep walks a brand catalog, follows each brand's paginated device
/// listing, fetches every device detail page, and commits results in
/// write-once batch files. Rerunning with the same configuration skips
/// brands that are already committed.
#[derive(Parser, Debug)]
#[command(name = "catalog-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A resumable brand/device catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover brands and show the batch plan without crawling devices
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from existing checkpoints and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config).await
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_sweep=info,warn"),
            1 => EnvFilter::new("catalog_sweep=debug,info"),
            2 => EnvFilter::new("catalog_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the batches a run would execute
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Sweep Dry Run ===\n");

    println!("Source:");
    println!("  Catalog: {}", config.catalog_url()?);
    println!("  Request timeout: {}ms", config.source.request_timeout_ms);

    println!("\nWorkers:");
    println!("  Brand workers: {}", config.crawler.brand_workers);
    println!("  Device workers per brand: {}", config.crawler.device_workers);
    println!("  Brands per batch: {}", config.crawler.brands_per_batch);
    println!("  Concurrent batches: {}", config.crawler.concurrent_batches);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Base delay: {}ms", config.retry.base_delay_ms);
    println!("  Identities: {}", config.retry.user_agents.len());

    println!("\nCheckpoints: {}", config.output.checkpoint_dir);

    let plan = Orchestrator::new(config)?
        .plan()
        .await
        .context("brand discovery failed")?;

    let total: usize = plan.iter().map(|b| b.brands.len()).sum();
    println!("\nPlanned Batches ({}):", plan.len());
    for batch in &plan {
        println!(
            "  - {}{}: {}",
            config.output.file_prefix,
            batch.id,
            batch.brand_names().collect::<Vec<_>>().join(", ")
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} brand(s)", total);

    Ok(())
}

/// Handles the --stats mode: shows statistics from existing checkpoints
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Checkpoints: {}\n", config.output.checkpoint_dir);

    let store = open_store(&config.output)?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl (committed brands are skipped)");

    let orchestrator = Orchestrator::new(config)?;
    match orchestrator.run().await {
        Ok(summary) => {
            tracing::info!("Crawl completed");
            print_run_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
