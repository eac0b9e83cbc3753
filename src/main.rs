//! Shelfscan main entry point
//!
//! This is the command-line interface for the Shelfscan catalogue crawler.

use anyhow::Context;
use clap::Parser;
use shelfscan::config::{load_config_with_hash, prepare_config, Config};
use shelfscan::crawler::run_crawl;
use shelfscan::output::ensure_parent_dir;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Shelfscan: a polite catalogue crawler
///
/// Shelfscan walks a paginated product catalogue, visits every product's
/// detail page and writes title, price and stock quantity to CSV. It
/// respects robots.txt, paces its requests and retries transient failures.
#[derive(Parser, Debug)]
#[command(name = "shelfscan")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalogue crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (
            prepare_config(Config::default()).context("built-in configuration is invalid")?,
            None,
        ),
    };

    setup_logging(cli.verbose, cli.quiet, Path::new(&config.output.log_path))?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            path = %path.display(),
            hash = %hash,
            "Configuration loaded"
        ),
        _ => tracing::info!("Using built-in configuration"),
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up console and file logging based on verbosity level
///
/// The log file's directory is created if needed; failing to create or open
/// it is a setup error.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfscan=info,warn"),
            1 => EnvFilter::new("shelfscan=debug,info"),
            _ => EnvFilter::new("shelfscan=trace,debug"),
        }
    };

    ensure_parent_dir(log_path).context("cannot create log directory")?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install logger")?;

    Ok(())
}

/// Handles the --dry-run mode: shows the resolved configuration and page plan
fn handle_dry_run(config: &Config) {
    println!("=== Shelfscan Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  robots.txt: {}", config.site.robots_url());
    println!(
        "  Pages: {} to {}",
        config.site.first_page, config.site.last_page
    );

    println!("\nFetching:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!(
        "  Pacing delay: {}-{}ms",
        config.fetch.min_delay_ms, config.fetch.max_delay_ms
    );
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Retry back-off: {}ms", config.fetch.retry_backoff_ms);
    println!("  Detail delay: {}ms", config.fetch.detail_delay_ms);

    println!("\nHeaders:");
    println!("  Accept-Language: {}", config.headers.accept_language);
    println!(
        "  User agents: {} (fallback: {})",
        config.headers.user_agents.len(),
        config.headers.fallback_user_agent
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!("  Log: {}", config.output.log_path);

    println!("\nCatalogue pages:");
    for url in config.site.catalogue_urls() {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    match run_crawl(config).await {
        Ok(outcome) => {
            tracing::info!(records = outcome.records.len(), "Crawl finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
