//! Wanted-Harvest main entry point
//!
//! This is the command-line interface for the listing harvester.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wanted_harvest::config::{load_config_with_hash, validate, Config};
use wanted_harvest::crawler::harvest;
use wanted_harvest::output::print_statistics;

/// Wanted-Harvest: listing harvester and record extractor
///
/// Walks a paginated listing, extracts a fixed set of fields from every
/// detail page, caches fetched pages and images on disk, and writes the
/// records to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "wanted-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Harvest a paginated listing into CSV", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Basic data search URL (first listing page)
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Name of output resulting CSV file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Directory for storing the page and image cache ("" disables caching)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore the cached URL list and harvest the listing again
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.fresh, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wanted_harvest=info,warn"),
            1 => EnvFilter::new("wanted_harvest=debug,info"),
            2 => EnvFilter::new("wanted_harvest=trace,debug"),
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

/// Builds the configuration: file (if any), then command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.source.start_url = start_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.output_path = output.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache.cache_dir = cache_dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Wanted-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Start URL: {}", config.source.start_url);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.output_path);
    match &config.output.columns {
        Some(columns) => println!("  Columns: {}", columns.join(", ")),
        None => println!("  Columns: default"),
    }

    println!("\nCache:");
    if config.cache.cache_dir.is_empty() {
        println!("  Disabled");
    } else {
        println!("  Directory: {}", config.cache.cache_dir);
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    match config.http.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Accept error status: {}", config.http.accept_error_status);

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    fresh: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting harvest from {}", config.source.start_url);

    match harvest(config, fresh).await {
        Ok(stats) => {
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
