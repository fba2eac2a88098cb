//! Pagemill main entry point
//!
//! Command-line interface for the category-page harvesting pipeline:
//! `serve` starts the HTTP API, `bench` compares the three concurrency
//! strategies over a URL list, and the hidden `worker` subcommand is the
//! child half of the process-pool strategy.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagemill::config::load_config_with_hash;
use pagemill::storage::{CategoryStore, StorePool};
use pagemill::strategy::{run_worker, WorkerOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pagemill: a category-page harvesting pipeline
///
/// Pagemill fetches category pages, extracts a name/description pair from
/// each, and stores the results in a deduplicating SQLite database, using
/// one of three interchangeable concurrency strategies.
#[derive(Parser, Debug)]
#[command(name = "pagemill")]
#[command(version = "1.0.0")]
#[command(about = "Category-page harvesting pipeline", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Run all three strategies over a URL list and print timings
    Bench {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// File with one URL per line
        #[arg(value_name = "URLS")]
        urls: PathBuf,
    },

    /// Process a URL chunk in a child process (internal)
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        database: PathBuf,

        #[arg(long, default_value_t = 15)]
        timeout_secs: u64,

        #[arg(long, default_value_t = 10)]
        connect_timeout_secs: u64,

        #[arg(long, default_value = "pagemill/1.0")]
        user_agent: String,

        #[arg(long, default_value = "h2.okved_h2_title")]
        name_selector: String,

        #[arg(long, default_value = "div.okved_desc")]
        description_selector: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Serve { config } => handle_serve(&config).await,
        Commands::Bench { config, urls } => handle_bench(&config, &urls).await,
        Commands::Worker {
            database,
            timeout_secs,
            connect_timeout_secs,
            user_agent,
            name_selector,
            description_selector,
        } => {
            let options = WorkerOptions {
                database,
                timeout_secs,
                connect_timeout_secs,
                user_agent,
                name_selector,
                description_selector,
            };
            // The parent reads this process's stderr as the failure detail,
            // so report the error plainly and exit non-zero.
            if let Err(e) = run_worker(options).await {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagemill=info,warn"),
            1 => EnvFilter::new("pagemill=debug,info"),
            2 => EnvFilter::new("pagemill=trace,debug"),
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

/// Handles the serve mode: loads config and runs the API server
async fn handle_serve(config_path: &Path) -> anyhow::Result<()> {
    let (config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        config_path.display(),
        config_hash
    );

    pagemill::server::serve(config).await?;
    Ok(())
}

/// Handles the bench mode: runs all three strategies and prints the table
async fn handle_bench(config_path: &Path, urls_path: &Path) -> anyhow::Result<()> {
    let (config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        config_path.display(),
        config_hash
    );

    let urls = read_url_list(urls_path)
        .with_context(|| format!("reading URL list from {}", urls_path.display()))?;
    tracing::info!("Benchmarking {} URLs", urls.len());

    let db_path = Path::new(&config.database.path);
    // Surface schema or path problems before any strategy starts.
    CategoryStore::open(db_path)?;
    let pool = StorePool::new(db_path, config.pipeline.store_pool_size as usize);

    let results =
        pagemill::bench::run_benchmark(std::sync::Arc::new(config), pool, urls).await?;
    pagemill::bench::print_report(&results);

    Ok(())
}

/// Reads a URL list file: one URL per line, blank lines skipped
fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
