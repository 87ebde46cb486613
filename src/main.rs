//! SiteSift main entry point
//!
//! This is the command-line interface for the SiteSift site indexer.

use anyhow::Context;
use clap::Parser;
use sitesift::config::{load_config_with_hash, Config};
use sitesift::crawler::run_crawl;
use sitesift::output::{print_report, ConsoleReporter, SilentReporter, StatusReporter};
use sitesift::SiftError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for an error reported by the index provider
const EXIT_INDEX_API_ERROR: u8 = 2;

/// Exit code for any other failure
const EXIT_FAILURE: u8 = 1;

/// SiteSift: make a website searchable
///
/// SiteSift crawls every page under a seed URL, extracts the visible text of
/// each page, and upserts it into a named search index keyed by page URL.
#[derive(Parser, Debug)]
#[command(name = "sitesift")]
#[command(version)]
#[command(about = "Crawl a website into a search index", long_about = None)]
struct Cli {
    /// API key for the search index service
    #[arg(value_name = "API_KEY")]
    api_key: String,

    /// Name of the index to fill (created if missing)
    #[arg(value_name = "INDEX_NAME")]
    index_name: String,

    /// Seed URL; only links starting with it are crawled
    #[arg(value_name = "URL")]
    url: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the status line and non-error logs
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => {
            println!("URL indexed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => match e.downcast_ref::<SiftError>() {
            Some(sift) if sift.is_index_api_error() => {
                println!("API Error: {}", sift);
                ExitCode::from(EXIT_INDEX_API_ERROR)
            }
            _ => {
                println!("An unexpected error occurred: {:#}", e);
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the status line on stdout is not interleaved.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesift=info,warn"),
            1 => EnvFilter::new("sitesift=debug,info"),
            2 => EnvFilter::new("sitesift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration and runs the crawl
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let reporter: Box<dyn StatusReporter> = if cli.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::stdout(config.status.url_width))
    };

    let report = run_crawl(&config, &cli.api_key, &cli.index_name, &cli.url, reporter).await?;

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}
