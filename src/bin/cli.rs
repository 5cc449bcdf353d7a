//! Alder blog aggregator CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use aggregator::{
    error::Result,
    models::Config,
    pipeline,
    services::HttpFetcher,
    storage::{LocalStorage, PostStorage},
};
use clap::{Parser, Subcommand};

/// Madison Alder Blog Aggregator
#[derive(Parser, Debug)]
#[command(
    name = "aggregator",
    version,
    about = "Incremental scraper and RSS generator for Madison alder blogs"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape all alder blogs and update the post cache
    Scrape,

    /// Generate the RSS feed from the post cache
    Feed,

    /// Run full pipeline: Scrape → Feed
    Run,

    /// Validate configuration and selectors
    Validate,

    /// Show cache info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::info!("Loaded configuration from {}", cli.config.display());

    let storage = LocalStorage::new(&config.paths.cache_file);

    match cli.command {
        Command::Scrape => {
            config.validate()?;
            let fetcher = HttpFetcher::new(&config.crawler)?;
            pipeline::run_scrape(&config, &storage, &fetcher).await?;
        }

        Command::Feed => {
            pipeline::run_feed(&config, &storage).await?;
        }

        Command::Run => {
            config.validate()?;
            let fetcher = HttpFetcher::new(&config.crawler)?;

            log::info!("Step 1/2: Scraping alder blogs...");
            pipeline::run_scrape(&config, &storage, &fetcher).await?;

            log::info!("Step 2/2: Generating feed...");
            pipeline::run_feed(&config, &storage).await?;

            log::info!("Pipeline complete!");
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Cache file: {}", storage.cache_file().display());
            log::info!("Feed file: {}", config.paths.feed_file.display());
            log::info!("Alders configured: {}", config.alders.len());

            if storage.cache_file().exists() {
                let cache = storage.load_cache().await?;
                log::info!("Cached posts: {}", cache.len());
                if let Some(newest) = cache.posts.first() {
                    log::info!(
                        "Newest post: {} ({}, district {})",
                        newest.title,
                        newest.published_at,
                        newest.alder_district
                    );
                }
            } else {
                log::info!("No cache found yet.");
            }
        }
    }

    Ok(())
}
