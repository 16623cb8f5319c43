//! Market-Trawler main entry point
//!
//! This is the command-line interface for running one category crawl.

use clap::Parser;
use market_trawler::config::{load_config_with_hash, Config};
use market_trawler::crawler::{run_category, HttpFetcher, RunOptions};
use market_trawler::TrawlError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Market-Trawler: classified-ad and storefront crawler
///
/// Crawls every site configured for a category, normalizes the listings into
/// one record schema, writes them to a JSON file and publishes them in
/// chunks to the listings API.
#[derive(Parser, Debug)]
#[command(name = "market-trawler")]
#[command(version = "1.0.0")]
#[command(about = "Classified-ad crawl and publish pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Category to crawl (e.g. vehicles, bikes, mic, mobile)
    #[arg(value_name = "CATEGORY")]
    category: String,

    /// API key sent as x-api-key when publishing
    #[arg(long, env = "MARKET_TRAWLER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Publish endpoint, overriding the category's configured endpoint
    #[arg(long, env = "MARKET_TRAWLER_ENDPOINT")]
    endpoint: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let options = RunOptions {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.category, &options)?;
    } else {
        handle_crawl(&config, &cli.category, &options).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("market_trawler=info,warn"),
            1 => EnvFilter::new("market_trawler=debug,info"),
            2 => EnvFilter::new("market_trawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the sites, seeds and caps of a category
fn handle_dry_run(
    config: &Config,
    name: &str,
    options: &RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let category = config
        .category(name)
        .ok_or_else(|| TrawlError::UnknownCategory(name.to_string()))?;

    println!("=== Market-Trawler Dry Run: {} ===\n", category.name);

    println!("Crawler Configuration:");
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Dedup key: {:?}", config.crawler.dedup_key);

    println!("\nOutput:");
    println!(
        "  File: {}",
        PathBuf::from(&config.output.directory)
            .join(&category.output_file)
            .display()
    );

    println!("\nPublish:");
    let endpoint = options.endpoint.as_deref().or(category.endpoint.as_deref());
    let has_key = options.api_key.is_some() || config.publish.api_key.is_some();
    println!("  Endpoint: {}", endpoint.unwrap_or("(none)"));
    println!("  API key: {}", if has_key { "set" } else { "(none)" });
    println!("  Chunk size: {}", config.publish.chunk_size);

    println!("\nSites ({}):", category.sites.len());
    for site in &category.sites {
        println!(
            "  - {} (max {} pages, {} seeds)",
            site.adapter,
            site.max_pages,
            site.seeds.len()
        );
        for seed in &site.seeds {
            println!("    * {}", seed);
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        category.sites.iter().map(|s| s.seeds.len()).sum::<usize>()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    name: &str,
    options: &RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(&config.crawler)?;

    match run_category(config, name, options, &fetcher).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl of '{}' completed: {} records",
                summary.category,
                summary.records
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
