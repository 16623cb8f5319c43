//! Crawler module for category crawls
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - Parsed page handles for the site adapters
//! - The work queue and per-site pagination state
//! - Response dispatch and the event loop
//! - The end-to-end run of one category

mod dispatcher;
mod fetcher;
pub mod parser;
mod scheduler;

pub use dispatcher::{drive, Action, CrawlStats, Dispatcher};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::Page;
pub use scheduler::{FetchRequest, RequestKind, ScheduledFetch, Scheduler};

use crate::adapters::AdapterRegistry;
use crate::collector::Collector;
use crate::config::{CategoryConfig, Config, CrawlerConfig};
use crate::output::{log_summary, write_records, BatchPublisher, PublishReport, RunSummary};
use crate::record::Record;
use crate::TrawlError;
use chrono::Utc;
use std::path::Path;

/// Publish settings supplied outside the config file
///
/// Values here take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

/// Crawls every site of a category and returns the deduplicated records
///
/// The records are drained only after the event loop has confirmed that no
/// fetch is queued or in flight.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `category` - The category to crawl
/// * `fetcher` - Source of page bodies
pub async fn crawl_category<F: PageFetcher>(
    config: &CrawlerConfig,
    category: &CategoryConfig,
    fetcher: &F,
) -> Result<(Vec<Record>, CrawlStats), TrawlError> {
    let registry = AdapterRegistry::from_category(category)?;
    tracing::info!(
        "Crawling category '{}' across {} sites",
        category.name,
        registry.len()
    );

    let collector = Collector::new(config.dedup_key);
    let mut dispatcher = Dispatcher::new(
        registry,
        collector,
        config.max_concurrent_requests as usize,
    );

    drive(&mut dispatcher, fetcher).await;

    let (mut collector, stats) = dispatcher.finish();
    Ok((collector.drain(), stats))
}

/// Runs one category end to end: crawl, drain, write the file, publish
///
/// # Arguments
///
/// * `config` - The full configuration
/// * `name` - Name of the category to run
/// * `options` - Publish overrides from the command line or environment
/// * `fetcher` - Source of page bodies
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed (individual fetch or publish
///   failures are counted in the summary, not returned)
/// * `Err(TrawlError)` - Unknown category, bad configuration or the output
///   file could not be written
pub async fn run_category<F: PageFetcher>(
    config: &Config,
    name: &str,
    options: &RunOptions,
    fetcher: &F,
) -> Result<RunSummary, TrawlError> {
    let category = config
        .category(name)
        .ok_or_else(|| TrawlError::UnknownCategory(name.to_string()))?;

    let started_at = Utc::now();
    let (records, crawl) = crawl_category(&config.crawler, category, fetcher).await?;

    let output_path = write_records(
        Path::new(&config.output.directory),
        &category.output_file,
        &records,
    )?;

    let publish = publish_records(config, category, options, &records).await?;

    let summary = RunSummary {
        category: category.name.clone(),
        started_at,
        finished_at: Utc::now(),
        crawl,
        records: records.len(),
        output_path,
        publish,
    };
    log_summary(&summary);

    Ok(summary)
}

async fn publish_records(
    config: &Config,
    category: &CategoryConfig,
    options: &RunOptions,
    records: &[Record],
) -> Result<Option<PublishReport>, TrawlError> {
    let endpoint = options.endpoint.as_deref().or(category.endpoint.as_deref());
    let api_key = options.api_key.as_deref().or(config.publish.api_key.as_deref());

    let (endpoint, api_key) = match (endpoint, api_key) {
        (Some(endpoint), Some(api_key)) => (endpoint, api_key),
        (None, _) => {
            tracing::warn!(
                "No publish endpoint for category '{}'; skipping publish",
                category.name
            );
            return Ok(None);
        }
        (_, None) => {
            tracing::warn!("No API key configured; skipping publish");
            return Ok(None);
        }
    };

    let publisher = BatchPublisher::new(endpoint, api_key, config.publish.chunk_size)?;
    tracing::info!(
        "Publishing {} records to {}",
        records.len(),
        publisher.endpoint()
    );
    Ok(Some(publisher.publish(records).await))
}
