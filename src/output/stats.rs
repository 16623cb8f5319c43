//! End-of-run summary
//!
//! Collects the crawl counters, the file sink result and the publish report
//! of one category run and logs them in one place.

use crate::crawler::CrawlStats;
use crate::output::PublishReport;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Everything worth reporting about a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub category: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub crawl: CrawlStats,

    /// Records in the drained collector
    pub records: usize,

    /// Where the JSON array was written
    pub output_path: PathBuf,

    /// `None` when publishing was skipped
    pub publish: Option<PublishReport>,
}

impl RunSummary {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Share of fetched pages that produced a usable response, in percent
    pub fn fetch_success_rate(&self) -> f64 {
        let fetched = self.crawl.listing_pages + self.crawl.detail_pages;
        let attempted = fetched + self.crawl.fetch_failures;
        if attempted == 0 {
            0.0
        } else {
            (fetched as f64 / attempted as f64) * 100.0
        }
    }
}

/// Logs a run summary
///
/// # Arguments
///
/// * `summary` - The summary to log
pub fn log_summary(summary: &RunSummary) {
    let crawl = &summary.crawl;

    tracing::info!(
        "Run '{}' finished in {}s (started {}, finished {})",
        summary.category,
        summary.elapsed().num_seconds(),
        summary.started_at.to_rfc3339(),
        summary.finished_at.to_rfc3339()
    );
    tracing::info!(
        "Pages: {} listing, {} detail, {} failed ({:.1}% fetch success)",
        crawl.listing_pages,
        crawl.detail_pages,
        crawl.fetch_failures,
        summary.fetch_success_rate()
    );
    tracing::info!(
        "Records: {} collected, {} duplicates, {} invalid, {} out of stock",
        crawl.records_collected,
        crawl.duplicates,
        crawl.dropped_invalid,
        crawl.dropped_out_of_stock
    );
    if crawl.unrouted_pages > 0 {
        tracing::warn!("{} listing pages matched no site", crawl.unrouted_pages);
    }
    tracing::info!(
        "Output: {} records written to {}",
        summary.records,
        summary.output_path.display()
    );

    match &summary.publish {
        Some(report) if report.is_complete() => tracing::info!(
            "Publish: {} chunks, {} records accepted",
            report.chunks_sent,
            report.records_accepted
        ),
        Some(report) => tracing::warn!(
            "Publish: {} of {} chunks failed, {} records not delivered",
            report.chunks_failed,
            report.chunks_sent + report.chunks_failed,
            report.records_rejected
        ),
        None => tracing::info!("Publish: skipped"),
    }
}
