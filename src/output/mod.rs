//! Output module for delivering crawl results
//!
//! This module handles:
//! - Writing the deduplicated records of a category to a JSON file
//! - Publishing them in chunks to the downstream API
//! - Summarizing the run

mod json_sink;
mod publisher;
pub mod stats;

pub use json_sink::write_records;
pub use publisher::{BatchPublisher, PublishError, PublishReport, DEFAULT_CHUNK_SIZE};
pub use stats::{log_summary, RunSummary};
