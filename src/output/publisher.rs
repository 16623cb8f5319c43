//! Batch publisher for the downstream listings API
//!
//! Records are sent in fixed-size chunks, one `POST` per chunk, in their
//! original order. Only `201 Created` counts as success. A failed chunk is
//! logged and skipped; it is never retried or re-queued, so delivery is
//! at-most-once per run.

use crate::record::Record;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Default number of records per request
pub const DEFAULT_CHUNK_SIZE: usize = 20;

const API_KEY_HEADER: &str = "x-api-key";

/// Why a single chunk was not accepted
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Unexpected status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to serialize chunk: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of publishing a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub chunks_sent: usize,
    pub chunks_failed: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.chunks_failed == 0
    }
}

/// Publishes records to one endpoint
#[derive(Debug, Clone)]
pub struct BatchPublisher {
    client: Client,
    endpoint: String,
    api_key: String,
    chunk_size: usize,
}

impl BatchPublisher {
    /// Creates a publisher
    ///
    /// # Arguments
    ///
    /// * `endpoint` - URL each chunk is POSTed to
    /// * `api_key` - Value of the `x-api-key` header
    /// * `chunk_size` - Records per request; values below 1 are treated as 1
    pub fn new(endpoint: &str, api_key: &str, chunk_size: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self::with_client(client, endpoint, api_key, chunk_size))
    }

    pub fn with_client(client: Client, endpoint: &str, api_key: &str, chunk_size: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends every chunk in order and reports how many were accepted
    ///
    /// Never fails as a whole: each chunk's failure is logged with its status
    /// and response body, and the next chunk is sent regardless.
    pub async fn publish(&self, records: &[Record]) -> PublishReport {
        let mut report = PublishReport::default();
        let total = records.len().div_ceil(self.chunk_size);

        for (index, chunk) in records.chunks(self.chunk_size).enumerate() {
            match self.send_chunk(chunk).await {
                Ok(()) => {
                    tracing::info!(
                        "Published chunk {}/{} ({} records) to {}",
                        index + 1,
                        total,
                        chunk.len(),
                        self.endpoint
                    );
                    report.chunks_sent += 1;
                    report.records_accepted += chunk.len();
                }
                Err(e) => {
                    tracing::warn!(
                        "Chunk {}/{} ({} records) was not accepted: {}",
                        index + 1,
                        total,
                        chunk.len(),
                        e
                    );
                    report.chunks_failed += 1;
                    report.records_rejected += chunk.len();
                }
            }
        }

        report
    }

    async fn send_chunk(&self, chunk: &[Record]) -> Result<(), PublishError> {
        let body = serde_json::to_vec(chunk)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PublishError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
