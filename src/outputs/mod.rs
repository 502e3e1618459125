//! Output of crawl results.
//!
//! The crawler hands its accumulated [`CrawlResult`] to a [`DigestSink`]
//! exactly once, after the date loop stops. [`json::JsonFileSink`] is the
//! only production sink.

use thiserror::Error;

use crate::models::CrawlResult;

pub mod json;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize crawl result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable destination for a finished crawl.
pub trait DigestSink {
    async fn flush(&self, result: &CrawlResult) -> Result<(), OutputError>;
}
