//! JSON output of a finished crawl.
//!
//! The whole [`CrawlResult`] is written once, as a pretty-printed array:
//!
//! ```text
//! [
//!   {
//!     "date": "2023/03/01",
//!     "headlines": [
//!       { "headline title": "...", "type": "...", "release time": "..." }
//!     ]
//!   }
//! ]
//! ```
//!
//! Fields the extractor could not find are written as `null`.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

use super::{DigestSink, OutputError};
use crate::models::CrawlResult;

/// Render the artifact. Deterministic for a given result.
pub fn render(result: &CrawlResult) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write a [`CrawlResult`] to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_crawl_result(result: &CrawlResult, path: &Path) -> Result<(), OutputError> {
    if result.is_empty() {
        warn!("No headlines collected; writing an empty result");
    }
    let json = render(result)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;
    info!(
        digests = result.len(),
        articles = result.article_count(),
        "Wrote crawl result"
    );
    Ok(())
}

/// Sink that writes the artifact to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DigestSink for JsonFileSink {
    async fn flush(&self, result: &CrawlResult) -> Result<(), OutputError> {
        write_crawl_result(result, &self.path).await
    }
}
