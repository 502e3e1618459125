//! Startup configuration errors and the selector table loader.
//!
//! Everything in here runs before the first request; any failure is reported
//! from `main` and ends the process with a non-zero status.

use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

use crate::extractor::SelectorTable;

/// Errors raised while turning CLI input into a runnable crawl.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid date {0:?}, expected YYYY/MM/DD")]
    DateFormat(String),

    #[error("invalid archive base URL: {0}")]
    ArchiveBase(String),

    #[error("invalid selector for role {role}: {message}")]
    Selector { role: &'static str, message: String },

    #[error("failed to read selector file {path}: {source}")]
    SelectorFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse selector file {path}: {source}")]
    SelectorYaml {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Load a role → selector table from YAML.
///
/// Roles left out of the file keep their built-in defaults.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_selector_table(path: impl AsRef<Path>) -> Result<SelectorTable, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::SelectorFile {
            path: path.display().to_string(),
            source,
        })?;
    let table = parse_selector_table(&raw).map_err(|source| ConfigError::SelectorYaml {
        path: path.display().to_string(),
        source,
    })?;
    info!(?table, "Loaded selector table");
    Ok(table)
}

fn parse_selector_table(raw: &str) -> Result<SelectorTable, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(SelectorTable::default());
    }
    serde_yaml::from_str(raw)
}
