//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment variable named
//! in its help text.

use clap::Parser;
use std::path::PathBuf;

use crate::fetcher::DEFAULT_USER_AGENT;

/// Command-line arguments for the archive crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl from the default start date to today
/// archive_headlines
///
/// # Custom range start and output file, with a politeness delay
/// archive_headlines --start-date 2024/01/01 -o out/headlines.json --delay-ms 500
///
/// # Markup changed: override selectors
/// archive_headlines --selectors selectors.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First date to crawl, as YYYY/MM/DD
    #[arg(long, env = "START_DATE", default_value = "2023/03/01")]
    pub start_date: String,

    /// Path of the JSON file written at the end of the run
    #[arg(short, long, env = "OUTPUT_PATH", default_value = "unprocessed/WSJ_headlines.json")]
    pub output: PathBuf,

    /// Archive base URL; dates are appended as /YYYY/MM/DD
    #[arg(long, env = "ARCHIVE_BASE", default_value = "https://www.wsj.com/news/archive")]
    pub archive_base: String,

    /// Optional YAML file mapping roles to CSS selectors
    #[arg(long, env = "SELECTORS_PATH")]
    pub selectors: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long, env = "CRAWL_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries per request on transport errors, 5xx and 429 (0 disables retrying)
    #[arg(long, default_value_t = 0)]
    pub max_retries: usize,

    /// Pause before each request, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Stop after this many consecutive dates on which every fetch failed
    #[arg(long)]
    pub max_failed_dates: Option<usize>,

    /// Pages of one date fetched concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_concurrency: u16,
}
