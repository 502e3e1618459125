//! # Archive Headlines
//!
//! Harvests a paginated news archive one calendar day at a time and writes
//! every headline it finds (title, category, release time) to a single JSON
//! document.
//!
//! ## Usage
//!
//! ```sh
//! archive_headlines --start-date 2023/03/01 -o unprocessed/WSJ_headlines.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Dates**: walk from the start date to today ([`cursor`])
//! 2. **Pagination**: read each date's page count from its root listing
//! 3. **Fetching**: GET every listing page ([`fetcher`])
//! 4. **Extraction**: pull article cards out of each page ([`extractor`])
//! 5. **Output**: write the ordered result once, at the end ([`outputs`])
//!
//! Failed fetches and missing markup never abort the run; they show up as
//! missing pages, `null` fields, and the counters of the final summary.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawler;
mod cursor;
mod extractor;
mod fetcher;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use crawler::{CrawlConfig, Crawler};
use cursor::{CalendarDate, DateCursor, SystemClock};
use extractor::{ArticleExtractor, SelectorTable};
use fetcher::{FetchConfig, HttpFetcher, RetryFetch};
use outputs::json::JsonFileSink;
use utils::ensure_output_writable;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("archive_headlines starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // --- Startup configuration: anything wrong here is fatal ---
    let start_date: CalendarDate = args.start_date.parse()?;
    let cursor = DateCursor::new(&args.archive_base, SystemClock)?;

    let table = match &args.selectors {
        Some(path) => config::load_selector_table(path).await?,
        None => SelectorTable::default(),
    };
    let extractor = ArticleExtractor::new(&table)?;

    if let Err(e) = ensure_output_writable(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let http = HttpFetcher::new(&FetchConfig {
        user_agent: args.user_agent.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })?;
    let source = RetryFetch::new(http, args.max_retries, Duration::from_secs(1));

    let crawl_config = CrawlConfig {
        start_date,
        request_delay: Duration::from_millis(args.delay_ms),
        max_consecutive_failed_dates: args.max_failed_dates,
        page_concurrency: usize::from(args.page_concurrency),
    };
    info!(
        %start_date,
        archive_base = %args.archive_base,
        output = %args.output.display(),
        max_retries = args.max_retries,
        delay_ms = args.delay_ms,
        page_concurrency = args.page_concurrency,
        "Crawl configured"
    );

    // --- Ctrl+C: stop between requests and still write what we have ---
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C; finishing current request and writing results");
            let _ = shutdown_tx.send(true);
        }
    });

    let crawler = Crawler::new(source, cursor, extractor, crawl_config).with_shutdown(shutdown_rx);
    let sink = JsonFileSink::new(&args.output);

    let outcome = match crawler.run(&sink).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(path = %sink.path().display(), error = %e, "Failed to write crawl result");
            return Err(e.into());
        }
    };

    let last_date = outcome.result.digests().last().map(|d| d.date.to_string());
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        stop_reason = %outcome.summary.stop_reason,
        dates_attempted = outcome.summary.dates_attempted,
        dates_with_output = outcome.summary.dates_with_output,
        root_failures = outcome.summary.root_failures,
        page_failures = outcome.summary.page_failures,
        digests = outcome.result.len(),
        articles = outcome.result.article_count(),
        last_date_with_output = last_date.as_deref().unwrap_or("-"),
        "Finished crawling"
    );

    Ok(())
}
