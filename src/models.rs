//! Data models for crawled headlines and the run that produced them.
//!
//! - [`ArticleRecord`]: the three fields pulled from one article card
//! - [`DailyDigest`]: the records found on one page of one date's listing
//! - [`CrawlResult`]: every digest of a run, in crawl order
//! - [`RunSummary`]: counters logged when a run ends
//!
//! The serialized shape of [`CrawlResult`] is the output artifact, so field
//! names here follow the published JSON keys rather than Rust conventions.

use serde::Serialize;
use std::fmt;

use crate::cursor::CalendarDate;

/// One article card.
///
/// Each field is independently optional and serializes as `null` when the
/// card had no matching node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    #[serde(rename = "headline title")]
    pub headline: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    #[serde(rename = "release time")]
    pub release_time: Option<String>,
}

impl ArticleRecord {
    pub fn has_gaps(&self) -> bool {
        self.headline.is_none() || self.category.is_none() || self.release_time.is_none()
    }
}

/// Articles found on one listing page.
///
/// A date with several pages produces several digests carrying the same date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDigest {
    pub date: CalendarDate,
    /// 1-based page within the date. Used for ordering, not written out.
    #[serde(skip)]
    pub page: u32,
    #[serde(rename = "headlines")]
    pub articles: Vec<ArticleRecord>,
}

/// All digests of a run, ordered by date and then by page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrawlResult(Vec<DailyDigest>);

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digest. Callers push in (date, page) order.
    pub fn push(&mut self, digest: DailyDigest) {
        debug_assert!(
            self.0
                .last()
                .is_none_or(|last| (last.date, last.page) < (digest.date, digest.page)),
            "digests must be appended in (date, page) order"
        );
        self.0.push(digest);
    }

    pub fn digests(&self) -> &[DailyDigest] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn article_count(&self) -> usize {
        self.0.iter().map(|d| d.articles.len()).sum()
    }
}

/// Why the date loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Reached the day after "today".
    Completed,
    /// A shutdown signal arrived between requests.
    Cancelled,
    /// Too many consecutive dates had every fetch fail.
    CircuitOpen,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::CircuitOpen => "circuit_open",
        };
        f.write_str(s)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dates_attempted: usize,
    pub dates_with_output: usize,
    pub pages_attempted: usize,
    pub pages_fetched: usize,
    /// Failed page fetches. Root fetch failures are counted separately.
    pub page_failures: usize,
    pub root_failures: usize,
    pub digests: usize,
    pub articles: usize,
    pub stop_reason: StopReason,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            dates_attempted: 0,
            dates_with_output: 0,
            pages_attempted: 0,
            pages_fetched: 0,
            page_failures: 0,
            root_failures: 0,
            digests: 0,
            articles: 0,
            stop_reason: StopReason::Completed,
        }
    }
}

impl RunSummary {
    pub fn soft_failures(&self) -> usize {
        self.page_failures + self.root_failures
    }
}
