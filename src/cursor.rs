//! Calendar dates and archive URL derivation.
//!
//! The archive publishes one listing per calendar day under
//! `{archive-base}/{YYYY}/{MM}/{DD}`, paginated with a `?page=N` query on a
//! trailing-slash variant of the same path. [`DateCursor`] owns the base URL
//! and the [`Clock`] that decides where the date range ends.

use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::config::ConfigError;

/// Format used for both the URL path segment and the output artifact.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// A normalized calendar day, rendered as `YYYY/MM/DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// The following calendar day. `None` only past the end of chrono's range.
    pub fn successor(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; the archive path does not.
        let well_formed = s.len() == 10
            && s.char_indices().all(|(i, c)| match i {
                4 | 7 => c == '/',
                _ => c.is_ascii_digit(),
            });
        if !well_formed {
            return Err(ConfigError::DateFormat(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ConfigError::DateFormat(s.to_string()))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Source of "today" for the end-of-range check.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate(Local::now().date_naive())
    }
}

/// A clock pinned to one day.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

/// Derives archive URLs for dates and decides when the date loop ends.
#[derive(Debug, Clone)]
pub struct DateCursor<C> {
    base: String,
    clock: C,
}

impl<C: Clock> DateCursor<C> {
    /// Create a cursor over `archive_base`.
    ///
    /// The base must be an absolute http(s) URL; trailing slashes are dropped so
    /// that derived paths never contain `//`.
    pub fn new(archive_base: &str, clock: C) -> Result<Self, ConfigError> {
        let parsed =
            Url::parse(archive_base).map_err(|e| ConfigError::ArchiveBase(format!("{archive_base}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::ArchiveBase(format!(
                "{archive_base}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            base: archive_base.trim_end_matches('/').to_string(),
            clock,
        })
    }

    /// Landing page for `date`.
    pub fn root_url(&self, date: CalendarDate) -> String {
        format!("{}/{}", self.base, date)
    }

    /// Page `page` (1-based) of the listing for `date`.
    pub fn page_url(&self, date: CalendarDate, page: u32) -> String {
        format!("{}/{}/?page={}", self.base, date, page)
    }

    pub fn successor(&self, date: CalendarDate) -> Option<CalendarDate> {
        date.successor()
    }

    /// Re-reads the clock on every call.
    pub fn is_before_or_equal_today(&self, date: CalendarDate) -> bool {
        date <= self.clock.today()
    }
}
