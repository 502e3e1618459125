//! Headline extraction from archive listing pages.
//!
//! The listing markup is addressed through a [`SelectorTable`]: one CSS
//! selector per structural role. The defaults match the archive's current
//! class names; a YAML file can replace any of them when the site's markup
//! drifts (see [`crate::config::load_selector_table`]).
//!
//! Extraction never fails. A missing node yields `None` for that field only,
//! a missing page-count indicator yields a [`PageCountHint`] that resolves to
//! a single page.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::config::ConfigError;
use crate::models::ArticleRecord;

static PAGE_TOTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"of\s+(\d+)").expect("page total pattern"));

/// CSS selector for each structural role on a listing page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorTable {
    /// One article card.
    pub article: String,
    /// Headline text, searched inside a card.
    pub headline: String,
    /// Category / article type label, searched inside a card.
    pub category: String,
    /// Release timestamp, searched inside a card.
    pub release_time: String,
    /// The "of N" total in the page picker, searched in the whole document.
    pub page_count: String,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            article: concat!(
                "article",
                ".WSJTheme--story--XB4V2mLz",
                ".WSJTheme--padding-top-large--2v7uyj-o",
                ".styles--padding-top-large--3rrHKJPO",
                ".WSJTheme--padding-bottom-large--2lt6ga_1",
                ".styles--padding-bottom-large--2vWCTk2s",
                ".WSJTheme--border-bottom--s4hYCt0s",
            )
            .to_string(),
            headline: "span.WSJTheme--headlineText--He1ANr9C".to_string(),
            category: "div.WSJTheme--articleType--34Gt-vdG".to_string(),
            release_time: "p.WSJTheme--timestamp--22sfkNDv".to_string(),
            page_count: "span.WSJTheme--pagepicker-total--Kl350I1l".to_string(),
        }
    }
}

/// What the page-count indicator on a root page said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCountHint {
    Found(u32),
    /// No indicator node on the page.
    MissingNode,
    /// The node exists but its text has no positive `of N` total.
    Unparseable(String),
}

impl PageCountHint {
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Found(n) => Some(*n),
            Self::MissingNode | Self::Unparseable(_) => None,
        }
    }

    /// Number of pages to walk: the hint, or one.
    pub fn resolve(&self) -> u32 {
        self.count().unwrap_or(1)
    }
}

/// Parse the trailing total out of text shaped like `"of 12"`.
pub fn parse_page_total(text: &str) -> Option<u32> {
    PAGE_TOTAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n >= 1)
}

/// A [`SelectorTable`] compiled for repeated use.
#[derive(Debug)]
pub struct ArticleExtractor {
    article: Selector,
    headline: Selector,
    category: Selector,
    release_time: Selector,
    page_count: Selector,
}

fn compile(role: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::Selector {
        role,
        message: e.to_string(),
    })
}

impl ArticleExtractor {
    pub fn new(table: &SelectorTable) -> Result<Self, ConfigError> {
        Ok(Self {
            article: compile("article", &table.article)?,
            headline: compile("headline", &table.headline)?,
            category: compile("category", &table.category)?,
            release_time: compile("release_time", &table.release_time)?,
            page_count: compile("page_count", &table.page_count)?,
        })
    }

    /// Read the "of N" page total. Never fails; see [`PageCountHint`].
    pub fn page_count(&self, document: &Html) -> PageCountHint {
        let Some(node) = document.select(&self.page_count).next() else {
            return PageCountHint::MissingNode;
        };
        let text = node.text().collect::<String>();
        match parse_page_total(&text) {
            Some(n) => PageCountHint::Found(n),
            None => PageCountHint::Unparseable(text),
        }
    }

    /// Article cards in document order.
    pub fn articles<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.article).collect()
    }

    pub fn extract(&self, block: ElementRef<'_>) -> ArticleRecord {
        ArticleRecord {
            headline: first_text(block, &self.headline),
            category: first_text(block, &self.category),
            release_time: first_text(block, &self.release_time),
        }
    }

    /// Parse a listing page body and extract every article on it.
    pub fn extract_page(&self, html: &str) -> Vec<ArticleRecord> {
        let document = Html::parse_document(html);
        let records: Vec<ArticleRecord> = self
            .articles(&document)
            .into_iter()
            .map(|block| self.extract(block))
            .collect();

        let gaps = records.iter().filter(|r| r.has_gaps()).count();
        if gaps > 0 {
            debug!(articles = records.len(), with_missing_fields = gaps, "Partial extraction");
        }
        records
    }

    /// Parse a root page body and read its page-count indicator.
    pub fn page_count_in(&self, html: &str) -> PageCountHint {
        let document = Html::parse_document(html);
        self.page_count(&document)
    }
}

fn first_text(block: ElementRef<'_>, selector: &Selector) -> Option<String> {
    block
        .select(selector)
        .next()
        .map(|node| node.text().collect::<String>())
}
