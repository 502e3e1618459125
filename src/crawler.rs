//! The crawl loop.
//!
//! [`Crawler::run`] walks dates from the configured start day up to "today"
//! (re-read from the [`Clock`] on every iteration). For each date it fetches
//! the root listing once to learn the page count, then fetches pages
//! `1..=N` and appends one [`DailyDigest`] per page that yielded articles.
//!
//! Nothing in the loop is fatal. Failed fetches are logged, counted in the
//! [`RunSummary`], and treated as pages without articles. The run ends when
//! the date range is exhausted, a shutdown signal is observed, or (if
//! configured) too many consecutive dates failed entirely. In every case the
//! accumulated [`CrawlResult`] is handed to the sink exactly once.

use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::cursor::{CalendarDate, Clock, DateCursor};
use crate::extractor::{ArticleExtractor, PageCountHint};
use crate::fetcher::PageSource;
use crate::models::{ArticleRecord, CrawlResult, DailyDigest, RunSummary, StopReason};
use crate::outputs::{DigestSink, OutputError};
use crate::utils::truncate_for_log;

/// Loop settings.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_date: CalendarDate,
    /// Pause before every request. Zero disables it.
    pub request_delay: Duration,
    /// Stop after this many consecutive dates on which every fetch failed.
    pub max_consecutive_failed_dates: Option<usize>,
    /// Pages of one date fetched concurrently. 1 is fully sequential.
    pub page_concurrency: usize,
}

impl CrawlConfig {
    pub fn new(start_date: CalendarDate) -> Self {
        Self {
            start_date,
            request_delay: Duration::ZERO,
            max_consecutive_failed_dates: None,
            page_concurrency: 1,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub result: CrawlResult,
    pub summary: RunSummary,
}

#[derive(Debug)]
enum PageOutcome {
    /// Not requested because a shutdown was signalled.
    Skipped,
    Failed,
    Fetched(Vec<ArticleRecord>),
}

#[derive(Debug, Default)]
struct DateOutcome {
    digests: Vec<DailyDigest>,
    root_fetched: bool,
    pages_attempted: usize,
    pages_fetched: usize,
    interrupted: bool,
}

impl DateOutcome {
    fn fully_failed(&self) -> bool {
        !self.interrupted && !self.root_fetched && self.pages_fetched == 0
    }
}

/// Drives the date and page loops over a [`PageSource`].
pub struct Crawler<S, C> {
    source: S,
    cursor: DateCursor<C>,
    extractor: ArticleExtractor,
    config: CrawlConfig,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<S, C> Crawler<S, C>
where
    S: PageSource,
    C: Clock,
{
    pub fn new(source: S, cursor: DateCursor<C>, extractor: ArticleExtractor, config: CrawlConfig) -> Self {
        Self {
            source,
            cursor,
            extractor,
            config,
            shutdown: None,
        }
    }

    /// Stop cleanly once `shutdown` reads `true`. Checked before every request.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    async fn pause(&self) {
        if !self.config.request_delay.is_zero() {
            sleep(self.config.request_delay).await;
        }
    }

    /// Crawl every date in range and flush the result to `sink`.
    ///
    /// Only a sink failure is returned as an error.
    #[instrument(level = "info", skip_all, fields(start = %self.config.start_date))]
    pub async fn run<K: DigestSink>(&self, sink: &K) -> Result<CrawlOutcome, OutputError> {
        let mut result = CrawlResult::new();
        let mut summary = RunSummary::default();
        let mut consecutive_failed = 0usize;
        let mut current = Some(self.config.start_date);

        while let Some(date) = current {
            if !self.cursor.is_before_or_equal_today(date) {
                break;
            }
            if self.is_cancelled() {
                summary.stop_reason = StopReason::Cancelled;
                break;
            }

            let outcome = self.crawl_date(date).await;
            summary.dates_attempted += 1;
            summary.pages_attempted += outcome.pages_attempted;
            summary.pages_fetched += outcome.pages_fetched;
            summary.page_failures += outcome.pages_attempted - outcome.pages_fetched;
            if !outcome.root_fetched {
                summary.root_failures += 1;
            }
            if !outcome.digests.is_empty() {
                summary.dates_with_output += 1;
            }
            let fully_failed = outcome.fully_failed();
            let interrupted = outcome.interrupted;
            for digest in outcome.digests {
                summary.digests += 1;
                summary.articles += digest.articles.len();
                result.push(digest);
            }

            if interrupted {
                summary.stop_reason = StopReason::Cancelled;
                break;
            }

            if fully_failed {
                consecutive_failed += 1;
                if self
                    .config
                    .max_consecutive_failed_dates
                    .is_some_and(|max| consecutive_failed >= max)
                {
                    warn!(%date, consecutive_failed, "Every fetch failed on consecutive dates; stopping");
                    summary.stop_reason = StopReason::CircuitOpen;
                    break;
                }
            } else {
                consecutive_failed = 0;
            }

            current = self.cursor.successor(date);
        }

        sink.flush(&result).await?;

        info!(
            stop_reason = %summary.stop_reason,
            dates_attempted = summary.dates_attempted,
            dates_with_output = summary.dates_with_output,
            pages_attempted = summary.pages_attempted,
            pages_fetched = summary.pages_fetched,
            soft_failures = summary.soft_failures(),
            digests = summary.digests,
            articles = summary.articles,
            "Crawl finished"
        );
        Ok(CrawlOutcome { result, summary })
    }

    #[instrument(level = "info", skip_all, fields(%date))]
    async fn crawl_date(&self, date: CalendarDate) -> DateOutcome {
        let mut outcome = DateOutcome::default();
        let (page_count, root_fetched) = self.resolve_page_count(date).await;
        outcome.root_fetched = root_fetched;

        let pages = if self.config.page_concurrency <= 1 {
            let mut pages = Vec::new();
            for page in 1..=page_count {
                pages.push((page, self.crawl_page(date, page).await));
            }
            pages
        } else {
            let mut pages: Vec<(u32, PageOutcome)> = stream::iter(1..=page_count)
                .map(|page| async move { (page, self.crawl_page(date, page).await) })
                .buffer_unordered(self.config.page_concurrency)
                .collect()
                .await;
            pages.sort_by_key(|(page, _)| *page);
            pages
        };

        for (page, page_outcome) in pages {
            match page_outcome {
                PageOutcome::Skipped => outcome.interrupted = true,
                PageOutcome::Failed => outcome.pages_attempted += 1,
                PageOutcome::Fetched(articles) => {
                    outcome.pages_attempted += 1;
                    outcome.pages_fetched += 1;
                    if articles.is_empty() {
                        debug!(page, "No articles on page");
                        continue;
                    }
                    info!(page, articles = articles.len(), "Headlines crawled");
                    outcome.digests.push(DailyDigest { date, page, articles });
                }
            }
        }
        outcome
    }

    /// Fetch the root listing and read its page-count hint.
    ///
    /// Returns one page when the root fetch fails or carries no usable hint.
    async fn resolve_page_count(&self, date: CalendarDate) -> (u32, bool) {
        let url = self.cursor.root_url(date);
        self.pause().await;
        match self.source.fetch(&url).await {
            Ok(body) => {
                let hint = self.extractor.page_count_in(&body);
                match &hint {
                    PageCountHint::Found(n) => debug!(pages = *n, "Read page count"),
                    PageCountHint::MissingNode => debug!("No page-count indicator; assuming one page"),
                    PageCountHint::Unparseable(text) => debug!(
                        text = %truncate_for_log(text, 80),
                        "Unparseable page-count indicator; assuming one page"
                    ),
                }
                (hint.resolve(), true)
            }
            Err(e) => {
                warn!(%url, error = %e, "Root fetch failed; assuming one page");
                (1, false)
            }
        }
    }

    async fn crawl_page(&self, date: CalendarDate, page: u32) -> PageOutcome {
        if self.is_cancelled() {
            return PageOutcome::Skipped;
        }
        let url = self.cursor.page_url(date, page);
        self.pause().await;
        match self.source.fetch(&url).await {
            Ok(body) => PageOutcome::Fetched(self.extractor.extract_page(&body)),
            Err(e) => {
                warn!(page, %url, error = %e, "Page fetch failed; treating as empty");
                PageOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::FixedClock;
    use crate::extractor::SelectorTable;
    use crate::fetcher::{FetchConfig, FetchError, HttpFetcher};
    use crate::outputs::json::render;
    use reqwest::StatusCode;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "https://archive.test/news/archive";

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn extractor() -> ArticleExtractor {
        ArticleExtractor::new(&SelectorTable {
            article: "article.story".to_string(),
            headline: "span.headline".to_string(),
            category: "div.kind".to_string(),
            release_time: "p.time".to_string(),
            page_count: "span.total".to_string(),
        })
        .unwrap()
    }

    fn listing(total: Option<u32>, headlines: &[&str]) -> String {
        let mut html = String::from("<html><body>");
        if let Some(n) = total {
            html.push_str(&format!(r#"<span class="total">of {n}</span>"#));
        }
        for h in headlines {
            html.push_str(&format!(
                r#"<article class="story"><div class="kind">News</div><span class="headline">{h}</span><p class="time">10:00 AM ET</p></article>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn root(d: &str) -> String {
        format!("{BASE}/{d}")
    }

    fn page(d: &str, n: u32) -> String {
        format!("{BASE}/{d}/?page={n}")
    }

    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeSite {
        fn with(mut self, url: String, body: String) -> Self {
            self.pages.insert(url, body);
            self
        }

        fn requested(&self, url: &str) -> bool {
            self.requests.borrow().iter().any(|u| u == url)
        }
    }

    impl PageSource for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            if let Some(delay) = self.delays.get(url) {
                sleep(*delay).await;
            }
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        flushes: RefCell<Vec<CrawlResult>>,
    }

    impl DigestSink for RecordingSink {
        async fn flush(&self, result: &CrawlResult) -> Result<(), OutputError> {
            self.flushes.borrow_mut().push(result.clone());
            Ok(())
        }
    }

    fn crawler<S: PageSource>(source: S, start: &str, today: &str) -> Crawler<S, FixedClock> {
        let cursor = DateCursor::new(BASE, FixedClock(date(today))).unwrap();
        Crawler::new(source, cursor, extractor(), CrawlConfig::new(date(start)))
    }

    fn pages_of(result: &CrawlResult) -> Vec<(String, u32)> {
        result
            .digests()
            .iter()
            .map(|d| (d.date.to_string(), d.page))
            .collect()
    }

    #[tokio::test]
    async fn test_two_page_date() {
        let site = FakeSite::default()
            .with(root("2023/03/01"), listing(Some(2), &["Root"]))
            .with(page("2023/03/01", 1), listing(Some(2), &["First"]))
            .with(page("2023/03/01", 2), listing(Some(2), &["Second"]));
        let sink = RecordingSink::default();

        let outcome = crawler(&site, "2023/03/01", "2023/03/01").run(&sink).await.unwrap();

        let digests = outcome.result.digests();
        assert_eq!(digests.len(), 2);
        assert_eq!(pages_of(&outcome.result), vec![("2023/03/01".into(), 1), ("2023/03/01".into(), 2)]);
        assert!(digests.iter().all(|d| d.articles.len() == 1));
        assert_eq!(digests[0].articles[0].headline.as_deref(), Some("First"));
        assert_eq!(digests[1].articles[0].headline.as_deref(), Some("Second"));
        assert_eq!(sink.flushes.borrow().len(), 1);
        assert_eq!(outcome.summary.stop_reason, StopReason::Completed);
        assert_eq!(outcome.summary.dates_attempted, 1);
        assert_eq!(outcome.summary.articles, 2);
    }

    #[tokio::test]
    async fn test_failed_root_defaults_to_one_page_and_continues() {
        let site = FakeSite::default()
            .with(root("2023/03/01"), listing(None, &[]))
            .with(page("2023/03/01", 1), listing(None, &["Day one"]))
            .with(root("2023/03/03"), listing(None, &[]))
            .with(page("2023/03/03", 1), listing(None, &["Day three"]));
        let sink = RecordingSink::default();

        let outcome = crawler(&site, "2023/03/01", "2023/03/03").run(&sink).await.unwrap();

        assert!(site.requested(&root("2023/03/02")));
        assert!(site.requested(&page("2023/03/02", 1)));
        assert!(!site.requested(&page("2023/03/02", 2)));
        assert_eq!(
            pages_of(&outcome.result),
            vec![("2023/03/01".into(), 1), ("2023/03/03".into(), 1)]
        );
        let summary = &outcome.summary;
        assert_eq!(summary.dates_attempted, 3);
        assert_eq!(summary.dates_with_output, 2);
        assert_eq!(summary.root_failures, 1);
        assert_eq!(summary.page_failures, 1);
        assert_eq!(summary.soft_failures(), 2);
    }

    #[tokio::test]
    async fn test_root_failure_does_not_skip_page_fetch() {
        let site = FakeSite::default().with(page("2023/03/02", 1), listing(None, &["Still here"]));
        let outcome = crawler(&site, "2023/03/02", "2023/03/02")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(outcome.result.len(), 1);
        assert_eq!(outcome.summary.root_failures, 1);
    }

    #[tokio::test]
    async fn test_empty_page_emits_no_digest() {
        let site = FakeSite::default()
            .with(root("2023/03/01"), listing(Some(3), &[]))
            .with(page("2023/03/01", 1), listing(Some(3), &["One"]))
            .with(page("2023/03/01", 2), listing(Some(3), &[]))
            .with(page("2023/03/01", 3), listing(Some(3), &["Three"]));

        let outcome = crawler(&site, "2023/03/01", "2023/03/01")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(
            pages_of(&outcome.result),
            vec![("2023/03/01".into(), 1), ("2023/03/01".into(), 3)]
        );
        assert_eq!(outcome.summary.pages_fetched, 3);
        assert_eq!(outcome.summary.page_failures, 0);
    }

    #[tokio::test]
    async fn test_unparseable_hint_means_one_page() {
        let site = FakeSite::default()
            .with(
                root("2023/03/01"),
                r#"<span class="total">of many</span>"#.to_string(),
            )
            .with(page("2023/03/01", 1), listing(None, &["Only"]));

        let outcome = crawler(&site, "2023/03/01", "2023/03/01")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(outcome.result.len(), 1);
        assert!(!site.requested(&page("2023/03/01", 2)));
    }

    #[tokio::test]
    async fn test_start_today_crawls_single_date() {
        let site = FakeSite::default()
            .with(root("2024/02/29"), listing(None, &[]))
            .with(page("2024/02/29", 1), listing(None, &["Leap"]));

        let outcome = crawler(&site, "2024/02/29", "2024/02/29")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(outcome.summary.dates_attempted, 1);
        assert_eq!(site.requests.borrow().len(), 2);
        assert!(!site.requested(&root("2024/03/01")));
    }

    #[tokio::test]
    async fn test_start_after_today_crawls_nothing_but_still_flushes() {
        let site = FakeSite::default();
        let sink = RecordingSink::default();

        let outcome = crawler(&site, "2023/03/02", "2023/03/01").run(&sink).await.unwrap();

        assert!(outcome.result.is_empty());
        assert!(site.requests.borrow().is_empty());
        assert_eq!(sink.flushes.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_crosses_month_boundary() {
        let site = FakeSite::default()
            .with(page("2023/02/28", 1), listing(None, &["Feb"]))
            .with(page("2023/03/01", 1), listing(None, &["Mar"]));

        let outcome = crawler(&site, "2023/02/28", "2023/03/01")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(
            pages_of(&outcome.result),
            vec![("2023/02/28".into(), 1), ("2023/03/01".into(), 1)]
        );
    }

    #[tokio::test]
    async fn test_identical_runs_render_identically() {
        let site = FakeSite::default()
            .with(root("2023/03/01"), listing(Some(2), &[]))
            .with(page("2023/03/01", 1), listing(Some(2), &["A", "B"]))
            .with(page("2023/03/01", 2), listing(Some(2), &["C"]))
            .with(page("2023/03/02", 1), listing(None, &["D"]));

        let first = crawler(&site, "2023/03/01", "2023/03/02")
            .run(&RecordingSink::default())
            .await
            .unwrap();
        let second = crawler(&site, "2023/03/01", "2023/03/02")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(render(&first.result).unwrap(), render(&second.result).unwrap());
    }

    #[tokio::test]
    async fn test_circuit_breaker_stops_after_consecutive_failed_dates() {
        let site = FakeSite::default();
        let mut c = crawler(&site, "2023/03/01", "2023/03/31");
        c.config.max_consecutive_failed_dates = Some(3);

        let outcome = c.run(&RecordingSink::default()).await.unwrap();

        assert_eq!(outcome.summary.stop_reason, StopReason::CircuitOpen);
        assert_eq!(outcome.summary.dates_attempted, 3);
        assert!(!site.requested(&root("2023/03/04")));
    }

    #[tokio::test]
    async fn test_circuit_breaker_resets_on_success() {
        let site = FakeSite::default().with(page("2023/03/02", 1), listing(None, &["ok"]));
        let mut c = crawler(&site, "2023/03/01", "2023/03/04");
        c.config.max_consecutive_failed_dates = Some(2);

        let outcome = c.run(&RecordingSink::default()).await.unwrap();

        assert_eq!(outcome.summary.stop_reason, StopReason::CircuitOpen);
        assert_eq!(outcome.summary.dates_attempted, 4);
        assert_eq!(outcome.result.len(), 1);
    }

    #[tokio::test]
    async fn test_without_breaker_failures_never_abort() {
        let site = FakeSite::default();
        let outcome = crawler(&site, "2023/03/01", "2023/03/31")
            .run(&RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(outcome.summary.stop_reason, StopReason::Completed);
        assert_eq!(outcome.summary.dates_attempted, 31);
        assert_eq!(outcome.summary.soft_failures(), 62);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (tx, rx) = watch::channel(true);
        let site = FakeSite::default();
        let sink = RecordingSink::default();

        let outcome = crawler(&site, "2023/03/01", "2023/03/05")
            .with_shutdown(rx)
            .run(&sink)
            .await
            .unwrap();

        assert_eq!(outcome.summary.stop_reason, StopReason::Cancelled);
        assert!(site.requests.borrow().is_empty());
        assert_eq!(sink.flushes.borrow().len(), 1);
        drop(tx);
    }

    struct CancelAfter<'a> {
        inner: &'a FakeSite,
        tx: watch::Sender<bool>,
        after: usize,
        calls: Cell<usize>,
    }

    impl PageSource for CancelAfter<'_> {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n == self.after {
                let _ = self.tx.send(true);
            }
            self.inner.fetch(url).await
        }
    }

    #[tokio::test]
    async fn test_cancel_mid_run_keeps_accumulated_digests() {
        let site = FakeSite::default()
            .with(root("2023/03/01"), listing(Some(2), &[]))
            .with(page("2023/03/01", 1), listing(Some(2), &["One"]))
            .with(page("2023/03/01", 2), listing(Some(2), &["Two"]))
            .with(page("2023/03/02", 1), listing(None, &["Never"]));
        let (tx, rx) = watch::channel(false);
        let source = CancelAfter {
            inner: &site,
            tx,
            after: 2,
            calls: Cell::new(0),
        };
        let sink = RecordingSink::default();

        let outcome = crawler(source, "2023/03/01", "2023/03/02")
            .with_shutdown(rx)
            .run(&sink)
            .await
            .unwrap();

        assert_eq!(outcome.summary.stop_reason, StopReason::Cancelled);
        assert_eq!(pages_of(&outcome.result), vec![("2023/03/01".into(), 1)]);
        assert!(!site.requested(&page("2023/03/01", 2)));
        assert_eq!(sink.flushes.borrow()[0], outcome.result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_pages_are_appended_in_page_order() {
        let mut site = FakeSite::default().with(root("2023/03/01"), listing(Some(4), &[]));
        for n in 1..=4u32 {
            site = site.with(page("2023/03/01", n), listing(Some(4), &[&format!("Page {n}")]));
            // Later pages finish first.
            site.delays
                .insert(page("2023/03/01", n), Duration::from_millis(100 * u64::from(5 - n)));
        }
        site = site.with(page("2023/03/02", 1), listing(None, &["Next day"]));
        let mut c = crawler(&site, "2023/03/01", "2023/03/02");
        c.config.page_concurrency = 4;

        let outcome = c.run(&RecordingSink::default()).await.unwrap();

        assert_eq!(
            pages_of(&outcome.result),
            vec![
                ("2023/03/01".into(), 1),
                ("2023/03/01".into(), 2),
                ("2023/03/01".into(), 3),
                ("2023/03/01".into(), 4),
                ("2023/03/02".into(), 1),
            ]
        );
        assert_eq!(outcome.result.digests()[0].articles[0].headline.as_deref(), Some("Page 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_delay_is_applied() {
        let site = FakeSite::default().with(page("2023/03/01", 1), listing(None, &["x"]));
        let mut c = crawler(&site, "2023/03/01", "2023/03/01");
        c.config.request_delay = Duration::from_secs(2);

        let t0 = tokio::time::Instant::now();
        c.run(&RecordingSink::default()).await.unwrap();

        assert!(t0.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        let server = MockServer::start().await;
        let mount = |p: &'static str, page: Option<&'static str>, template: ResponseTemplate| {
            let mut mock = Mock::given(method("GET")).and(path(p));
            if let Some(n) = page {
                mock = mock.and(query_param("page", n));
            }
            mock.respond_with(template)
        };
        let ok = |body: String| ResponseTemplate::new(200).set_body_string(body);

        mount("/2023/03/01", None, ok(listing(Some(2), &[]))).mount(&server).await;
        mount("/2023/03/01/", Some("1"), ok(listing(Some(2), &["March first, one"])))
            .mount(&server)
            .await;
        mount("/2023/03/01/", Some("2"), ok(listing(Some(2), &["March first, two"])))
            .mount(&server)
            .await;
        // Root of the second day times out; its only page errors.
        mount(
            "/2023/03/02",
            None,
            ResponseTemplate::new(200).set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
        mount("/2023/03/02/", Some("1"), ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        mount("/2023/03/03", None, ok(listing(None, &[]))).mount(&server).await;
        mount("/2023/03/03/", Some("1"), ok(listing(None, &["March third"])))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchConfig {
            timeout: Duration::from_millis(500),
            ..FetchConfig::default()
        })
        .unwrap();
        let cursor = DateCursor::new(&server.uri(), FixedClock(date("2023/03/03"))).unwrap();
        let c = Crawler::new(fetcher, cursor, extractor(), CrawlConfig::new(date("2023/03/01")));

        let outcome = c.run(&RecordingSink::default()).await.unwrap();

        assert_eq!(
            pages_of(&outcome.result),
            vec![
                ("2023/03/01".into(), 1),
                ("2023/03/01".into(), 2),
                ("2023/03/03".into(), 1),
            ]
        );
        assert_eq!(outcome.summary.root_failures, 1);
        assert_eq!(outcome.summary.page_failures, 1);
        assert_eq!(outcome.summary.stop_reason, StopReason::Completed);
    }
}
