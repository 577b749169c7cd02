// src/crawl/engine.rs
// =============================================================================
// This module runs the crawl.
//
// How it works:
// 1. Claim the seed URL and put it in the frontier
// 2. Start a fixed pool of workers; each one loops:
//    a. pop a URL from the frontier
//    b. skip it if it ends with an ignored suffix
//    c. fetch it; on failure retract it from the visited set
//    d. decode the body (lossily) and extract relative + absolute links
//    e. record the page -> children edge in the sitemap
//    f. claim every child nobody has claimed yet and queue it
// 3. When the completion tracker drops to zero, every worker stops
//
// Each popped URL carries a TaskGuard, so the tracker is decremented once per
// URL no matter which of the steps above the task stopped at.
//
// Relative links are joined onto the seed's site root, not onto the page
// they were found on.
// =============================================================================

use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::config::CrawlConfig;
use super::error::CrawlError;
use super::frontier::{Frontier, QueuedUrl};
use super::sitemap::Sitemap;
use super::tracker::CompletionTracker;
use super::visited::VisitedSet;
use crate::extract::{extract_relative_links, AbsoluteLinkMatcher};
use crate::fetch::PageFetcher;

/// Timing for one crawled page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageStats {
    /// Time spent waiting on the fetcher
    #[serde(rename = "fetch_ms", serialize_with = "as_millis")]
    pub fetch_time: Duration,
    /// Time from popping the URL to queuing its children
    #[serde(rename = "total_ms", serialize_with = "as_millis")]
    pub total_time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fetch,
    ContentDecode,
}

/// A task that ended without a sitemap entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlFailure {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl CrawlFailure {
    fn new(url: &str, error: &CrawlError) -> Self {
        let kind = match error {
            CrawlError::ContentDecodeFailure { .. } => FailureKind::ContentDecode,
            _ => FailureKind::Fetch,
        };
        Self {
            url: url.to_string(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    pub sitemap: Sitemap,
    #[serde(skip)]
    pub visited: VisitedSet,
    pub failures: Vec<CrawlFailure>,
    pub stats: BTreeMap<String, PageStats>,
    pub pages_crawled: usize,
    /// URLs still sitting in the frontier when the crawl stopped. Always 0
    /// for a crawl that terminated normally.
    #[serde(skip)]
    pub left_in_queue: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn failure(&self, url: &str) -> Option<&CrawlFailure> {
        self.failures.iter().find(|failure| failure.url == url)
    }
}

/// One crawl of one site. Build it, `run()` it once, read the report.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    absolute: AbsoluteLinkMatcher,
    visited: VisitedSet,
    sitemap: Sitemap,
    frontier: Frontier,
    tracker: Arc<CompletionTracker>,
    stats: DashMap<String, PageStats>,
    failures: DashMap<String, CrawlFailure>,
    pages_crawled: AtomicUsize,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self, CrawlError> {
        let absolute = AbsoluteLinkMatcher::new(Some(config.domain()))
            .map_err(|_| CrawlError::InvalidDomain(config.domain().to_string()))?;
        let frontier = Frontier::new(config.queue_capacity());

        Ok(Self {
            config,
            fetcher,
            absolute,
            visited: VisitedSet::new(),
            sitemap: Sitemap::new(),
            frontier,
            tracker: Arc::new(CompletionTracker::new()),
            stats: DashMap::new(),
            failures: DashMap::new(),
            pages_crawled: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls until no claimed URL is left unprocessed.
    pub async fn run(self) -> CrawlReport {
        let started = Instant::now();
        let workers = self.config.workers();
        info!(
            seed = self.config.seed(),
            domain = self.config.domain(),
            workers,
            queue_capacity = self.frontier.capacity(),
            "starting crawl"
        );

        // The seed goes in before any worker exists, otherwise the workers
        // would see zero outstanding tasks and stop straight away
        let seed = self.config.seed().to_string();
        if self.visited.try_claim(&seed) {
            let guard = self.tracker.track();
            self.frontier.push(QueuedUrl { url: seed, guard }).await;
        }

        let crawler = Arc::new(self);
        let handles: Vec<_> = (0..workers)
            .map(|id| tokio::spawn(Arc::clone(&crawler).worker(id)))
            .collect();

        crawler.tracker.wait().await;

        for (id, joined) in futures::future::join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = joined {
                error!(worker = id, error = %e, "crawl worker panicked");
            }
        }

        // Each worker owned one clone and every worker has been joined
        let Ok(crawler) = Arc::try_unwrap(crawler) else {
            unreachable!("crawl workers outlived the join");
        };
        let report = crawler.into_report(started.elapsed());

        info!(
            pages = report.pages_crawled,
            failures = report.failures.len(),
            left_in_queue = report.left_in_queue,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "crawl finished"
        );
        report
    }

    async fn worker(self: Arc<Self>, id: usize) {
        debug!(worker = id, "worker started");
        loop {
            let item = tokio::select! {
                _ = self.tracker.wait() => break,
                item = self.frontier.pop() => match item {
                    Some(item) => item,
                    None => break,
                },
            };
            self.process(item).await;
        }
        debug!(worker = id, "worker stopped");
    }

    async fn process(&self, item: QueuedUrl) {
        // Held until the end of this function, whichever way it returns
        let QueuedUrl { url, guard: _guard } = item;

        if self.config.is_ignored(&url) {
            debug!(url = %url, "skipping ignored suffix");
            return;
        }

        if let Err(e) = self.visit(&url).await {
            warn!(url = %url, error = %e, "crawl task failed");
            self.failures.insert(url.clone(), CrawlFailure::new(&url, &e));
        }
    }

    async fn visit(&self, url: &str) -> Result<(), CrawlError> {
        let started = Instant::now();
        debug!(url, "fetching");

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                let error = CrawlError::fetch(url, &e);
                if matches!(error, CrawlError::FetchFailure { .. }) {
                    self.visited.retract(url);
                }
                return Err(error);
            }
        };
        let fetch_time = started.elapsed();

        if !page.is_success() {
            self.visited.retract(url);
            return Err(CrawlError::status(url, page.status));
        }

        // Pages in legacy encodings still get crawled: invalid sequences turn
        // into U+FFFD and the ASCII href attributes survive untouched
        let html = String::from_utf8_lossy(&page.body);

        let children = self.links(&html);
        self.sitemap.record(url, children.clone());

        let mut queued = 0;
        for child in children {
            if self.visited.try_claim(&child) {
                // Tracked before the parent's own guard drops, so the count
                // can't touch zero while work is still being discovered
                let guard = self.tracker.track();
                self.frontier.offer(QueuedUrl { url: child, guard });
                queued += 1;
            }
        }

        self.pages_crawled.fetch_add(1, Ordering::SeqCst);
        let stats = PageStats {
            fetch_time,
            total_time: started.elapsed(),
        };
        self.stats.insert(url.to_string(), stats);

        debug!(
            url,
            queued,
            outstanding = self.tracker.outstanding(),
            fetch_ms = fetch_time.as_millis() as u64,
            "page crawled"
        );
        Ok(())
    }

    // Relative links first (joined onto the site root), then absolute links
    // on our domain. Duplicates are kept; the visited set sorts them out.
    fn links(&self, html: &str) -> Vec<String> {
        let mut children: Vec<String> = extract_relative_links(html)
            .iter()
            .map(|path| self.config.resolve(path))
            .collect();
        children.extend(self.absolute.extract(html));
        children
    }

    fn into_report(self, elapsed: Duration) -> CrawlReport {
        let mut failures: Vec<_> = self.failures.into_iter().map(|(_, f)| f).collect();
        failures.sort_by(|a, b| a.url.cmp(&b.url));

        CrawlReport {
            left_in_queue: self.frontier.len(),
            sitemap: self.sitemap,
            visited: self.visited,
            failures,
            stats: self.stats.into_iter().collect(),
            pages_crawled: self.pages_crawled.into_inner(),
            elapsed,
        }
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
