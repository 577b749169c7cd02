// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent crawling with a fixed pool of workers
// - Same-domain restriction (subdomains included, other hosts ignored)
// - Each URL is fetched at most once per run
// - The crawl ends by itself once no claimed URL is left to process
//
// Pieces:
// - config:   validated settings for one crawl
// - visited:  the shared claim set
// - frontier: the bounded queue feeding the workers
// - tracker:  outstanding-task counter that signals completion
// - sitemap:  page -> children output
// - engine:   the workers that tie it all together
// =============================================================================

mod config;
mod engine;
mod error;
mod frontier;
mod sitemap;
mod tracker;
mod visited;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::fetch::HttpFetcher;

pub use config::{CrawlConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
pub use engine::{CrawlFailure, CrawlReport, Crawler, FailureKind, PageStats};
pub use error::CrawlError;
pub use frontier::{Frontier, QueuedUrl};
pub use sitemap::Sitemap;
pub use tracker::{CompletionTracker, TaskGuard};
pub use visited::VisitedSet;

// Crawls a website over HTTP
//
// Parameters:
//   config: validated crawl settings (seed, domain, limits)
//
// Returns: the report once every reachable page has been handled
pub async fn crawl_site(config: CrawlConfig) -> Result<CrawlReport> {
    let fetcher = HttpFetcher::new(config.fetch_timeout(), config.user_agent())
        .context("failed to build HTTP client")?;

    let crawler = Crawler::new(config, Arc::new(fetcher))?;
    Ok(crawler.run().await)
}
