// src/crawl/config.rs
// =============================================================================
// Settings for one crawl.
//
// A CrawlConfig is validated when it is built (the seed must be an absolute
// URL with a host) and never changes once the crawl starts. Everything else
// has a default and a `with_*` method to override it.
// =============================================================================

use std::time::Duration;
use url::Url;

use super::error::CrawlError;

/// Default bound on the frontier queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of crawl workers
pub const DEFAULT_WORKERS: usize = 8;

/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Binary assets we never fetch
pub const DEFAULT_IGNORED_SUFFIXES: &[&str] = &["pdf", "png", "jpeg"];

pub const DEFAULT_USER_AGENT: &str = concat!("site-mapper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    seed: String,
    base: String,
    domain: String,
    ignored_suffixes: Vec<String>,
    queue_capacity: usize,
    workers: usize,
    fetch_timeout: Duration,
    user_agent: String,
}

impl CrawlConfig {
    // Validates the seed and fills in every default
    //
    // Parameters:
    //   seed: first page to crawl, kept verbatim as its sitemap key
    //
    // Returns: InvalidSeedUrl if the seed has no scheme or no host
    //
    // Example:
    //   seed = "https://monzo.com/abcde"
    //   base = "https://monzo.com", domain = "monzo.com"
    pub fn new(seed: &str) -> Result<Self, CrawlError> {
        let url = Url::parse(seed).map_err(|_| CrawlError::InvalidSeedUrl(seed.to_string()))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(CrawlError::InvalidSeedUrl(seed.to_string())),
        };

        // Keep an explicit port in the domain so local servers filter correctly
        let domain = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            seed: seed.to_string(),
            base: url.origin().ascii_serialization(),
            domain,
            ignored_suffixes: DEFAULT_IGNORED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Restricts absolute links to a different host than the seed's.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_ignored_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// A zero capacity is raised to one; a channel needs room for a URL.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Scheme, host and port of the seed. Relative links are joined onto this.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn ignored_suffixes(&self) -> &[String] {
        &self.ignored_suffixes
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Case-sensitive suffix match against the ignore list
    pub fn is_ignored(&self, url: &str) -> bool {
        self.ignored_suffixes
            .iter()
            .any(|suffix| url.ends_with(suffix.as_str()))
    }

    // Turns a rooted path into an absolute URL on the seed's site
    //
    // Example:
    //   base = "https://monzo.com", path = "/about"
    //   result = "https://monzo.com/about"
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}
