// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The flags map one-to-one onto CrawlConfig; anything left out keeps the
// crawler's default.
// =============================================================================

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::crawl::{
    CrawlConfig, CrawlError, DEFAULT_FETCH_TIMEOUT, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "site-mapper",
    version,
    about = "Crawls every page of one website and prints its sitemap",
    long_about = "site-mapper starts from a seed URL, follows every link that stays on the same \
                  host (subdomains included), fetches each page at most once, and prints the \
                  map of pages to the links found on them."
)]
pub struct Cli {
    /// Page to start from (e.g., https://monzo.com)
    ///
    /// Must be an absolute URL with a host
    pub seed_url: String,

    /// Log every page as it is crawled, plus timing statistics at the end
    #[arg(short, long)]
    pub verbose: bool,

    /// How to print the sitemap
    #[arg(long, value_enum, default_value_t = PrintMode::Flattest)]
    pub print_mode: PrintMode,

    /// Only follow absolute links on this host (defaults to the seed's host)
    #[arg(long)]
    pub domain: Option<String>,

    /// URL suffixes that are never fetched, comma separated
    ///
    /// Defaults to pdf,png,jpeg
    #[arg(long, value_delimiter = ',')]
    pub ignore_suffix: Vec<String>,

    /// Capacity of the queue of pages waiting to be fetched
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Number of pages fetched concurrently
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}

/// Output formats for the finished sitemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintMode {
    /// Crawled URLs only, one per line
    #[value(alias = "mode1")]
    Flattest,
    /// Each crawled URL followed by its children, indented
    #[value(alias = "mode2")]
    Flat,
    /// Sitemap, failures and timings as JSON
    Json,
}

impl Cli {
    /// Validates the seed and builds the crawl settings.
    pub fn crawl_config(&self) -> Result<CrawlConfig, CrawlError> {
        let mut config = CrawlConfig::new(&self.seed_url)?
            .with_queue_capacity(self.queue_capacity)
            .with_workers(self.workers)
            .with_fetch_timeout(Duration::from_secs(self.timeout));

        if let Some(domain) = &self.domain {
            config = config.with_domain(domain.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        if !self.ignore_suffix.is_empty() {
            config = config.with_ignored_suffixes(self.ignore_suffix.iter().cloned());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-mapper", "https://monzo.com"]).unwrap();
        assert_eq!(cli.print_mode, PrintMode::Flattest);
        assert!(!cli.verbose);

        let config = cli.crawl_config().unwrap();
        assert_eq!(config.seed(), "https://monzo.com");
        assert_eq!(config.domain(), "monzo.com");
        assert_eq!(config.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.ignored_suffixes(), ["pdf", "png", "jpeg"]);
    }

    #[test]
    fn test_print_mode_aliases() {
        let cli = Cli::try_parse_from(["site-mapper", "--print-mode", "mode2", "https://monzo.com"])
            .unwrap();
        assert_eq!(cli.print_mode, PrintMode::Flat);

        let cli = Cli::try_parse_from(["site-mapper", "--print-mode", "mode1", "https://monzo.com"])
            .unwrap();
        assert_eq!(cli.print_mode, PrintMode::Flattest);
    }

    #[test]
    fn test_unknown_print_mode_is_rejected() {
        let result = Cli::try_parse_from(["site-mapper", "--print-mode", "tree", "https://monzo.com"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_reach_config() {
        let cli = Cli::try_parse_from([
            "site-mapper",
            "-v",
            "--domain",
            "web.monzo.com",
            "--ignore-suffix",
            "zip,gif",
            "--workers",
            "2",
            "--timeout",
            "3",
            "https://monzo.com",
        ])
        .unwrap();
        assert!(cli.verbose);

        let config = cli.crawl_config().unwrap();
        assert_eq!(config.domain(), "web.monzo.com");
        assert_eq!(config.ignored_suffixes(), ["zip", "gif"]);
        assert_eq!(config.workers(), 2);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_bad_seed_is_a_config_error() {
        let cli = Cli::try_parse_from(["site-mapper", "hello"]).unwrap();
        assert!(matches!(cli.crawl_config(), Err(CrawlError::InvalidSeedUrl(_))));
    }
}
