// src/lib.rs
// =============================================================================
// site-mapper: a same-domain concurrent web crawler.
//
// The binary in main.rs is a thin shell around this library:
// - crawl:   the engine (visited set, frontier, completion tracking, sitemap)
// - extract: pattern-based link extraction
// - fetch:   the PageFetcher boundary and its HTTP implementation
// - cli, logging, report: the command-line surface
// =============================================================================

pub mod cli;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod report;
