// src/extract/mod.rs
// =============================================================================
// This module turns raw page content into candidate links.
//
// Submodules:
// - links: pattern-based extraction of relative and absolute hrefs
//
// Everything in here is a pure function of its input: no I/O, no shared
// state, so the crawl workers can call it from any thread.
// =============================================================================

mod links;

pub use links::{extract_absolute_links, extract_relative_links, AbsoluteLinkMatcher};
