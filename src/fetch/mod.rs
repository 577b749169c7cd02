// src/fetch/mod.rs
// =============================================================================
// This module is the crawler's only door to the network.
//
// Submodules:
// - http: the PageFetcher trait and its reqwest-backed implementation
//
// The crawl engine only ever talks to the PageFetcher trait, so tests can
// swap the real HTTP client for an in-memory site.
// =============================================================================

mod http;

pub use http::{FetchError, HttpFetcher, Page, PageFetcher};
