// src/crawl/error.rs
// =============================================================================
// Errors produced by the crawl engine.
//
// Only InvalidSeedUrl and InvalidDomain stop a crawl, and they do so before
// any page is fetched. FetchFailure and ContentDecodeFailure end a single
// task's branch of the crawl; they are logged and recorded in the report but
// never handed to sibling tasks.
// =============================================================================

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrawlError {
    /// The seed is not an absolute URL with a host.
    #[error("failed to parse seed URL ({0})")]
    InvalidSeedUrl(String),

    /// The domain filter could not be turned into a link pattern.
    #[error("invalid domain filter ({0})")]
    InvalidDomain(String),

    /// Transport error, timeout, or a status code of 300 or above.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// The page arrived but its body could not be read or decoded as text.
    #[error("could not decode content for {url}: {reason}")]
    ContentDecodeFailure { url: String, reason: String },

    /// A task finished that was never started.
    #[error("completion tracker decremented below zero")]
    TrackerUnderflow,
}

impl CrawlError {
    pub(crate) fn fetch(url: &str, error: &FetchError) -> Self {
        match error {
            // A body that can't be read is a content problem, not a transport one
            FetchError::Body(reason) => CrawlError::ContentDecodeFailure {
                url: url.to_string(),
                reason: reason.clone(),
            },
            other => CrawlError::FetchFailure {
                url: url.to_string(),
                reason: other.to_string(),
            },
        }
    }

    pub(crate) fn status(url: &str, status: u16) -> Self {
        CrawlError::FetchFailure {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_errors_are_decode_failures() {
        let err = CrawlError::fetch("https://a.com/x", &FetchError::Body("reset".into()));
        assert!(matches!(err, CrawlError::ContentDecodeFailure { .. }));
    }

    #[test]
    fn test_transport_errors_are_fetch_failures() {
        let err = CrawlError::fetch("https://a.com/x", &FetchError::Timeout);
        assert_eq!(
            err.to_string(),
            "failed to fetch https://a.com/x: request timed out"
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            CrawlError::status("https://a.com/c", 404).to_string(),
            "failed to fetch https://a.com/c: HTTP 404"
        );
    }
}
