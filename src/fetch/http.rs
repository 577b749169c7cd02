// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - The PageFetcher trait: "give me the status and body for this URL"
// - HttpFetcher: the reqwest implementation used by the CLI
// - Sorting reqwest failures into timeouts, redirect loops, connection
//   problems and everything else
//
// What the crawl engine does with a Page (status >= 300 means failure) is
// not decided here. The fetcher only reports what the server said.
//
// Rust concepts:
// - Traits: PageFetcher is an interface with several implementations
// - async-trait: async methods on a trait we can put behind Arc<dyn ...>
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// What the server answered for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// HTTP status code of the final response (after redirects)
    pub status: u16,
    /// Raw body bytes, not yet decoded
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Anything at or above 300 is not a page we can crawl.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Why a fetch produced no Page.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    /// The response arrived but its body could not be read.
    #[error("could not read response body: {0}")]
    Body(String),
}

/// The boundary between the crawl engine and the network.
///
/// Implementations must be shareable between worker tasks.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// reqwest-backed fetcher. One client (and its connection pool) is shared by
/// every worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Creates a fetcher with a per-request timeout
    //
    // Parameters:
    //   timeout: upper bound for one request, body included
    //   user_agent: sent with every request
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();

        // Error pages are never crawled, so don't bother downloading them
        if status >= 300 {
            return Ok(Page::new(status, Vec::new()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(Page::new(status, body.to_vec()))
    }
}

// Categorizes reqwest errors into FetchError variants
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure or refused connection
// - Too many redirects
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5), "site-mapper-test").unwrap()
    }

    #[test]
    fn test_page_success_boundary() {
        assert!(Page::new(200, "ok").is_success());
        assert!(Page::new(299, "").is_success());
        assert!(!Page::new(301, "").is_success());
        assert!(!Page::new(404, "").is_success());
    }

    #[tokio::test]
    async fn test_fetch_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let page = fetcher()
            .fetch(&format!("{}/hello", server.uri()))
            .await
            .unwrap();
        assert_eq!(page, Page::new(200, "<p>hi</p>"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_a_page_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let page = fetcher()
            .fetch(&format!("{}/nope", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.status, 404);
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(200), "site-mapper-test").unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is essentially never listening on localhost
        let err = fetcher().fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_) | FetchError::Request(_)));
    }
}
