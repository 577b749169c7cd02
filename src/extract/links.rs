// src/extract/links.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We deliberately do NOT build a DOM here. Instead we scan the markup for
// `href="..."` attributes with regular expressions (the `regex` crate):
// - relative links: values starting with `/` made of path-safe characters
// - absolute links: `http://` or `https://` values, optionally restricted
//   to one host and its subdomains
//
// The trade-off: malformed markup can make us under- or over-match. That is a
// known limitation of pattern matching, not something the crawler corrects.
//
// Both extractors are pure: same input, same output, same order, duplicates
// kept. They never fail; "nothing matched" is just an empty Vec.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// Matches href="/some/path" where the path is letters, digits or -_./
// Capture group 1 is the path itself.
static RELATIVE_HREF: Lazy<Regex> = Lazy::new(|| {
    // The pattern is a constant, so failing to compile it is a programmer error
    Regex::new(r#"href="(/[-A-Za-z0-9_/.]+)""#).expect("relative href pattern is valid")
});

// Host pattern used when the caller does not restrict absolute links to a
// domain. Accepts an optional port so local test servers still match.
const ANY_HOST: &str = r"[A-Za-z0-9.-]+(?::[0-9]+)?";

// Extracts every relative link (an href starting with '/') from `html`
//
// Parameters:
//   html: the raw page content
//
// Returns: the matched paths verbatim, in document order, duplicates kept
//
// Example:
//   html = r#"<a href="/about">About</a><a href="/about">Again</a>"#
//   result = ["/about", "/about"]
pub fn extract_relative_links(html: &str) -> Vec<String> {
    RELATIVE_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

// Extracts every absolute http(s) link from `html`
//
// Parameters:
//   html: the raw page content
//   domain: when Some, only links on that host (or a subdomain of it) are kept
//
// Returns: the matched URLs verbatim, in document order, duplicates kept
//
// This compiles a fresh pattern on every call. The crawl engine builds one
// AbsoluteLinkMatcher up front and reuses it instead.
pub fn extract_absolute_links(html: &str, domain: Option<&str>) -> Vec<String> {
    match AbsoluteLinkMatcher::new(domain) {
        Ok(matcher) => matcher.extract(html),
        Err(_) => Vec::new(),
    }
}

/// A compiled absolute-link pattern for one domain filter.
///
/// The domain is regex-escaped before it is spliced into the pattern, so a
/// filter of `monzo.com` only ever matches a literal `monzo.com` host, never
/// `monzoXcom`.
#[derive(Debug, Clone)]
pub struct AbsoluteLinkMatcher {
    pattern: Regex,
}

impl AbsoluteLinkMatcher {
    /// Builds the matcher. `None` accepts any host.
    pub fn new(domain: Option<&str>) -> Result<Self, regex::Error> {
        let host = match domain {
            Some(domain) => regex::escape(domain),
            None => ANY_HOST.to_string(),
        };

        // scheme, zero or more subdomain labels, the host, then either the
        // closing quote or a path/query/fragment that stops at whitespace.
        // Labels are host characters only, so a '?' or '#' before the domain
        // can't pass an unrelated host off as ours.
        let pattern =
            format!(r#"href="(https?://(?:[A-Za-z0-9-]+\.)*{host}(?:[/?#][^\s"]*)?)""#);

        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Runs the pattern over `html`.
    pub fn extract(&self, html: &str) -> Vec<String> {
        self.pattern
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Lazy?
//    - once_cell::sync::Lazy runs its closure the first time it is used
//    - After that every thread shares the same compiled Regex
//    - Compiling a regex is far more expensive than running it
//
// 2. Why r#"..."# strings?
//    - Raw strings don't process escapes, and the # lets us put " inside
//    - Handy for regexes that contain both backslashes and quotes
//
// 3. What does captures_iter do?
//    - Yields one set of capture groups per non-overlapping match
//    - Group 0 is the whole match, group 1 is the part in the first (...)
//    - Matches come out left to right, which keeps document order
// -----------------------------------------------------------------------------
