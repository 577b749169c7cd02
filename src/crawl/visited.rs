// src/crawl/visited.rs
// =============================================================================
// The set of URLs this crawl has claimed.
//
// Every worker shares one VisitedSet. Claiming is a single atomic
// check-and-insert on the owning shard of a DashMap, so two workers that
// discover the same link at the same time can never both win.
//
// Each entry is a flag:
//   true  = claimed, and either in flight or successfully handled
//   false = claimed, but the fetch failed (retracted)
// A retracted URL stays in the map so it is not claimed and fetched again
// during the same run; it just stops reporting as handled.
// =============================================================================

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashMap<String, bool>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for this crawl.
    ///
    /// Returns true if the caller now owns crawling it, false if some task
    /// already claimed it (even if that claim was later retracted).
    pub fn try_claim(&self, url: &str) -> bool {
        match self.urls.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(true);
                true
            }
        }
    }

    /// Marks a claimed URL as not handled after its fetch failed.
    /// Unknown URLs are left alone.
    pub fn retract(&self, url: &str) {
        if let Some(mut handled) = self.urls.get_mut(url) {
            *handled = false;
        }
    }

    /// True if `url` is claimed and has not been retracted.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.get(url).map(|handled| *handled).unwrap_or(false)
    }

    /// Number of URLs currently reported as handled.
    pub fn len(&self) -> usize {
        self.urls.iter().filter(|entry| *entry.value()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handled URLs, in no particular order.
    pub fn urls(&self) -> Vec<String> {
        self.urls
            .iter()
            .filter(|entry| *entry.value())
            .map(|entry| entry.key().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_claim_once() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("https://monzo.com/b"));
        assert!(!visited.try_claim("https://monzo.com/b"));
        assert!(visited.contains("https://monzo.com/b"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_retract_hides_but_does_not_release() {
        let visited = VisitedSet::new();
        visited.try_claim("https://monzo.com/c");
        visited.retract("https://monzo.com/c");

        assert!(!visited.contains("https://monzo.com/c"));
        assert!(visited.is_empty());
        // No retry within the same run
        assert!(!visited.try_claim("https://monzo.com/c"));
    }

    #[test]
    fn test_retract_unknown_url_is_a_no_op() {
        let visited = VisitedSet::new();
        visited.retract("https://monzo.com/never");
        assert!(!visited.contains("https://monzo.com/never"));
        assert!(visited.try_claim("https://monzo.com/never"));
    }

    #[test]
    fn test_exact_string_identity() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("https://monzo.com/about"));
        assert!(visited.try_claim("https://monzo.com/about/"));
        assert!(visited.try_claim("https://MONZO.com/about"));
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let visited = Arc::new(VisitedSet::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = Arc::clone(&visited);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| visited.try_claim(&format!("https://monzo.com/{}", i)))
                        .count()
                })
            })
            .collect();

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(wins, 100);
        assert_eq!(visited.len(), 100);
    }
}
