// src/crawl/sitemap.rs
// =============================================================================
// The crawl's output: each crawled page and the links found on it.
//
// Children are stored exactly as extracted (relative links first, then
// absolute, duplicates kept). Each parent is written once; the visited set
// already guarantees two tasks never crawl the same page.
// =============================================================================

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Sitemap {
    edges: DashMap<String, Vec<String>>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the children of `parent`. An existing entry is never replaced;
    /// returns false if `parent` was already recorded.
    pub fn record(&self, parent: &str, children: Vec<String>) -> bool {
        match self.edges.entry(parent.to_string()) {
            Entry::Occupied(_) => {
                tracing::warn!(parent, "sitemap entry recorded twice, keeping the first");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(children);
                true
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<Vec<String>> {
        self.edges.get(url).map(|children| children.value().clone())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.edges.contains_key(url)
    }

    /// Visits every entry, in no particular order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[String]),
    {
        for entry in self.edges.iter() {
            f(entry.key(), entry.value());
        }
    }

    /// A snapshot ordered by parent URL, for stable reports.
    pub fn sorted(&self) -> BTreeMap<String, Vec<String>> {
        let mut sorted = BTreeMap::new();
        self.for_each(|parent, children| {
            sorted.insert(parent.to_string(), children.to_vec());
        });
        sorted
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl Serialize for Sitemap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (parent, children) in &sorted {
            map.serialize_entry(parent, children)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let sitemap = Sitemap::new();
        let children = vec![
            "https://monzo.com/b".to_string(),
            "https://monzo.com/b".to_string(),
        ];
        assert!(sitemap.record("https://monzo.com", children.clone()));
        assert_eq!(sitemap.get("https://monzo.com"), Some(children));
        assert_eq!(sitemap.get("https://monzo.com/b"), None);
    }

    #[test]
    fn test_first_record_wins() {
        let sitemap = Sitemap::new();
        assert!(sitemap.record("https://monzo.com", vec!["/a".into()]));
        assert!(!sitemap.record("https://monzo.com", vec!["/b".into()]));
        assert_eq!(sitemap.get("https://monzo.com"), Some(vec!["/a".to_string()]));
    }

    #[test]
    fn test_empty_children_is_still_an_entry() {
        let sitemap = Sitemap::new();
        sitemap.record("https://monzo.com/leaf", Vec::new());
        assert!(sitemap.contains("https://monzo.com/leaf"));
        assert_eq!(sitemap.get("https://monzo.com/leaf"), Some(Vec::new()));
    }

    #[test]
    fn test_for_each_visits_everything() {
        let sitemap = Sitemap::new();
        sitemap.record("https://monzo.com/a", vec!["x".into()]);
        sitemap.record("https://monzo.com/b", vec!["y".into(), "z".into()]);

        let mut total_children = 0;
        let mut parents = 0;
        sitemap.for_each(|_, children| {
            parents += 1;
            total_children += children.len();
        });
        assert_eq!((parents, total_children), (2, 3));
    }

    #[test]
    fn test_serializes_sorted() {
        let sitemap = Sitemap::new();
        sitemap.record("https://monzo.com/b", vec![]);
        sitemap.record("https://monzo.com/a", vec!["https://monzo.com/b".into()]);

        let json = serde_json::to_string(&sitemap).unwrap();
        assert_eq!(
            json,
            r#"{"https://monzo.com/a":["https://monzo.com/b"],"https://monzo.com/b":[]}"#
        );
    }
}
