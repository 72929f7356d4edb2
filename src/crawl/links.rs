// src/crawl/links.rs
// =============================================================================
// The collections a crawl run accumulates into.
//
// - LinkSet: every distinct href seen so far, in the order first seen
// - Provenance: which page each href was first found on
//
// Both are owned by a single crawl run and dropped when it finishes.
//
// Rust concepts:
// - HashSet: O(1) "have we seen this?" checks
// - Vec alongside the set: keeps a stable, reproducible order
// - BTreeMap: sorted map, so provenance output is deterministic
// =============================================================================

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

// Distinct raw hrefs, keyed by their exact string value
#[derive(Debug, Default, Clone)]
pub struct LinkSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns true if the href was not already present
    pub fn insert(&mut self, href: &str) -> bool {
        // Check first so a duplicate costs no allocation
        if self.seen.contains(href) {
            return false;
        }
        // Two copies: one for lookups, one to remember the order
        self.seen.insert(href.to_string());
        self.order.push(href.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    // A frozen copy of the current members; later inserts don't show up in it
    pub fn snapshot(&self) -> Vec<String> {
        self.order.clone()
    }
}

/// Source page URL -> hrefs first discovered on that page.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    pages: BTreeMap<String, Vec<String>>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &str, href: &str) {
        // entry().or_default() creates the page's list on first use
        self.pages
            .entry(source.to_string())
            .or_default()
            .push(href.to_string());
    }

    // (source, href) pairs, sources sorted, hrefs in discovery order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pages.iter().flat_map(|(source, hrefs)| {
            hrefs
                .iter()
                .map(move |href| (source.as_str(), href.as_str()))
        })
    }
}
