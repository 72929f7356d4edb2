// src/extract/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a tree of nodes (built on html5ever)
// - Recovers from malformed markup the way browsers do
//
// The walk is a depth-first, pre-order traversal over every node, so the
// order links are found in matches their order in the document.
//
// Rust concepts:
// - Explicit stack instead of recursion: no depth limit on deep documents
// - Borrowing: the extractor only reads the tree, it never changes it
// =============================================================================

use scraper::{Html, Node};
use tracing::debug;

use crate::crawl::LinkSet;

// Parses an already-decoded page body into a document
//
// html5ever never rejects markup: unclosed tags, stray end tags and the like
// are repaired, and the repairs are listed in `document.errors`.
pub fn parse_page(url: &str, body: &str) -> Html {
    let document = Html::parse_document(body);

    // Only worth a debug line; the tree is usable either way
    if !document.errors.is_empty() {
        debug!(url, recovered = document.errors.len(), "markup errors recovered");
    }

    document
}

// Fragment and mail links never point at another page
pub fn is_navigable(href: &str) -> bool {
    !href.starts_with('#') && !href.starts_with("mailto:")
}

// Adds every navigable anchor href in `document` to `links`
//
// Returns the hrefs that were new to the set, in document order.
//
// Example:
//   <a href="/a">  <a href="#top">  <a href="/a">
//   -> links gains "/a", returns ["/a"]
pub fn extract_links(document: &Html, links: &mut LinkSet) -> Vec<String> {
    let mut added = Vec::new();

    // Start at the document root (not the <html> element) so nothing is missed
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        // Text, comments and doctypes can't carry an href
        if let Node::Element(element) = node.value() {
            // html5ever lowercases tag names, so "A" arrives as "a"
            if element.name() == "a" {
                for (key, value) in element.attrs() {
                    // insert() returns false for hrefs already in the set
                    if key == "href" && is_navigable(value) && links.insert(value) {
                        added.push(value.to_string());
                    }
                }
            }
        }

        // Reversed so the first child is popped next
        stack.extend(node.children().rev());
    }

    added
}
