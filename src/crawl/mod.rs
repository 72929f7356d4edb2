// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a site.
//
// Features:
// - Fetch and parse the seed page
// - Follow each of its links exactly one hop, gated by a filter policy
// - Collect every distinct href, optionally with where it was found
// - Normalize root-relative hrefs against the seed's origin
//
// Submodules:
// - engine: the two-phase crawl
// - links: LinkSet and Provenance
// - filter: allow-list / deny-list for expansion
// - assemble: href normalization and the final link list
// =============================================================================

mod assemble;
mod engine;
mod filter;
mod links;

pub use engine::{CrawlReport, Crawler};
pub use filter::FilterPolicy;
pub use links::{LinkSet, Provenance};
