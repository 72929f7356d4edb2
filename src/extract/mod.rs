// src/extract/mod.rs
// =============================================================================
// This module turns downloaded pages into links.
//
// Submodules:
// - html: parses a body into a DOM and collects anchor hrefs
// =============================================================================

mod html;

pub use html::{extract_links, is_navigable, parse_page};
