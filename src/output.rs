// src/output.rs
// =============================================================================
// Formatting and saving crawl results.
//
// The engine returns a CrawlReport; this module only turns it into text:
// - plain: one link per line
// - provenance: "<href> from <page>" lines
// - json: the whole report, pretty-printed
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

use crate::crawl::{CrawlReport, Provenance};

pub fn render_plain(links: &[String]) -> String {
    // collect() into a String concatenates the lines
    links.iter().map(|link| format!("{}\n", link)).collect()
}

pub fn render_provenance(provenance: &Provenance) -> String {
    provenance
        .pairs()
        .map(|(source, href)| format!("{} from {}\n", href, source))
        .collect()
}

pub fn render_json(report: &CrawlReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize crawl report")
}

pub fn write_links(path: &Path, links: &[String]) -> Result<()> {
    // Creates the file or replaces its contents; with_context names the path
    std::fs::write(path, render_plain(links))
        .with_context(|| format!("failed to write links to {}", path.display()))
}
