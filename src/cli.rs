// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every crawl input can come from a flag or from the environment:
//   --url      / URL       the seed page
//   --select   / SELECTED  comma-separated hrefs to follow (allow-list)
//   --exclude  / EXCLUDED  comma-separated hrefs never to follow (deny-list)
//
// The CLI is the only place that knows about flags, env vars and commas;
// it hands the crawl engine a ready-made CrawlConfig.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct
// - Option<String>: a missing seed is passed on and reported by the engine
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{CrawlConfig, RetryPolicy};
use crate::crawl::FilterPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "link-harvest",
    version = "0.1.0",
    about = "Collect every link on a page and on the pages it links to",
    long_about = "link-harvest fetches a seed page, follows each link on it one hop, \
                  and prints the distinct set of links found along the way."
)]
pub struct Cli {
    /// URL of the site, for example https://www.rust-lang.org
    #[arg(long, env = "URL")]
    pub url: Option<String>,

    /// Hrefs to follow, separated by commas (only these are expanded)
    ///
    /// Matched exactly against the href as written on the seed page,
    /// e.g. --select /docs,/blog
    #[arg(long = "select", env = "SELECTED", value_delimiter = ',')]
    pub selected: Vec<String>,

    /// Hrefs never to follow, separated by commas
    ///
    /// Excluded links still appear in the output; they are just not fetched.
    #[arg(long = "exclude", env = "EXCLUDED", value_delimiter = ',')]
    pub excluded: Vec<String>,

    /// Also write the links to this file, one per line
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print a JSON report instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// Show which page each link was first found on
    #[arg(long)]
    pub provenance: bool,

    /// How many pages to fetch at once in the second phase
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Attempts per URL before giving up on it
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Cli {
    // Consumes the parsed arguments; the engine only ever sees the result
    pub fn into_config(self) -> CrawlConfig {
        // clap already split the comma lists for us
        let filter = FilterPolicy::new(non_empty(self.selected), non_empty(self.excluded));
        // Only the attempt count is tunable; the pauses keep their defaults
        let retry = RetryPolicy {
            max_attempts: self.max_attempts,
            ..RetryPolicy::default()
        };

        // A missing --url becomes "" so the engine reports "no site url found"
        CrawlConfig::new(self.url.unwrap_or_default())
            .with_filter(filter)
            .with_retry(retry)
            .with_provenance(self.provenance)
            .with_concurrency(self.concurrency)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
    }
}

// "a,,b" or a trailing comma leaves empty items behind
fn non_empty(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|item| !item.is_empty()).collect()
}
