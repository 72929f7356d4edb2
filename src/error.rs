// src/error.rs
// =============================================================================
// The error type for everything the crawl engine can report.
//
// There is no parse error: bodies are decoded lossily and html5ever repairs
// any markup, so every downloaded page yields a document.
//
// Every failure is a value returned to the caller, never a process exit.
// The engine decides per error whether it aborts the run (seed page,
// configuration) or only means "this page gave us zero links".
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[source]: chains the underlying cause so it shows up in error reports
// - Box<T>: lets an enum variant hold another value of the same enum
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Missing or invalid seed URL, or another bad configuration value
    #[error("{0}")]
    Config(String),

    /// The HTTP client itself could not be built
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// An href that cannot be fetched at all (relative without a leading
    /// slash, unparseable, or not http/https)
    #[error("cannot fetch '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network-level failure: connect, timeout, or reading the body
    #[error("error get {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Every attempt failed; wraps the last attempt's error
    #[error("not downloaded {url} after {attempts} attempt(s)")]
    NotDownloaded {
        url: String,
        attempts: u32,
        #[source]
        source: Box<CrawlError>,
    },
}

impl CrawlError {
    // The message used when no seed URL was supplied at all
    pub fn missing_seed() -> Self {
        CrawlError::Config("no site url found".to_string())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, CrawlError::Config(_))
    }

    // Whether another attempt at the same URL could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlError::Transport { .. } | CrawlError::HttpStatus { .. }
        )
    }
}
