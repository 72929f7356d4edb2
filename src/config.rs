// src/config.rs
// =============================================================================
// The configuration value handed to the crawl engine.
//
// The caller (main.rs, via the CLI) builds one CrawlConfig before the crawl
// starts. The engine only reads it; it never looks at flags or environment
// variables on its own.
//
// Rust concepts:
// - Default trait: one place for the reference defaults
// - Builder-style methods: `with_*` take self by value and return it
// - Duration: typed time spans instead of raw millisecond integers
// =============================================================================

use rand::Rng;
use std::time::Duration;

use crate::crawl::FilterPolicy;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 300;
const DEFAULT_MAX_JITTER_MS: u64 = 999;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// How often a URL is tried and how long to wait between tries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per URL, including the first one
    pub max_attempts: u32,
    /// Fixed part of the pause between attempts
    pub base_delay: Duration,
    /// Upper bound (inclusive) of the random extra pause
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_jitter: Duration::from_millis(DEFAULT_MAX_JITTER_MS),
        }
    }
}

impl RetryPolicy {
    // A policy that retries without sleeping
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    // base + uniform random 0..=max_jitter
    pub fn delay(&self) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        // gen_range(0..=0) is fine, but there's no point touching the RNG
        if jitter_ms == 0 {
            return self.base_delay;
        }
        // ..= makes the upper bound inclusive
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.base_delay + Duration::from_millis(extra)
    }
}

// Everything one crawl run needs to know
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The page the crawl starts from
    pub seed_url: String,
    /// Which discovered links get expanded in the second phase
    pub filter: FilterPolicy,
    pub retry: RetryPolicy,
    /// Record which page each link was first found on
    pub track_provenance: bool,
    /// How many second-phase pages may be in flight at once (1 = sequential)
    pub concurrency: usize,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            filter: FilterPolicy::default(),
            retry: RetryPolicy::default(),
            track_provenance: false,
            concurrency: 1,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_filter(mut self, filter: FilterPolicy) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_provenance(mut self, track: bool) -> Self {
        self.track_provenance = track;
        self
    }

    // Zero would stall the expansion stream, so it is raised to 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
