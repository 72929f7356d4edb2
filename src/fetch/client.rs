// src/fetch/client.rs
// =============================================================================
// This module fetches one URL with a bounded number of attempts.
//
// How it works:
// 1. Check the URL can be fetched at all (parseable, http or https)
// 2. Send a GET; a 2xx answer means success and the body is read fully
// 3. A network error or non-2xx status is retried after a jittered pause
// 4. When the attempts run out, report "not downloaded" to the caller
//
// The caller decides what a failure means: the seed page aborts the crawl,
// any other page simply contributes no links.
//
// Rust concepts:
// - async/await: the backoff sleep yields instead of blocking the thread
// - Ownership: reading the body consumes the response, so the connection is
//   released exactly once on every path (including early returns)
// =============================================================================

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RetryPolicy;
use crate::error::CrawlError;

// One URL plus the number of the attempt being made (0-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub attempt: u32,
}

impl CrawlTarget {
    pub fn new(url: Url) -> Self {
        Self { url, attempt: 0 }
    }

    // Consumes the target and hands back the same URL, one attempt later
    pub fn next_attempt(self) -> Self {
        Self {
            url: self.url,
            attempt: self.attempt + 1,
        }
    }
}

// Downloads pages, retrying transient failures
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    // Builds the HTTP client once; it is reused for every request
    // (reqwest pools connections internally)
    pub fn new(retry: RetryPolicy, timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(timeout)                                   // per-request limit
            .redirect(reqwest::redirect::Policy::limited(5))    // follow up to 5 redirects
            .build()
            .map_err(CrawlError::HttpClient)?;

        Ok(Self { client, retry })
    }

    // Returns the decoded body of `url`, or the reason it could not be loaded
    //
    // Errors:
    //   InvalidUrl     - the URL can never be fetched; no request is made
    //   NotDownloaded  - every attempt failed; wraps the last failure
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        // A policy of 0 attempts still makes one request
        let max_attempts = self.retry.max_attempts.max(1);

        // The ? returns InvalidUrl right away: retrying would not help
        let mut target = CrawlTarget::new(fetchable_url(url)?);

        loop {
            match self.attempt(&target).await {
                // Got the page
                Ok(body) => {
                    info!(url = %target.url, bytes = body.len(), "loaded");
                    return Ok(body);
                }

                // Failed, but attempts are left: pause, then go around again
                Err(err) if err.is_retryable() && target.attempt + 1 < max_attempts => {
                    let delay = self.retry.delay();
                    warn!(
                        url = %target.url,
                        attempt = target.attempt + 1,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "error loading"
                    );
                    tokio::time::sleep(delay).await;
                    target = target.next_attempt();
                }

                // Failed on the last attempt: no more sleeping, give up
                Err(err) if err.is_retryable() => {
                    warn!(url = %target.url, attempts = max_attempts, error = %err, "not downloaded");
                    return Err(CrawlError::NotDownloaded {
                        url: url.to_string(),
                        attempts: max_attempts,
                        source: Box::new(err),
                    });
                }

                // Anything else is not worth another try
                Err(err) => return Err(err),
            }
        }
    }

    // A single GET; the response is either consumed by the body read or
    // dropped on the error path
    async fn attempt(&self, target: &CrawlTarget) -> Result<String, CrawlError> {
        debug!(url = %target.url, attempt = target.attempt, "requesting");

        // send() fails for connection problems, DNS errors, timeouts...
        let response = self
            .client
            .get(target.url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Transport {
                url: target.url.to_string(),
                source,
            })?;

        // Anything outside 200-299 counts as a failed attempt
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                url: target.url.to_string(),
                status: status.as_u16(),
            });
        }

        // text() decodes with the charset from Content-Type (UTF-8 when none
        // is given) and replaces bytes that don't decode instead of failing
        let body = response
            .text()
            .await
            .map_err(|source| CrawlError::Transport {
                url: target.url.to_string(),
                source,
            })?;

        Ok(body)
    }
}

// Only absolute http(s) URLs are worth a request
fn fetchable_url(url: &str) -> Result<Url, CrawlError> {
    // Relative hrefs like "page.html" fail here: there is no base to join with
    let parsed = Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // javascript:, tel:, ftp: and friends parse fine but can't be fetched
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a match guard?
//    - `Err(err) if condition => ...` only matches when the condition holds
//    - Arms are tried top to bottom, so the "attempts left" arm wins first
//
// 2. Why does the loop own `target`?
//    - next_attempt() takes self by value and returns a new CrawlTarget
//    - Reassigning `target` moves the URL along without cloning it
//
// 3. Why tokio::time::sleep and not std::thread::sleep?
//    - std's sleep blocks the whole thread, stalling every other task on it
//    - tokio's sleep only pauses this future; other fetches keep running
// -----------------------------------------------------------------------------
