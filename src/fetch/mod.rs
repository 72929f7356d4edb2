// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - client: the Fetcher (HTTP GET with bounded retries and jittered backoff)
//
// Rust concepts:
// - pub use: re-export so callers write `fetch::Fetcher`
// =============================================================================

mod client;

pub use client::Fetcher;
