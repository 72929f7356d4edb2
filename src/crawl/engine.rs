// src/crawl/engine.rs
// =============================================================================
// This module runs a crawl: the seed page, then one hop.
//
// How it works:
// 1. Validate the seed URL (the only precondition)
// 2. Fetch and parse the seed page, collect its links
// 3. Freeze that list; follow each link that passes the filter policy,
//    folding whatever those pages link to into the same LinkSet
// 4. Normalize every collected href and return them
//
// Links found during step 3 are collected but never followed themselves.
//
// Failure policy:
// - Seed page cannot be fetched -> the run fails
// - Any other page cannot be fetched -> it adds zero links
//
// Rust concepts:
// - Streams: `buffered(n)` keeps up to n page loads in flight but yields
//   results in input order, so the outcome never depends on timing
// - Single writer: only this task ever mutates the LinkSet
// =============================================================================

use futures::stream::{self, StreamExt};
use scraper::Html;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::assemble::{assemble, normalize, origin_of};
use super::links::{LinkSet, Provenance};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::extract::{extract_links, is_navigable, parse_page};
use crate::fetch::Fetcher;

// What a finished crawl hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// The seed URL as supplied
    pub seed: String,
    /// Every distinct link found, made absolute where it started with "/"
    pub links: Vec<String>,
    /// Where each link was first found (only when tracking was enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    /// Pages downloaded and parsed successfully, seed included
    pub pages_fetched: usize,
    /// Second-phase pages that contributed nothing because they failed
    pub pages_failed: usize,
    /// Seed links not followed because of the filter policy
    pub pages_skipped: usize,
}

// Per-run accumulator; lives exactly as long as one `run` call
struct CrawlState {
    links: LinkSet,
    provenance: Option<Provenance>,
}

impl CrawlState {
    fn new(track_provenance: bool) -> Self {
        Self {
            links: LinkSet::new(),
            provenance: track_provenance.then(Provenance::new),
        }
    }

    // Folds one parsed page into the set, attributing new hrefs to `source`
    fn absorb(&mut self, source: &str, document: &Html) -> usize {
        let added = extract_links(document, &mut self.links);
        if let Some(provenance) = self.provenance.as_mut() {
            for href in &added {
                provenance.record(source, href);
            }
        }
        added.len()
    }
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(config.retry.clone(), config.request_timeout)?;
        Ok(Self { config, fetcher })
    }

    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        // Stray whitespace from env vars or shell quoting is not part of the URL
        let seed = self.config.seed_url.trim();

        // "https://example.com" - what root-relative hrefs get glued onto
        let origin = origin_of(&validate_seed(seed)?);

        info!(
            seed,
            concurrency = self.config.concurrency,
            filtered = !self.config.filter.is_unrestricted(),
            "started"
        );

        let mut state = CrawlState::new(self.config.track_provenance);

        // Phase one: the seed page; any failure here ends the run
        let document = self.load_page(seed).await?;
        let found = state.absorb(seed, &document);
        drop(document); // the tree is no longer needed once its links are out
        if state.links.is_empty() {
            info!(url = seed, "seed page has no links to follow");
        } else {
            info!(url = seed, found, "seed page parsed");
        }

        // Phase two: follow the seed's links, one hop only
        // The snapshot is a copy, so links added below are never expanded
        let snapshot = state.links.snapshot();
        debug!(candidates = state.links.len(), "expanding seed links");
        let mut targets = Vec::with_capacity(snapshot.len());
        let mut pages_skipped = 0;
        for href in &snapshot {
            // Filtered links stay in the result; they just aren't fetched
            if !self.config.filter.allowed_to_expand(href) || !is_navigable(href) {
                debug!(href = %href, "not expanding");
                pages_skipped += 1;
                continue;
            }
            // "/about" -> "https://example.com/about"
            targets.push(normalize(href, &origin));
        }

        let mut pages_fetched = 1; // the seed
        let mut pages_failed = 0;

        // Each target becomes a future that loads one page; buffered() runs
        // up to `concurrency` of them at once and yields them in target order
        let mut pages = stream::iter(targets)
            .map(|url| async move {
                let result = self.load_page(&url).await;
                (url, result)
            })
            .buffered(self.config.concurrency.max(1));

        // Only this loop touches `state`, one page at a time
        while let Some((url, result)) = pages.next().await {
            match result {
                Ok(document) => {
                    pages_fetched += 1;
                    let found = state.absorb(&url, &document);
                    debug!(url = %url, found, "page parsed");
                }
                Err(err) => {
                    pages_failed += 1;
                    warn!(url = %url, error = %err, "page skipped, no links taken from it");
                }
            }
        }

        // Every raw href, made absolute where it started with "/"
        let links = assemble(&state.links, &origin);
        info!(
            links = links.len(),
            pages_fetched, pages_failed, pages_skipped, "finished"
        );

        Ok(CrawlReport {
            seed: seed.to_string(),
            links,
            provenance: state.provenance,
            pages_fetched,
            pages_failed,
            pages_skipped,
        })
    }

    // Download (with retries) and parse one page
    async fn load_page(&self, url: &str) -> Result<Html, CrawlError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(parse_page(url, &body))
    }
}

// The seed must be a fetchable http(s) URL with a host to build absolute
// links from; anything else is a configuration mistake, not a network one
fn validate_seed(seed: &str) -> Result<Url, CrawlError> {
    if seed.is_empty() {
        return Err(CrawlError::missing_seed());
    }

    let url = Url::parse(seed)
        .map_err(|e| CrawlError::Config(format!("invalid site url '{}': {}", seed, e)))?;

    // ftp://, file:// and the like would only fail later, at fetch time
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::Config(format!(
            "site url must be http or https: {}",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(CrawlError::Config(format!(
            "site url has no host: {}",
            seed
        )));
    }

    Ok(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `async move` inside the map closure?
//    - Each page load becomes its own future that owns its `url` String
//    - `self` is a shared reference, so every future can borrow the fetcher
//
// 2. buffered vs buffer_unordered:
//    - buffer_unordered yields whichever future finishes first
//    - buffered yields in the order the futures were created
//    - Both keep at most n futures running at once
//
// 3. What does `bool::then` do?
//    - true.then(f) is Some(f()), false.then(f) is None
//    - Handy for "build this only if the option is on"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::crawl::FilterPolicy;
    use std::collections::HashSet;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(seed: &str) -> CrawlConfig {
        CrawlConfig::new(seed).with_retry(RetryPolicy::immediate(3))
    }

    async fn page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn as_set(links: &[String]) -> HashSet<&str> {
        links.iter().map(String::as_str).collect()
    }

    const SEED_PAGE: &str = r##"
        <html><body>
          <a href="/a">A</a>
          <a href="#top">Top</a>
          <a href="mailto:x@y.com">Mail</a>
          <a href="EXT/b">B</a>
        </body></html>
    "##;

    // The external link points back at the mock server under a second path
    async fn seeded_server() -> (MockServer, String) {
        let server = MockServer::start().await;
        let external = format!("{}/ext/b", server.uri());
        page(&server, "/", &SEED_PAGE.replace("EXT/b", &external)).await;
        (server, external)
    }

    #[test]
    fn test_missing_seed_is_config_error() {
        let err = validate_seed("").unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "no site url found");
    }

    #[test]
    fn test_seed_without_host_is_config_error() {
        assert!(validate_seed("mailto:x@y.com").unwrap_err().is_config());
        assert!(validate_seed("not a url").unwrap_err().is_config());
    }

    #[test]
    fn test_seed_must_be_http() {
        let err = validate_seed("ftp://files.example/").unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "site url must be http or https: ftp://files.example/");
        assert!(validate_seed("http://example.com").is_ok());
        assert!(validate_seed("https://example.com/path").is_ok());
    }

    #[tokio::test]
    async fn test_run_rejects_ftp_seed_without_fetching() {
        let crawler = Crawler::new(config("ftp://files.example/")).unwrap();
        let err = crawler.run().await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_run_rejects_blank_seed() {
        let crawler = Crawler::new(config("   ")).unwrap();
        let err = crawler.run().await.unwrap_err();
        assert_eq!(err.to_string(), "no site url found");
    }

    #[tokio::test]
    async fn test_seed_and_one_hop() {
        let (server, external) = seeded_server().await;
        page(&server, "/a", "<p>nothing here</p>").await;
        page(&server, "/ext/b", "<p>nothing here</p>").await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();

        let expected_a = format!("{}/a", server.uri());
        assert_eq!(
            as_set(&report.links),
            HashSet::from([expected_a.as_str(), external.as_str()])
        );
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.pages_failed, 0);
    }

    #[tokio::test]
    async fn test_excluded_link_is_kept_but_not_fetched() {
        let (server, _external) = seeded_server().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/deep">x</a>"#))
            .expect(0)
            .mount(&server)
            .await;
        page(&server, "/ext/b", "<p></p>").await;

        let filter = FilterPolicy::new(Vec::<String>::new(), ["/a"]);
        let report = Crawler::new(config(&server.uri()).with_filter(filter))
            .unwrap()
            .run()
            .await
            .unwrap();

        let expected_a = format!("{}/a", server.uri());
        assert!(report.links.contains(&expected_a));
        assert_eq!(report.links.len(), 2);
        assert_eq!(report.pages_skipped, 1);
    }

    #[tokio::test]
    async fn test_selected_restricts_expansion() {
        let (server, external) = seeded_server().await;
        page(&server, "/a", r#"<a href="/from-a">x</a>"#).await;
        Mock::given(method("GET"))
            .and(path("/ext/b"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let filter = FilterPolicy::new(["/a"], Vec::<String>::new());
        let report = Crawler::new(config(&server.uri()).with_filter(filter))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert!(report.links.contains(&external));
        assert!(report.links.contains(&format!("{}/from-a", server.uri())));
        assert_eq!(report.links.len(), 3);
    }

    #[tokio::test]
    async fn test_links_found_in_phase_two_are_not_followed() {
        let server = MockServer::start().await;
        page(&server, "/", r#"<a href="/a">A</a>"#).await;
        page(&server, "/a", r#"<a href="/deeper">D</a>"#).await;
        Mock::given(method("GET"))
            .and(path("/deeper"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.links.len(), 2);
        assert!(report.links.contains(&format!("{}/deeper", server.uri())));
    }

    #[tokio::test]
    async fn test_failing_page_degrades() {
        let server = MockServer::start().await;
        page(&server, "/", r#"<a href="/down">D</a><a href="/up">U</a>"#).await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;
        page(&server, "/up", r#"<a href="/found-on-up">F</a>"#).await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.links.len(), 3);
        assert_eq!(report.pages_failed, 1);
        assert_eq!(report.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_latin1_seed_still_yields_links() {
        let server = MockServer::start().await;
        let mut body = br#"<meta charset="iso-8859-1"><p>Caf"#.to_vec();
        body.push(0xe9); // 'é' in ISO-8859-1, not valid UTF-8 on its own
        body.extend_from_slice(br#"</p><a href="/a">menu</a>"#);
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"),
            )
            .mount(&server)
            .await;
        page(&server, "/a", "<p></p>").await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.links, vec![format!("{}/a", server.uri())]);
        assert_eq!(report.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_unfetchable_href_degrades() {
        let server = MockServer::start().await;
        page(
            &server,
            "/",
            r#"<a href="page.html">P</a><a href="javascript:void(0)">J</a>"#,
        )
        .await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.links, vec!["page.html", "javascript:void(0)"]);
        assert_eq!(report.pages_failed, 2);
        assert_eq!(report.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_seed_transport_failure_aborts() {
        let crawler = Crawler::new(config("http://127.0.0.1:1/")).unwrap();
        let err = crawler.run().await.unwrap_err();
        assert!(matches!(err, CrawlError::NotDownloaded { .. }));
    }

    #[tokio::test]
    async fn test_seed_http_error_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let err = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::NotDownloaded { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_provenance_records_first_source() {
        let server = MockServer::start().await;
        page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
        page(&server, "/a", r#"<a href="/b">B again</a><a href="/c">C</a>"#).await;
        page(&server, "/b", "<p></p>").await;

        let report = Crawler::new(config(&server.uri()).with_provenance(true))
            .unwrap()
            .run()
            .await
            .unwrap();

        let provenance = report.provenance.unwrap();
        let seed = server.uri();
        let page_a = format!("{}/a", server.uri());
        let pairs: Vec<(&str, &str)> = provenance.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (seed.as_str(), "/a"),
                (seed.as_str(), "/b"),
                (page_a.as_str(), "/c"),
            ]
        );
        assert_eq!(pairs.len(), report.links.len());
    }

    #[tokio::test]
    async fn test_provenance_off_by_default() {
        let server = MockServer::start().await;
        page(&server, "/", "<p></p>").await;

        let report = Crawler::new(config(&server.uri()))
            .unwrap()
            .run()
            .await
            .unwrap();
        assert!(report.provenance.is_none());
        assert!(report.links.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_expansion_matches_sequential() {
        let server = MockServer::start().await;
        let seed: String = (0..8).map(|i| format!(r#"<a href="/p{i}">p</a>"#)).collect();
        page(&server, "/", &seed).await;
        for i in 0..8 {
            let body = format!(r#"<a href="/shared">s</a><a href="/only-{i}">o</a>"#);
            page(&server, &format!("/p{i}"), &body).await;
        }

        let sequential = Crawler::new(config(&server.uri()).with_provenance(true))
            .unwrap()
            .run()
            .await
            .unwrap();
        let concurrent = Crawler::new(
            config(&server.uri())
                .with_provenance(true)
                .with_concurrency(4),
        )
        .unwrap()
        .run()
        .await
        .unwrap();

        assert_eq!(sequential.links.len(), 8 + 1 + 8);
        assert_eq!(sequential.links, concurrent.links);
        assert_eq!(sequential.provenance, concurrent.provenance);
    }
}
