// src/crawl/assemble.rs
// =============================================================================
// Turns raw hrefs into absolute links.
//
// The rule is deliberately simple: an href starting with "/" gets the seed's
// origin (scheme://host, plus the port when one is given) in front of it;
// everything else is passed through as written.
// =============================================================================

use url::Url;

use super::links::LinkSet;

// scheme://host[:port] of the seed, with no trailing slash
pub fn origin_of(seed: &Url) -> String {
    seed.origin().ascii_serialization()
}

pub fn normalize(href: &str, origin: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        href.to_string()
    }
}

// One normalized entry per LinkSet member, in LinkSet order
pub fn assemble(links: &LinkSet, origin: &str) -> Vec<String> {
    links.iter().map(|href| normalize(href, origin)).collect()
}
