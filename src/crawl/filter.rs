// src/crawl/filter.rs
// =============================================================================
// Decides which discovered links are followed in the second phase.
//
// - selected: allow-list; when non-empty, only exact matches are followed
// - excluded: deny-list; exact matches are never followed
//
// Exclusion wins over selection. Filtering only gates *expansion*: an
// excluded href is still part of the final result.
// =============================================================================

use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    selected: HashSet<String>,
    excluded: HashSet<String>,
}

impl FilterPolicy {
    pub fn new<S, E>(selected: S, excluded: E) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            selected: selected.into_iter().map(Into::into).collect(),
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_to_expand(&self, href: &str) -> bool {
        if self.excluded.contains(href) {
            return false;
        }
        self.selected.is_empty() || self.selected.contains(href)
    }

    // No allow-list and no deny-list
    pub fn is_unrestricted(&self) -> bool {
        self.selected.is_empty() && self.excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_beats_selection() {
        let policy = FilterPolicy::new(["/a", "/b"], ["/a"]);
        assert!(!policy.allowed_to_expand("/a"));
        assert!(policy.allowed_to_expand("/b"));
    }

    #[test]
    fn test_empty_policy_allows_everything() {
        let policy = FilterPolicy::default();
        assert!(policy.is_unrestricted());
        assert!(policy.allowed_to_expand("/a"));
        assert!(policy.allowed_to_expand("https://other.example/x"));
    }

    #[test]
    fn test_selection_is_an_allow_list() {
        let policy = FilterPolicy::new(["/docs"], Vec::<String>::new());
        assert!(policy.allowed_to_expand("/docs"));
        assert!(!policy.allowed_to_expand("/blog"));
        // exact match only, no prefix matching
        assert!(!policy.allowed_to_expand("/docs/intro"));
    }

    #[test]
    fn test_exclusion_alone() {
        let policy = FilterPolicy::new(Vec::<String>::new(), ["/private"]);
        assert!(!policy.allowed_to_expand("/private"));
        assert!(policy.allowed_to_expand("/public"));
    }
}
