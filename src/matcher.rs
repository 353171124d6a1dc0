// Resolves extracted keywords or product codes against a catalog snapshot.
use crate::model::CatalogEntry;
use crate::normalizer::normalize;
use std::collections::HashSet;

/// Trait defining the two catalog lookup paths.
pub trait Matcher {
    /// Containment match: an entry is kept when any normalized keyword occurs
    /// inside its normalized display name. An empty keyword list matches nothing.
    fn match_by_keywords(&self, keywords: &[String], catalog: &[CatalogEntry]) -> Vec<CatalogEntry>;
    /// Exact, case-sensitive equality on `code`.
    fn match_by_codes(&self, codes: &HashSet<String>, catalog: &[CatalogEntry]) -> Vec<CatalogEntry>;
}

pub struct CatalogMatcher;

impl CatalogMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for CatalogMatcher {
    fn match_by_keywords(&self, keywords: &[String], catalog: &[CatalogEntry]) -> Vec<CatalogEntry> {
        if keywords.is_empty() {
            return Vec::new();
        }
        let needles: Vec<String> = keywords.iter().map(|k| normalize(k)).collect();

        catalog
            .iter()
            .filter(|entry| {
                let name = normalize(&entry.display_name);
                needles.iter().any(|needle| name.contains(needle.as_str()))
            })
            .cloned()
            .collect()
    }

    fn match_by_codes(&self, codes: &HashSet<String>, catalog: &[CatalogEntry]) -> Vec<CatalogEntry> {
        if codes.is_empty() {
            return Vec::new();
        }
        catalog
            .iter()
            .filter(|entry| codes.contains(&entry.code))
            .cloned()
            .collect()
    }
}
