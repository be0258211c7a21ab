//! Site path index built from a sitemap document.
//!
//! # Sitemap Format
//!
//! ```json
//! { "data": [ { "path": "/en/" }, { "path": "/en/gb/shop/item" } ] }
//! ```
//!
//! Rows may spell the field `Path`. Anything else is ignored.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

use crate::core::is_locale_token;

/// Lookup structure of known site paths.
///
/// Paths are stored exactly as listed in the sitemap. `regions_by_language`
/// is derived from paths whose second segment is a 2-character token and is
/// informational only.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    paths: FxHashSet<String>,
    regions_by_language: FxHashMap<String, BTreeSet<String>>,
}

impl SiteIndex {
    /// Index with no paths. Every lookup misses, so rewriting is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a sitemap document. Malformed documents give an empty index.
    pub fn build(doc: &Value) -> Self {
        let rows = doc.get("data").and_then(Value::as_array);
        Self::from_paths(rows.into_iter().flatten().filter_map(row_path))
    }

    /// Build from a list of paths.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::empty();
        for path in paths {
            index.insert(path.into());
        }
        index
    }

    fn insert(&mut self, path: String) {
        if path.is_empty() {
            return;
        }

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        if let (Some(language), Some(region)) = (segments.next(), segments.next())
            && is_locale_token(region)
        {
            self.regions_by_language
                .entry(language.to_string())
                .or_default()
                .insert(region.to_string());
        }

        self.paths.insert(path);
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Known regions for a language.
    pub fn regions(&self, language: &str) -> Option<&BTreeSet<String>> {
        self.regions_by_language.get(language)
    }

    /// Languages with at least one regional path, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<_> = self.regions_by_language.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Extract the path of a sitemap row (`path`, else `Path`).
fn row_path(row: &Value) -> Option<String> {
    ["path", "Path"]
        .iter()
        .filter_map(|key| row.get(key).and_then(Value::as_str))
        .find(|p| !p.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_paths() {
        let index = SiteIndex::build(&json!({
            "data": [
                { "path": "/en/" },
                { "path": "/en/gb/shop/item" },
                { "Path": "/fr/ca/" },
            ]
        }));

        assert_eq!(index.len(), 3);
        assert!(index.contains("/en/"));
        assert!(index.contains("/en/gb/shop/item"));
        assert!(index.contains("/fr/ca/"));
        assert!(!index.contains("/en"));
    }

    #[test]
    fn test_build_regions() {
        let index = SiteIndex::build(&json!({
            "data": [
                { "path": "/en/gb/" },
                { "path": "/en/us/shop" },
                { "path": "/en/shop/item" },
                { "path": "/de/at/" },
            ]
        }));

        let en: Vec<_> = index.regions("en").unwrap().iter().cloned().collect();
        assert_eq!(en, vec!["gb", "us"]);
        assert!(index.regions("de").unwrap().contains("at"));
        assert!(index.regions("fr").is_none());
        assert_eq!(index.languages(), vec!["de", "en"]);
    }

    #[test]
    fn test_regions_need_second_segment() {
        let index = SiteIndex::from_paths(["/en/", "/shop/gb"]);
        assert!(index.regions("en").is_none());
        // First segment is not checked, only the second
        assert!(index.regions("shop").unwrap().contains("gb"));
    }

    #[test]
    fn test_build_tolerates_malformed_documents() {
        assert!(SiteIndex::build(&json!(null)).is_empty());
        assert!(SiteIndex::build(&json!({})).is_empty());
        assert!(SiteIndex::build(&json!({ "data": "nope" })).is_empty());
        assert!(SiteIndex::build(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_build_skips_bad_rows() {
        let index = SiteIndex::build(&json!({
            "data": [
                { "path": "" },
                { "title": "no path" },
                { "path": 42 },
                "string row",
                null,
                { "path": "", "Path": "/it/" },
                { "path": "/ok" },
            ]
        }));
        assert_eq!(index.len(), 2);
        assert!(index.contains("/it/"));
        assert!(index.contains("/ok"));
    }
}
