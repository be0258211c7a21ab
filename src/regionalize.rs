//! Href regionalization.
//!
//! Maps an internal link to the best localized variant the site index
//! confirms exists.
//!
//! | Href             | Preference | Index has          | Result            |
//! |------------------|------------|--------------------|-------------------|
//! | `/`              | `fr-ca`    | `/fr/ca/`          | `/fr/ca/`         |
//! | `/`              | `fr-ca`    | `/fr/`             | `/fr/`            |
//! | `/de/shop/item`  | `de-at`    | `/de/at/shop/item` | `/de/at/shop/item`|
//! | `/shop/item`     | `de-at`    | `/de/shop/item`    | `/de/shop/item`   |
//! | `/en/gb/x`       | any        | any                | unchanged         |
//!
//! Links are never pointed at a path the index does not contain. Query
//! string and fragment are preserved; only the path is replaced.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::core::{LinkKind, LocalePreference, is_locale_token};
use crate::sitemap::SiteIndex;

/// Path segment marking modal-triggering links.
const MODALS_SEGMENT: &str = "/modals/";

static DOUBLE_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//+").unwrap());

/// Compute the regionalized href for `raw` as seen from a page at `page`.
///
/// Returns `raw` unchanged when the link is not internal, is a fragment,
/// `mailto:` or `tel:` link, targets a modal, is already regionalized, or
/// when no candidate path exists in `index`.
pub fn compute_href(
    raw: &str,
    preference: &LocalePreference,
    index: &SiteIndex,
    page: &Url,
) -> String {
    let kind = LinkKind::parse(raw);
    if kind.is_skipped() {
        return raw.to_string();
    }

    let Some(mut url) = resolve_internal(raw, page) else {
        return raw.to_string();
    };
    if url.path().contains(MODALS_SEGMENT) {
        return raw.to_string();
    }

    match regionalize_path(url.path(), preference, index) {
        Some(path) => {
            url.set_path(&path);
            render(&url, kind)
        }
        None => raw.to_string(),
    }
}

/// Resolve `raw` against the page origin; `None` if it leaves the origin.
fn resolve_internal(raw: &str, page: &Url) -> Option<Url> {
    let origin_root = page.join("/").ok()?;
    let url = origin_root.join(raw).ok()?;
    (url.origin() == page.origin()).then_some(url)
}

/// Pick the localized path for `path`, if the index confirms one.
fn regionalize_path(path: &str, preference: &LocalePreference, index: &SiteIndex) -> Option<String> {
    let lang = preference.language_or_default();
    let region = preference.region.as_str();

    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return root_candidate(lang, region, index);
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    let path_lang = parts.first().copied().filter(|p| is_locale_token(p));
    let lang = path_lang.unwrap_or(lang);

    // Explicit region in the URL is never second-guessed
    if path_lang.is_some() && parts.get(1).is_some_and(|p| is_locale_token(p)) {
        return None;
    }

    let rest = parts[usize::from(path_lang.is_some())..].join("/");

    if !region.is_empty() {
        let candidate = DOUBLE_SLASH
            .replace(&format!("/{lang}/{region}/{rest}"), "/")
            .into_owned();
        if index.contains(&candidate) {
            return Some(candidate);
        }
    }

    let with_lang = if path_lang.is_some() {
        format!("/{}", parts.join("/"))
    } else {
        format!("/{lang}/{rest}")
    };
    index.contains(&with_lang).then_some(with_lang)
}

/// Candidates for the site root: `/{lang}/{region}/`, then `/{lang}/`.
fn root_candidate(lang: &str, region: &str, index: &SiteIndex) -> Option<String> {
    if !region.is_empty() {
        let candidate = format!("/{lang}/{region}/");
        if index.contains(&candidate) {
            return Some(candidate);
        }
    }

    let fallback = format!("/{lang}/");
    index.contains(&fallback).then_some(fallback)
}

/// Write a rewritten URL back in the form of the original href.
///
/// Absolute hrefs stay absolute; everything else becomes
/// `path[?query][#fragment]`.
fn render(url: &Url, kind: LinkKind<'_>) -> String {
    if kind.is_absolute() {
        return url.to_string();
    }

    let mut href = url.path().to_string();
    if let Some(query) = url.query() {
        href.push('?');
        href.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        href.push('#');
        href.push_str(fragment);
    }
    href
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/en/products/").unwrap()
    }

    fn href(raw: &str, pref: &LocalePreference, paths: &[&str]) -> String {
        let index = SiteIndex::from_paths(paths.iter().copied());
        compute_href(raw, pref, &index, &page())
    }

    fn fr_ca() -> LocalePreference {
        LocalePreference::new("fr", "ca")
    }

    fn de_at() -> LocalePreference {
        LocalePreference::new("de", "at")
    }

    // =========================================================================
    // Preconditions
    // =========================================================================

    #[test]
    fn test_skipped_links_unchanged() {
        let all = ["/fr/ca/", "/fr/", "/fr/ca/about"];
        for raw in ["", "#top", "#", "mailto:a@example.com", "tel:+123"] {
            assert_eq!(href(raw, &fr_ca(), &all), raw);
        }
    }

    #[test]
    fn test_external_links_unchanged() {
        let all = ["/fr/ca/", "/fr/", "/fr/ca/about"];
        for raw in [
            "https://other.com/about",
            "http://example.com/about",
            "https://example.com:8443/about",
            "//other.com/about",
            "javascript:void(0)",
        ] {
            assert_eq!(href(raw, &fr_ca(), &all), raw);
        }
    }

    #[test]
    fn test_modal_links_unchanged() {
        let all = ["/fr/ca/modals/signup", "/fr/modals/signup"];
        assert_eq!(href("/modals/signup", &fr_ca(), &all), "/modals/signup");
        assert_eq!(
            href("/fr/modals/signup", &fr_ca(), &all),
            "/fr/modals/signup"
        );
    }

    #[test]
    fn test_already_regionalized_unchanged() {
        let all = ["/de/at/products/widget", "/en/products/widget"];
        for pref in [de_at(), fr_ca(), LocalePreference::default()] {
            assert_eq!(
                href("/en/gb/products/widget", &pref, &all),
                "/en/gb/products/widget"
            );
        }
    }

    // =========================================================================
    // Root path
    // =========================================================================

    #[test]
    fn test_root_prefers_regional_home() {
        assert_eq!(href("/", &fr_ca(), &["/fr/ca/", "/fr/"]), "/fr/ca/");
    }

    #[test]
    fn test_root_falls_back_to_language_home() {
        assert_eq!(href("/", &fr_ca(), &["/fr/"]), "/fr/");
    }

    #[test]
    fn test_root_unchanged_when_unknown() {
        assert_eq!(href("/", &fr_ca(), &["/en/"]), "/");
    }

    #[test]
    fn test_root_defaults_language() {
        let pref = LocalePreference::new("", "gb");
        assert_eq!(href("/", &pref, &["/en/gb/"]), "/en/gb/");
    }

    #[test]
    fn test_root_keeps_query_and_fragment() {
        assert_eq!(
            href("/?ref=nav#main", &fr_ca(), &["/fr/ca/"]),
            "/fr/ca/?ref=nav#main"
        );
    }

    // =========================================================================
    // Non-root paths
    // =========================================================================

    #[test]
    fn test_regional_page_confirmed() {
        assert_eq!(
            href("/de/shop/item", &de_at(), &["/de/at/shop/item"]),
            "/de/at/shop/item"
        );
    }

    #[test]
    fn test_language_page_already_matches() {
        assert_eq!(
            href("/de/shop/item", &de_at(), &["/de/shop/item"]),
            "/de/shop/item"
        );
    }

    #[test]
    fn test_language_prefix_added_when_missing() {
        assert_eq!(
            href("/shop/item", &de_at(), &["/de/shop/item"]),
            "/de/shop/item"
        );
    }

    #[test]
    fn test_regional_prefix_added_when_missing() {
        assert_eq!(
            href("/shop/item", &de_at(), &["/de/at/shop/item", "/de/shop/item"]),
            "/de/at/shop/item"
        );
    }

    #[test]
    fn test_unknown_target_unchanged() {
        assert_eq!(href("/shop/item", &de_at(), &["/fr/shop/item"]), "/shop/item");
    }

    #[test]
    fn test_path_language_wins_over_preference() {
        // Link explicitly into the French section stays French
        assert_eq!(
            href("/fr/shop", &de_at(), &["/de/at/shop", "/fr/at/shop"]),
            "/fr/at/shop"
        );
    }

    #[test]
    fn test_language_fallback_uses_original_segments() {
        // Regional candidate missing, language-only page keeps its own language
        assert_eq!(
            href("/fr/shop", &de_at(), &["/de/shop", "/fr/shop"]),
            "/fr/shop"
        );
        assert_eq!(href("/fr/shop", &de_at(), &["/de/shop"]), "/fr/shop");
    }

    #[test]
    fn test_no_region_preference_uses_language_candidate() {
        let pref = LocalePreference::language("it");
        assert_eq!(
            href("/about", &pref, &["/it/about", "/it/ch/about"]),
            "/it/about"
        );
    }

    #[test]
    fn test_trailing_slash_preserved() {
        assert_eq!(
            href("/shop/", &de_at(), &["/de/at/shop/"]),
            "/de/at/shop/"
        );
        // Exact membership: no trailing-slash normalization
        assert_eq!(href("/shop", &de_at(), &["/de/at/shop/"]), "/shop");
    }

    #[test]
    fn test_language_home_link_gets_region() {
        assert_eq!(href("/fr/", &fr_ca(), &["/fr/ca/"]), "/fr/ca/");
    }

    #[test]
    fn test_doubled_slash_collapsed() {
        assert_eq!(
            href("//shop", &de_at(), &["/de/at/shop"]),
            "//shop",
            "protocol-relative href is a different host"
        );
        assert_eq!(href("/x//shop", &de_at(), &["/de/at/x/shop"]), "/de/at/x/shop");
        assert_eq!(
            href("/x//y//shop", &de_at(), &["/de/at/x/y//shop"]),
            "/de/at/x/y//shop",
            "only the first run of slashes is collapsed"
        );
    }

    #[test]
    fn test_relative_href_resolved_against_origin() {
        assert_eq!(href("shop/item", &de_at(), &["/de/at/shop/item"]), "/de/at/shop/item");
    }

    #[test]
    fn test_absolute_same_origin_stays_absolute() {
        assert_eq!(
            href("https://example.com/shop?x=1", &de_at(), &["/de/at/shop"]),
            "https://example.com/de/at/shop?x=1"
        );
    }

    #[test]
    fn test_single_letter_and_long_segments_are_not_languages() {
        assert_eq!(
            href("/e/shop", &de_at(), &["/de/at/e/shop"]),
            "/de/at/e/shop"
        );
        assert_eq!(
            href("/eng/shop", &de_at(), &["/de/eng/shop"]),
            "/de/eng/shop"
        );
    }

    #[test]
    fn test_empty_index_changes_nothing() {
        for raw in ["/", "/shop", "/de/shop", "https://example.com/x"] {
            assert_eq!(href(raw, &de_at(), &[]), raw);
        }
    }
}
