//! Locale preference value and locale-string normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language used whenever no signal determines one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The language/region pair a visitor should see.
///
/// Invariants:
/// - `language` is never empty once resolved (falls back to [`DEFAULT_LANGUAGE`])
/// - `region` may be empty, meaning "no regional variant preferred"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePreference {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub region: String,
}

impl LocalePreference {
    pub fn new(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: region.into(),
        }
    }

    /// Language-only preference.
    pub fn language(language: impl Into<String>) -> Self {
        Self::new(language, "")
    }

    /// Stored payloads without a language are treated as absent.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        !self.language.is_empty()
    }

    /// Language to build paths with.
    #[inline]
    pub fn language_or_default(&self) -> &str {
        if self.language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }

    #[inline]
    pub fn has_region(&self) -> bool {
        !self.region.is_empty()
    }
}

impl Default for LocalePreference {
    fn default() -> Self {
        Self::language(DEFAULT_LANGUAGE)
    }
}

impl fmt::Display for LocalePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.region.is_empty() {
            write!(f, "{}", self.language)
        } else {
            write!(f, "{}-{}", self.language, self.region)
        }
    }
}

/// Check whether a path segment looks like a language or region code.
///
/// Only the length is checked: any 2-character segment qualifies.
#[inline]
pub fn is_locale_token(segment: &str) -> bool {
    segment.chars().count() == 2
}

/// Normalize a raw locale string (`en-GB`, `pt_BR`, `de`) into a preference.
///
/// The first `_` is treated as `-`, then the string is split on `-` and the
/// first two parts become language and region, lowercased. Returns `None`
/// for empty input or an empty language part.
pub fn normalize_locale(raw: &str) -> Option<LocalePreference> {
    if raw.is_empty() {
        return None;
    }

    let replaced = raw.replacen('_', "-", 1);
    let mut parts = replaced.split('-');
    let language = parts.next().unwrap_or_default().to_lowercase();
    let region = parts.next().unwrap_or_default().to_lowercase();

    if language.is_empty() {
        return None;
    }
    Some(LocalePreference { language, region })
}
