//! Locale detection from URL and browser signals.
//!
//! Runs once per page load and merges the signals into the preference store:
//!
//! | Signal                               | Effect                         |
//! |--------------------------------------|--------------------------------|
//! | `?locale=reset`                      | clear override and durable     |
//! | `?locale=..` / `?region=..`          | session override only          |
//! | browser language (no stored region)  | durable preference             |
//! | path language differs from stored    | durable language resync        |
//!
//! The path's language segment always wins over a detected or spoofed
//! language so a visitor is never pushed away from the section they are
//! reading.

use std::fmt;

use crate::core::{DEFAULT_LANGUAGE, LocalePreference, Visit, normalize_locale};

use super::PreferenceStore;

/// Query keys carrying a locale (or `reset`), in priority order.
const LOCALE_PARAMS: [&str; 2] = ["locale", "hlx-locale"];
/// Query keys carrying a region code, in priority order.
const REGION_PARAMS: [&str; 2] = ["region", "hlx-region"];

/// What a detection run did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Both tiers cleared by `locale=reset`.
    Reset,
    /// Session override written from query signals.
    Override(LocalePreference),
    /// Durable preference written from the browser language.
    Browser(LocalePreference),
    /// Durable language synced to the path language.
    PathSync(LocalePreference),
    /// Nothing written.
    Unchanged,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset stored preferences"),
            Self::Override(pref) => write!(f, "session override {pref}"),
            Self::Browser(pref) => write!(f, "browser language {pref}"),
            Self::PathSync(pref) => write!(f, "synced to path language {pref}"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Merges the signals of one visit into a [`PreferenceStore`].
pub struct LocaleDetector<'a> {
    visit: &'a Visit,
    store: &'a PreferenceStore,
}

impl<'a> LocaleDetector<'a> {
    pub fn new(visit: &'a Visit, store: &'a PreferenceStore) -> Self {
        Self { visit, store }
    }

    /// Run detection and write the result to the appropriate tier.
    pub fn run(&self) -> Detection {
        let param_locale = self.visit.query_any(&LOCALE_PARAMS);
        let param_region = self.visit.query_any(&REGION_PARAMS);

        if param_locale
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case("reset"))
        {
            self.store.clear_override();
            self.store.clear_durable();
            return Detection::Reset;
        }

        let existing = self.store.read(self.visit.path());
        let path_lang = self.visit.path_language();

        if param_locale.is_some() || param_region.is_some() {
            let pref = spoof(
                &existing,
                path_lang,
                param_locale.as_deref(),
                param_region.as_deref(),
            );
            self.store.write_override(&pref);
            return Detection::Override(pref);
        }

        if !existing.has_region()
            && let Some(detected) = self.visit.browser_language().and_then(normalize_locale)
        {
            let pref = LocalePreference {
                language: path_lang.map_or(detected.language, str::to_string),
                region: detected.region,
            };
            self.store.write_durable(&pref);
            return Detection::Browser(pref);
        }

        if let Some(lang) = path_lang
            && lang != existing.language
        {
            let pref = LocalePreference::new(lang, existing.region);
            self.store.write_durable(&pref);
            return Detection::PathSync(pref);
        }

        Detection::Unchanged
    }
}

/// Build the session override from query signals.
fn spoof(
    existing: &LocalePreference,
    path_lang: Option<&str>,
    param_locale: Option<&str>,
    param_region: Option<&str>,
) -> LocalePreference {
    let mut language = match path_lang {
        Some(lang) => lang.to_string(),
        None if existing.language.is_empty() => DEFAULT_LANGUAGE.to_string(),
        None => existing.language.clone(),
    };
    let mut region = existing.region.clone();

    if let Some(norm) = param_locale.and_then(normalize_locale) {
        if path_lang.is_none() {
            language = norm.language;
        }
        if !norm.region.is_empty() {
            region = norm.region;
        }
    }

    if let Some(explicit) = param_region {
        region = explicit.to_lowercase();
    }

    LocalePreference { language, region }
}
