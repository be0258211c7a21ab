//! Two-tier locale preference storage.

use std::sync::Arc;

use crate::core::{LocalePreference, path_language};
use crate::storage::{self, KeyValueStore};

/// Durable preference key.
pub const PREFERENCE_KEY: &str = "preferred-locale";
/// Session override key.
pub const OVERRIDE_KEY: &str = "preferred-locale-override";

/// Reads and writes the visitor's locale preference.
///
/// The session tier holds an *override* set from explicit URL signals; the
/// durable tier holds the long-lived preference. Every operation is
/// best-effort and never fails.
#[derive(Clone)]
pub struct PreferenceStore {
    session: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(session: Arc<dyn KeyValueStore>, durable: Arc<dyn KeyValueStore>) -> Self {
        Self { session, durable }
    }

    /// Resolve the preference for a page at `page_path`.
    ///
    /// Override, then durable, then the path's language segment, then `en`.
    pub fn read(&self, page_path: &str) -> LocalePreference {
        self.read_override()
            .or_else(|| self.read_durable())
            .unwrap_or_else(|| fallback(page_path))
    }

    /// Override value, if present and well-formed.
    pub fn read_override(&self) -> Option<LocalePreference> {
        storage::read_json::<LocalePreference>(self.session.as_ref(), OVERRIDE_KEY)
            .filter(LocalePreference::is_well_formed)
    }

    /// Durable value, if present and well-formed.
    pub fn read_durable(&self) -> Option<LocalePreference> {
        storage::read_json::<LocalePreference>(self.durable.as_ref(), PREFERENCE_KEY)
            .filter(LocalePreference::is_well_formed)
    }

    pub fn write_durable(&self, pref: &LocalePreference) {
        storage::write_json(self.durable.as_ref(), PREFERENCE_KEY, pref);
    }

    pub fn write_override(&self, pref: &LocalePreference) {
        storage::write_json(self.session.as_ref(), OVERRIDE_KEY, pref);
    }

    pub fn clear_override(&self) {
        storage::remove(self.session.as_ref(), OVERRIDE_KEY);
    }

    pub fn clear_durable(&self) {
        storage::remove(self.durable.as_ref(), PREFERENCE_KEY);
    }
}

/// Preference derived from the page path alone.
fn fallback(page_path: &str) -> LocalePreference {
    match path_language(page_path) {
        Some(language) => LocalePreference::language(language),
        None => LocalePreference::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, UnavailableStore};

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>, PreferenceStore) {
        let session = Arc::new(MemoryStore::new());
        let durable = Arc::new(MemoryStore::new());
        let store = PreferenceStore::new(session.clone(), durable.clone());
        (session, durable, store)
    }

    #[test]
    fn test_read_empty_falls_back_to_default() {
        let (_, _, store) = stores();
        assert_eq!(store.read("/shop/"), LocalePreference::new("en", ""));
        assert_eq!(store.read("/"), LocalePreference::new("en", ""));
    }

    #[test]
    fn test_read_falls_back_to_path_language() {
        let (_, _, store) = stores();
        assert_eq!(store.read("/fr/shop/"), LocalePreference::language("fr"));
    }

    #[test]
    fn test_override_wins_over_durable() {
        let (_, _, store) = stores();
        store.write_durable(&LocalePreference::new("en", ""));
        store.write_override(&LocalePreference::new("en", "ca"));
        assert_eq!(store.read("/en/"), LocalePreference::new("en", "ca"));

        store.clear_override();
        assert_eq!(store.read("/en/"), LocalePreference::new("en", ""));
    }

    #[test]
    fn test_malformed_override_falls_through() {
        let (session, _, store) = stores();
        store.write_durable(&LocalePreference::new("de", "at"));

        session.set(OVERRIDE_KEY, "not json").unwrap();
        assert_eq!(store.read("/"), LocalePreference::new("de", "at"));

        session.set(OVERRIDE_KEY, r#"{"language":"","region":"ca"}"#).unwrap();
        assert_eq!(store.read("/"), LocalePreference::new("de", "at"));
    }

    #[test]
    fn test_malformed_durable_falls_through() {
        let (_, durable, store) = stores();
        durable.set(PREFERENCE_KEY, r#"{"region":"gb"}"#).unwrap();
        assert_eq!(store.read("/it/"), LocalePreference::language("it"));
    }

    #[test]
    fn test_unavailable_storage_never_fails() {
        let store = PreferenceStore::new(Arc::new(UnavailableStore), Arc::new(UnavailableStore));
        store.write_durable(&LocalePreference::new("fr", "ca"));
        store.write_override(&LocalePreference::new("fr", "ca"));
        store.clear_override();
        store.clear_durable();
        assert_eq!(store.read("/fr/"), LocalePreference::language("fr"));
    }

    #[test]
    fn test_clear_durable() {
        let (_, durable, store) = stores();
        store.write_durable(&LocalePreference::new("fr", "ca"));
        assert!(!durable.is_empty());
        store.clear_durable();
        assert!(durable.is_empty());
    }
}
