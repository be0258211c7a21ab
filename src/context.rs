//! Per-page-load context.
//!
//! Holds everything a localization pass reads: the visit, the preference
//! store and the memoized site index. Storage tiers and the sitemap source
//! live in an [`Environment`] that outlives individual page loads.

use std::sync::Arc;
use std::time::Duration;

use crate::core::{LocalePreference, Visit};
use crate::locale::{Detection, LocaleDetector, PreferenceStore};
use crate::sitemap::{DEFAULT_TTL, SiteIndex, SiteIndexCache, SitemapSource};
use crate::storage::KeyValueStore;

/// Capabilities shared across page loads.
#[derive(Clone)]
pub struct Environment {
    pub session: Arc<dyn KeyValueStore>,
    pub durable: Arc<dyn KeyValueStore>,
    pub source: Arc<dyn SitemapSource>,
    pub ttl: Duration,
    /// Ignore a fresh durable sitemap entry and fetch anyway
    pub refresh: bool,
}

impl Environment {
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
        source: Arc<dyn SitemapSource>,
    ) -> Self {
        Self {
            session,
            durable,
            source,
            ttl: DEFAULT_TTL,
            refresh: false,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// A fresh, unshared site index loader.
    pub fn index_cache(&self) -> SiteIndexCache {
        SiteIndexCache::new(self.durable.clone(), self.source.clone())
            .with_ttl(self.ttl)
            .bypass_durable(self.refresh)
    }
}

/// State of one page load.
pub struct Context {
    visit: Visit,
    env: Environment,
    preferences: PreferenceStore,
    index: SiteIndexCache,
}

impl Context {
    pub fn new(visit: Visit, env: Environment) -> Self {
        let preferences = PreferenceStore::new(env.session.clone(), env.durable.clone());
        let index = env.index_cache();
        Self {
            visit,
            env,
            preferences,
            index,
        }
    }

    /// A new page load sharing this one's storage and source.
    ///
    /// The in-memory index is not carried over; the durable cache decides
    /// whether the sitemap is fetched again.
    pub fn next_page_load(&self, visit: Visit) -> Self {
        Self::new(visit, self.env.clone().with_refresh(false))
    }

    #[inline]
    pub fn visit(&self) -> &Visit {
        &self.visit
    }

    #[inline]
    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Run locale detection for this page load.
    pub fn detect(&self) -> Detection {
        LocaleDetector::new(&self.visit, &self.preferences).run()
    }

    /// Resolved preference for the current page.
    pub fn preference(&self) -> LocalePreference {
        self.preferences.read(self.visit.path())
    }

    /// Site index snapshot for this page load.
    pub async fn index(&self) -> Arc<SiteIndex> {
        self.index.get().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory environment for tests.

    use super::*;
    use crate::sitemap::FetchError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use url::Url;

    /// Sitemap source serving a fixed document.
    pub struct StaticSource(pub Value);

    impl StaticSource {
        pub fn paths(paths: &[&str]) -> Self {
            let data: Vec<_> = paths.iter().map(|p| json!({ "path": p })).collect();
            Self(json!({ "data": data }))
        }
    }

    #[async_trait]
    impl SitemapSource for StaticSource {
        async fn fetch_document(&self) -> Result<Value, FetchError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    pub fn environment(paths: &[&str]) -> Environment {
        Environment::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(StaticSource::paths(paths)),
        )
    }

    pub fn visit(page: &str, lang: Option<&str>) -> Visit {
        let site = Url::parse("https://example.com").unwrap();
        Visit::parse(page, &site, lang.map(String::from)).unwrap()
    }

    pub fn context(page: &str, lang: Option<&str>, paths: &[&str]) -> Context {
        Context::new(visit(page, lang), environment(paths))
    }
}
