//! Memoized site index with a time-bounded durable cache.
//!
//! Lookup order for [`SiteIndexCache::get`]:
//!
//! 1. value already loaded by this page load (shared by concurrent callers)
//! 2. durable entry `sitemap-index-cache` younger than the TTL
//! 3. fetch from the [`SitemapSource`], then refresh the durable entry
//!
//! A failed fetch yields an empty index and leaves the durable entry alone.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use super::{SiteIndex, SitemapSource};
use crate::storage::{self, KeyValueStore};
use crate::{debug, log};

/// Durable cache key.
pub const SITEMAP_CACHE_KEY: &str = "sitemap-index-cache";

/// Default freshness window of the durable entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Durable cache payload: raw document plus its fetch time.
#[derive(Debug, Serialize, Deserialize)]
struct CachedSitemap {
    /// Epoch milliseconds
    #[serde(default)]
    ts: u64,
    #[serde(default)]
    json: Value,
}

/// Clock returning epoch milliseconds.
pub type Clock = fn() -> u64;

/// Current time in epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Site index loader for one page load.
pub struct SiteIndexCache {
    cell: OnceCell<Arc<SiteIndex>>,
    durable: Arc<dyn KeyValueStore>,
    source: Arc<dyn SitemapSource>,
    ttl: Duration,
    clock: Clock,
    /// Skip the durable entry on read (still refreshed after fetching)
    bypass: bool,
}

impl SiteIndexCache {
    pub fn new(durable: Arc<dyn KeyValueStore>, source: Arc<dyn SitemapSource>) -> Self {
        Self {
            cell: OnceCell::new(),
            durable,
            source,
            ttl: DEFAULT_TTL,
            clock: now_millis,
            bypass: false,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Ignore the durable entry and always fetch.
    pub fn bypass_durable(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    /// Get the index, loading it at most once.
    pub async fn get(&self) -> Arc<SiteIndex> {
        self.cell.get_or_init(|| self.load()).await.clone()
    }

    async fn load(&self) -> Arc<SiteIndex> {
        if !self.bypass
            && let Some(doc) = self.read_fresh()
        {
            debug!("sitemap"; "using cached sitemap");
            return Arc::new(SiteIndex::build(&doc));
        }

        match self.source.fetch_document().await {
            Ok(doc) => {
                let index = SiteIndex::build(&doc);
                debug!("sitemap"; "fetched {} paths from {}", index.len(), self.source.describe());
                let entry = CachedSitemap {
                    ts: (self.clock)(),
                    json: doc,
                };
                storage::write_json(self.durable.as_ref(), SITEMAP_CACHE_KEY, &entry);
                Arc::new(index)
            }
            Err(e) => {
                log!("sitemap"; "failed to load {}: {}", self.source.describe(), e);
                Arc::new(SiteIndex::empty())
            }
        }
    }

    /// Cached document, if present and within the TTL.
    fn read_fresh(&self) -> Option<Value> {
        let entry: CachedSitemap = storage::read_json(self.durable.as_ref(), SITEMAP_CACHE_KEY)?;
        if entry.ts == 0 {
            return None;
        }

        let age = (self.clock)().saturating_sub(entry.ts);
        let ttl = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        (age < ttl).then_some(entry.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::FetchError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: u64 = 1_700_000_000_000;

    fn fixed_clock() -> u64 {
        NOW
    }

    /// Source that counts fetches and optionally fails.
    struct CountingSource {
        doc: Option<Value>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn ok(paths: &[&str]) -> Arc<Self> {
            let data: Vec<_> = paths.iter().map(|p| json!({ "path": p })).collect();
            Arc::new(Self {
                doc: Some(json!({ "data": data })),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                doc: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SitemapSource for CountingSource {
        async fn fetch_document(&self) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match &self.doc {
                Some(doc) => Ok(doc.clone()),
                None => Err(FetchError::Parse(
                    serde_json::from_str::<Value>("{").unwrap_err(),
                )),
            }
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    fn cache(durable: &Arc<MemoryStore>, source: &Arc<CountingSource>) -> SiteIndexCache {
        SiteIndexCache::new(durable.clone(), source.clone()).with_clock(fixed_clock)
    }

    #[tokio::test]
    async fn test_fetch_and_memoize() {
        let durable = Arc::new(MemoryStore::new());
        let source = CountingSource::ok(&["/en/", "/fr/ca/"]);
        let cache = cache(&durable, &source);

        let first = cache.get().await;
        let second = cache.get().await;

        assert!(first.contains("/fr/ca/"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let durable = Arc::new(MemoryStore::new());
        let source = CountingSource::ok(&["/en/"]);
        let cache = cache(&durable, &source);

        let (a, b, c) = tokio::join!(cache.get(), cache.get(), cache.get());
        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn test_fetch_writes_durable_entry() {
        let durable = Arc::new(MemoryStore::new());
        let source = CountingSource::ok(&["/en/"]);
        cache(&durable, &source).get().await;

        let raw = durable.get(SITEMAP_CACHE_KEY).unwrap().unwrap();
        let entry: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry["ts"], NOW);
        assert_eq!(entry["json"]["data"][0]["path"], "/en/");
    }

    #[tokio::test]
    async fn test_fresh_durable_entry_skips_fetch() {
        let durable = Arc::new(MemoryStore::new());
        let entry = json!({ "ts": NOW - 60_000, "json": { "data": [{ "path": "/de/at/" }] } });
        durable.set(SITEMAP_CACHE_KEY, &entry.to_string()).unwrap();

        let source = CountingSource::ok(&["/en/"]);
        let index = cache(&durable, &source).get().await;

        assert_eq!(source.calls(), 0);
        assert!(index.contains("/de/at/"));
        assert!(!index.contains("/en/"));
    }

    #[tokio::test]
    async fn test_stale_durable_entry_refetches() {
        let durable = Arc::new(MemoryStore::new());
        let entry = json!({ "ts": NOW - 11 * 60_000, "json": { "data": [{ "path": "/de/at/" }] } });
        durable.set(SITEMAP_CACHE_KEY, &entry.to_string()).unwrap();

        let source = CountingSource::ok(&["/en/"]);
        let index = cache(&durable, &source).get().await;

        assert_eq!(source.calls(), 1);
        assert!(index.contains("/en/"));

        let raw = durable.get(SITEMAP_CACHE_KEY).unwrap().unwrap();
        let refreshed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(refreshed["ts"], NOW);
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let durable = Arc::new(MemoryStore::new());
        let entry = json!({ "ts": NOW - 60_000, "json": { "data": [] } });
        durable.set(SITEMAP_CACHE_KEY, &entry.to_string()).unwrap();

        let source = CountingSource::ok(&["/en/"]);
        let cache = cache(&durable, &source).with_ttl(Duration::from_secs(30));
        cache.get().await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_durable_entry_refetches() {
        let durable = Arc::new(MemoryStore::new());
        durable.set(SITEMAP_CACHE_KEY, "garbage").unwrap();

        let source = CountingSource::ok(&["/en/"]);
        let index = cache(&durable, &source).get().await;
        assert_eq!(source.calls(), 1);
        assert!(index.contains("/en/"));
    }

    #[tokio::test]
    async fn test_bypass_durable() {
        let durable = Arc::new(MemoryStore::new());
        let entry = json!({ "ts": NOW, "json": { "data": [{ "path": "/old/" }] } });
        durable.set(SITEMAP_CACHE_KEY, &entry.to_string()).unwrap();

        let source = CountingSource::ok(&["/new/"]);
        let index = cache(&durable, &source).bypass_durable(true).get().await;
        assert_eq!(source.calls(), 1);
        assert!(index.contains("/new/"));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_index_without_caching() {
        let durable = Arc::new(MemoryStore::new());
        let source = CountingSource::failing();
        let cache = cache(&durable, &source);

        let index = cache.get().await;
        assert!(index.is_empty());
        assert!(durable.is_empty());

        // Memoized for the rest of the page load
        cache.get().await;
        assert_eq!(source.calls(), 1);
    }
}
