//! `[sitemap]` section configuration.
//!
//! ```toml
//! [sitemap]
//! source = "sitemap.json"     # path relative to the project root, or http(s) URL
//! ttl = 600                   # seconds a cached index stays fresh
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::LinkKind;
use crate::sitemap::DEFAULT_TTL;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Location of the sitemap document.
    pub source: String,

    /// Freshness window of the durable cache entry, in seconds.
    pub ttl: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            source: "sitemap.json".into(),
            ttl: DEFAULT_TTL.as_secs(),
        }
    }
}

impl SitemapConfig {
    pub const SOURCE: FieldPath = FieldPath::new("sitemap.source");
    pub const TTL: FieldPath = FieldPath::new("sitemap.ttl");

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    pub fn is_remote(&self) -> bool {
        LinkKind::is_http(&self.source)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.source.trim().is_empty() {
            diag.error_with_hint(
                Self::SOURCE,
                "sitemap source is empty",
                "use a file path like \"sitemap.json\" or an https URL",
            );
        } else if self.is_remote()
            && let Err(e) = url::Url::parse(&self.source)
        {
            diag.error(Self::SOURCE, format!("invalid URL: {}", e));
        }

        if self.ttl == 0 {
            diag.warn(Self::TTL, "ttl = 0 refetches the sitemap on every page load");
        }
    }
}
