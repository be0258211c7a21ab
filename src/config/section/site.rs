//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! url = "https://example.com"
//! ```
//!
//! The URL's origin decides which links are internal.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public site URL (e.g., "https://example.com").
    pub url: Option<String>,
}

impl SiteConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");

    /// Parsed site URL, if configured and valid.
    pub fn parsed_url(&self) -> Option<Url> {
        self.url.as_deref().and_then(|u| Url::parse(u).ok())
    }

    /// # Checks
    /// - `url` is set
    /// - `url` parses, uses http or https and has a host
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            diag.error_with_hint(
                Self::URL,
                format!("{} is not configured", Self::URL),
                format!("set {}, e.g.: \"https://example.com\"", Self::URL),
            );
            return;
        };

        match Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::URL,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::URL,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::URL,
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}
