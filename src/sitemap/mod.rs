//! Site index: which localized paths exist.
//!
//! - `index`: lookup structure built from the sitemap document
//! - `source`: where the document is fetched from (file or HTTP)
//! - `cache`: per-page-load memoization backed by a durable TTL cache

mod cache;
mod index;
mod source;

use std::path::Path;
use std::sync::Arc;

use url::Url;

pub use cache::{DEFAULT_TTL, SiteIndexCache};
pub use index::SiteIndex;
pub use source::{FetchError, FileSource, HttpSource, SitemapSource};

use crate::core::LinkKind;

/// Pick a source for a configured location.
///
/// `http(s)://` locations are fetched over the network; anything else is a
/// file path relative to `root`.
pub fn source_for(location: &str, root: &Path) -> Result<Arc<dyn SitemapSource>, url::ParseError> {
    if LinkKind::is_http(location) {
        Ok(Arc::new(HttpSource::new(Url::parse(location)?)))
    } else {
        Ok(Arc::new(FileSource::new(root.join(location))))
    }
}
