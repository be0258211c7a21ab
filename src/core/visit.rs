//! The page being viewed and the signals it carries.

use url::Url;

use super::locale::is_locale_token;

/// A single page load: the URL the visitor is on plus the language the
/// browser reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    url: Url,
    browser_language: Option<String>,
}

impl Visit {
    pub fn new(url: Url, browser_language: Option<String>) -> Self {
        Self {
            url,
            browser_language,
        }
    }

    /// Resolve `page` against the site URL.
    ///
    /// Accepts either an absolute URL or a site path such as `/en/?region=ca`.
    pub fn parse(
        page: &str,
        site: &Url,
        browser_language: Option<String>,
    ) -> Result<Self, url::ParseError> {
        let url = site.join(page)?;
        Ok(Self::new(url, browser_language))
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn browser_language(&self) -> Option<&str> {
        self.browser_language.as_deref()
    }

    /// First non-empty path segment, if it is a 2-character token.
    pub fn path_language(&self) -> Option<&str> {
        path_language(self.path())
    }

    /// First non-empty value of `key` in the query string.
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`, in order.
    pub fn query_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.query(key))
    }
}

/// Language segment of a path: the first non-empty segment when it is a
/// 2-character token.
pub fn path_language(path: &str) -> Option<&str> {
    path.split('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| is_locale_token(segment))
}
