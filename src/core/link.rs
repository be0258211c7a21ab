//! Link classification utilities.

/// Syntactic classification of an href value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Empty attribute value.
    Empty,
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// `mailto:` or `tel:` link.
    Contact(&'a str),
    /// Absolute http(s) URL, possibly on the current origin.
    Absolute(&'a str),
    /// Any other URL scheme (`javascript:`, `ftp:`, `data:`...).
    OtherScheme(&'a str),
    /// Site-root-relative path (/about, /posts/hello).
    SiteRoot(&'a str),
    /// Path relative to the site origin without leading slash (about, ./x).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if link.is_empty() {
            Self::Empty
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with("mailto:") || link.starts_with("tel:") {
            Self::Contact(link)
        } else if Self::is_http(link) {
            Self::Absolute(link)
        } else if has_scheme(link) {
            Self::OtherScheme(link)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }

    /// Links that are never candidates for rewriting.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Empty | Self::Fragment(_) | Self::Contact(_))
    }

    /// Whether a rewrite should be written back as a full URL.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Check if link is HTTP/HTTPS.
    #[inline]
    pub fn is_http(link: &str) -> bool {
        let lower = link.get(..8).unwrap_or(link).to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

/// Check if a link starts with a URL scheme (`name:`).
fn has_scheme(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skipped() {
        assert_eq!(LinkKind::parse(""), LinkKind::Empty);
        assert_eq!(LinkKind::parse("#top"), LinkKind::Fragment("top"));
        assert_eq!(LinkKind::parse("#"), LinkKind::Fragment(""));
        assert!(LinkKind::parse("mailto:user@example.com").is_skipped());
        assert!(LinkKind::parse("tel:+1234567890").is_skipped());
    }

    #[test]
    fn test_parse_absolute() {
        assert_eq!(
            LinkKind::parse("https://example.com/en/"),
            LinkKind::Absolute("https://example.com/en/")
        );
        assert!(LinkKind::parse("HTTP://example.com").is_absolute());
        assert!(!LinkKind::parse("/about").is_absolute());
    }

    #[test]
    fn test_parse_other_scheme() {
        assert!(matches!(
            LinkKind::parse("javascript:void(0)"),
            LinkKind::OtherScheme(_)
        ));
        assert!(matches!(
            LinkKind::parse("ftp://files.example.com"),
            LinkKind::OtherScheme(_)
        ));
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(LinkKind::parse("/about"), LinkKind::SiteRoot("/about"));
        assert_eq!(LinkKind::parse("about"), LinkKind::Relative("about"));
        assert_eq!(LinkKind::parse("./a:b"), LinkKind::Relative("./a:b"));
    }

    #[test]
    fn test_is_http() {
        assert!(LinkKind::is_http("http://example.com"));
        assert!(LinkKind::is_http("https://example.com"));
        assert!(!LinkKind::is_http("mailto:user@example.com"));
        assert!(!LinkKind::is_http("/about"));
    }
}
