//! HTML document with in-place anchor rewriting.
//!
//! Start tags are read with a small tokenizer so every `href` spelling a
//! browser accepts is found: any attribute-name case, single, double or no
//! quotes. Content of script, style, textarea and template elements is never
//! tokenized. Container scopes are resolved with `tl`. Edits are spliced into
//! the original source so every other byte is preserved.

use std::ops::Range;

use thiserror::Error;

use crate::utils::html::{escape_attr, is_anchor, unescape};

/// Elements whose content holds no live anchors.
const OPAQUE_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "template"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("HTML parse error: {0}")]
    Parse(String),
}

/// Which part of a document to localize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every anchor in the document.
    Document,
    /// Only anchors inside elements with one of these tag names.
    Containers(Vec<String>),
}

impl Scope {
    pub fn containers<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Containers(tags.into_iter().map(Into::into).collect())
    }

    fn is_container(&self, tag: &str) -> bool {
        match self {
            Self::Document => false,
            Self::Containers(tags) => tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
        }
    }
}

/// An `<a href>` found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Decoded attribute value.
    pub href: String,
    /// Byte range of the raw attribute value in the source.
    span: Range<usize>,
    /// Whether the source value is wrapped in quotes
    quoted: bool,
}

/// A replacement for one anchor's href.
#[derive(Debug, Clone)]
pub struct Rewrite {
    anchor: Anchor,
    href: String,
}

impl Rewrite {
    pub fn new(anchor: Anchor, href: impl Into<String>) -> Self {
        Self {
            anchor,
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlDocument {
    source: String,
}

impl HtmlDocument {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Collect anchors with a valued `href`, in document order.
    pub fn anchors(&self, scope: &Scope) -> Result<Vec<Anchor>, DocumentError> {
        let tags: Vec<StartTag> = TagScanner::new(&self.source).collect();
        let containers = match scope {
            Scope::Document => None,
            Scope::Containers(_) => Some(self.container_spans(scope, &tags)?),
        };

        Ok(tags
            .iter()
            .filter(|tag| is_anchor(tag.name(&self.source)))
            .filter(|tag| {
                containers
                    .as_ref()
                    .is_none_or(|spans| spans.iter().any(|s| s.contains(&tag.start)))
            })
            .filter_map(|tag| self.anchor(tag))
            .collect())
    }

    /// Byte ranges of container elements.
    ///
    /// Only elements whose start tag the tokenizer also saw count, so markup
    /// inside scripts never opens a container.
    fn container_spans(
        &self,
        scope: &Scope,
        tags: &[StartTag],
    ) -> Result<Vec<Range<usize>>, DocumentError> {
        let dom = tl::parse(&self.source, tl::ParserOptions::default())
            .map_err(|e| DocumentError::Parse(format!("{e:?}")))?;
        let parser = dom.parser();

        let starts: Vec<usize> = tags
            .iter()
            .filter(|tag| scope.is_container(tag.name(&self.source)))
            .map(|tag| tag.start)
            .collect();

        Ok(dom
            .nodes()
            .iter()
            .filter_map(tl::Node::as_tag)
            .filter(|tag| scope.is_container(&tag.name().as_utf8_str()))
            .map(|tag| {
                let (start, end) = tag.boundaries(parser);
                start..end + 1
            })
            .filter(|span| starts.binary_search(&span.start).is_ok())
            .collect())
    }

    /// The first `href` attribute of an anchor start tag, if it has a value.
    fn anchor(&self, tag: &StartTag) -> Option<Anchor> {
        let attr = tag
            .attrs
            .iter()
            .find(|attr| self.source[attr.name.clone()].eq_ignore_ascii_case("href"))?;
        let (span, quoted) = attr.value.clone()?;

        Some(Anchor {
            href: unescape(&self.source[span.clone()]).into_owned(),
            span,
            quoted,
        })
    }

    /// Apply rewrites. Returns the number applied.
    pub fn apply(&mut self, mut rewrites: Vec<Rewrite>) -> usize {
        // Back to front so earlier spans stay valid
        rewrites.sort_by(|a, b| b.anchor.span.start.cmp(&a.anchor.span.start));
        let count = rewrites.len();
        for rewrite in rewrites {
            let value = escape_attr(&rewrite.href);
            let value = if rewrite.anchor.quoted {
                value.into_owned()
            } else {
                format!("\"{value}\"")
            };
            self.source.replace_range(rewrite.anchor.span, &value);
        }
        count
    }
}

// ============================================================================
// start tag tokenizer
// ============================================================================

/// An attribute of a start tag, as byte ranges into the source.
#[derive(Debug)]
struct Attr {
    name: Range<usize>,
    /// Value range and whether it is quoted; `None` for a bare attribute
    value: Option<(Range<usize>, bool)>,
}

#[derive(Debug)]
struct StartTag {
    /// Offset of the opening `<`
    start: usize,
    name: Range<usize>,
    attrs: Vec<Attr>,
}

impl StartTag {
    fn name<'s>(&self, source: &'s str) -> &'s str {
        &source[self.name.clone()]
    }
}

/// Yields start tags in source order.
///
/// Comments, doctypes and end tags are skipped. The content of an opaque
/// element is skipped up to its matching end tag.
struct TagScanner<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> TagScanner<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, pos: 0 }
    }

    /// Offset just past the next `>` at or after `from`.
    fn skip_past_gt(&self, from: usize) -> usize {
        self.source[from..]
            .find('>')
            .map_or(self.source.len(), |i| from + i + 1)
    }

    /// Offset of `</name` closing an opaque element, or the end of input.
    fn closing_tag(&self, from: usize, name: &str) -> usize {
        let bytes = self.source.as_bytes();
        let mut at = from;
        while let Some(i) = self.source[at..].find("</") {
            let open = at + i;
            let name_end = open + 2 + name.len();
            let matches = bytes
                .get(open + 2..name_end)
                .is_some_and(|n| n.eq_ignore_ascii_case(name.as_bytes()));
            let delimited = bytes
                .get(name_end)
                .is_none_or(|&c| c.is_ascii_whitespace() || c == b'/' || c == b'>');
            if matches && delimited {
                return open;
            }
            at = open + 2;
        }
        self.source.len()
    }

    /// Read attributes starting at `from`. Returns them with the offset
    /// just past the closing `>`.
    fn attributes(&self, from: usize) -> (Vec<Attr>, usize) {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let is_space = |i: usize| bytes[i].is_ascii_whitespace();
        let mut attrs = Vec::new();
        let mut i = from;

        loop {
            while i < len && (is_space(i) || bytes[i] == b'/') {
                i += 1;
            }
            if i >= len {
                return (attrs, len);
            }
            if bytes[i] == b'>' {
                return (attrs, i + 1);
            }

            // The first name character may be anything, even `=`
            let name_start = i;
            i += 1;
            while i < len && !is_space(i) && !matches!(bytes[i], b'/' | b'>' | b'=') {
                i += 1;
            }
            let name = name_start..i;

            while i < len && is_space(i) {
                i += 1;
            }
            if i >= len || bytes[i] != b'=' {
                attrs.push(Attr { name, value: None });
                continue;
            }

            i += 1;
            while i < len && is_space(i) {
                i += 1;
            }
            let value = match bytes.get(i) {
                Some(&(quote @ (b'"' | b'\''))) => {
                    let start = i + 1;
                    let end = bytes[start..]
                        .iter()
                        .position(|&c| c == quote)
                        .map_or(len, |p| start + p);
                    i = (end + 1).min(len);
                    (start..end, true)
                }
                _ => {
                    let start = i;
                    while i < len && !is_space(i) && bytes[i] != b'>' {
                        i += 1;
                    }
                    (start..i, false)
                }
            };
            attrs.push(Attr {
                name,
                value: Some(value),
            });
        }
    }
}

impl Iterator for TagScanner<'_> {
    type Item = StartTag;

    fn next(&mut self) -> Option<StartTag> {
        let bytes = self.source.as_bytes();

        loop {
            let start = self.pos + self.source.get(self.pos..)?.find('<')?;
            let rest = &self.source[start..];

            if let Some(body) = rest.strip_prefix("<!--") {
                self.pos = body
                    .find("-->")
                    .map_or(self.source.len(), |i| start + 4 + i + 3);
                continue;
            }

            match bytes.get(start + 1) {
                Some(b'!' | b'?' | b'/') => {
                    self.pos = self.skip_past_gt(start + 1);
                    continue;
                }
                Some(c) if c.is_ascii_alphabetic() => {}
                _ => {
                    self.pos = start + 1;
                    continue;
                }
            }

            let name_start = start + 1;
            let name_end = rest[1..]
                .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                .map_or(self.source.len(), |i| name_start + i);
            let (attrs, end) = self.attributes(name_end);

            let tag = StartTag {
                start,
                name: name_start..name_end,
                attrs,
            };
            let name = tag.name(self.source);
            self.pos = if OPAQUE_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                self.closing_tag(end, name)
            } else {
                end
            };
            return Some(tag);
        }
    }
}
