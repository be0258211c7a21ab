//! Link localization over HTML documents.
//!
//! A pass resolves the visitor's preference, awaits one site index snapshot
//! and rewrites every in-scope anchor whose regionalized href differs from
//! its current value. Passes are idempotent: running one twice changes
//! nothing the second time.

mod document;
mod watch;

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

pub use document::{HtmlDocument, Rewrite, Scope};
pub use watch::{ContentEvent, ContentWatcher};

use crate::context::Context;
use crate::debug;
use crate::regionalize::compute_href;

/// Outcome of one localization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalizeReport {
    /// Anchors with an href in scope
    pub anchors: usize,
    /// Anchors whose href was rewritten
    pub rewritten: usize,
}

impl LocalizeReport {
    pub fn is_unchanged(&self) -> bool {
        self.rewritten == 0
    }
}

impl std::ops::AddAssign for LocalizeReport {
    fn add_assign(&mut self, other: Self) {
        self.anchors += other.anchors;
        self.rewritten += other.rewritten;
    }
}

impl fmt::Display for LocalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} links rewritten", self.rewritten, self.anchors)
    }
}

/// Applies href regionalization to documents of one page load.
pub struct LinkLocalizer<'a> {
    ctx: &'a Context,
}

impl<'a> LinkLocalizer<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Localize every anchor in `scope` of `doc`.
    ///
    /// Never fails: an unparsable document is left untouched.
    pub async fn localize(&self, doc: &mut HtmlDocument, scope: &Scope) -> LocalizeReport {
        let preference = self.ctx.preference();
        let index = self.ctx.index().await;
        let page = self.ctx.visit().url();

        let anchors = match doc.anchors(scope) {
            Ok(anchors) => anchors,
            Err(e) => {
                debug!("localize"; "skipping document: {}", e);
                return LocalizeReport::default();
            }
        };

        let total = anchors.len();
        let rewrites: Vec<Rewrite> = anchors
            .into_iter()
            .filter_map(|anchor| {
                let href = compute_href(&anchor.href, &preference, &index, page);
                (href != anchor.href).then(|| Rewrite::new(anchor, href))
            })
            .collect();

        LocalizeReport {
            anchors: total,
            rewritten: doc.apply(rewrites),
        }
    }

    /// Localize a file on disk, writing it back only when something changed.
    pub async fn localize_file(
        &self,
        path: &Path,
        scope: &Scope,
        dry: bool,
    ) -> Result<LocalizeReport> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut doc = HtmlDocument::new(source);
        let report = self.localize(&mut doc, scope).await;

        if !report.is_unchanged() && !dry {
            fs::write(path, doc.as_str())
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(report)
    }
}
