//! `[localize]` section configuration.
//!
//! ```toml
//! [localize]
//! content = "public"                      # HTML documents, relative to the project root
//! containers = ["main", "header", "footer"]  # empty: whole document
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::localize::Scope;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizeConfig {
    /// Directory of HTML documents to localize and watch.
    pub content: PathBuf,

    /// Element names limiting which anchors are rewritten.
    pub containers: Vec<String>,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("public"),
            containers: Vec::new(),
        }
    }
}

impl LocalizeConfig {
    pub const CONTAINERS: FieldPath = FieldPath::new("localize.containers");

    pub fn scope(&self) -> Scope {
        if self.containers.is_empty() {
            Scope::Document
        } else {
            Scope::containers(self.containers.iter().cloned())
        }
    }

    pub fn normalize(&mut self, root: &Path) {
        if self.content.is_relative() {
            self.content = root.join(&self.content);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for tag in &self.containers {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                diag.error_with_hint(
                    Self::CONTAINERS,
                    format!("'{}' is not an element name", tag),
                    "use tag names like \"main\" or \"footer\"",
                );
            }
        }
    }
}
