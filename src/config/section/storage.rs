//! `[storage]` section configuration.
//!
//! ```toml
//! [storage]
//! dir = ".regionlink"         # durable tier, relative to the project root; `~` expanded
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding durable preferences and the sitemap cache.
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".regionlink"),
        }
    }
}

impl StorageConfig {
    /// Expand `~` and resolve against `root`.
    pub fn normalize(&mut self, root: &Path) {
        let expanded = shellexpand::tilde(&self.dir.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        self.dir = if path.is_relative() {
            root.join(path)
        } else {
            path
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_dir_joined() {
        let mut storage = StorageConfig::default();
        storage.normalize(Path::new("/site"));
        assert_eq!(storage.dir, PathBuf::from("/site/.regionlink"));
    }

    #[test]
    fn test_absolute_dir_kept() {
        let mut storage = StorageConfig {
            dir: PathBuf::from("/var/lib/regionlink"),
        };
        storage.normalize(Path::new("/site"));
        assert_eq!(storage.dir, PathBuf::from("/var/lib/regionlink"));
    }

    #[test]
    fn test_tilde_expanded() {
        let mut storage = StorageConfig {
            dir: PathBuf::from("~/.regionlink"),
        };
        storage.normalize(Path::new("/site"));
        assert!(!storage.dir.to_string_lossy().starts_with('~'));
    }
}
