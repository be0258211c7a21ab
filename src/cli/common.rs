//! Common utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use jwalk::WalkDir;

use super::args::VisitArgs;
use crate::config::Config;
use crate::context::{Context, Environment};
use crate::core::Visit;
use crate::sitemap::source_for;
use crate::storage::{FileStore, MemoryStore};
use crate::debug;
use crate::utils::html::is_html_path;

/// Storage tiers and sitemap source for this invocation.
///
/// The session tier lives as long as the process.
pub fn environment(config: &Config) -> Result<Environment> {
    let source = source_for(&config.sitemap.source, config.get_root())
        .with_context(|| format!("invalid sitemap source '{}'", config.sitemap.source))?;

    let durable = FileStore::new(&config.storage.dir);
    debug!("storage"; "durable tier at {}", durable.dir().display());

    Ok(Environment::new(Arc::new(MemoryStore::new()), Arc::new(durable), source)
        .with_ttl(config.sitemap.ttl()))
}

/// The visit described by `--page` and `--lang`.
pub fn visit(config: &Config, args: &VisitArgs) -> Result<Visit> {
    let site = config.site_url()?;
    Visit::parse(&args.page, &site, args.lang.clone())
        .with_context(|| format!("invalid page URL '{}'", args.page))
}

/// Context for a first page load.
pub fn page_context(config: &Config, args: &VisitArgs) -> Result<Context> {
    Ok(Context::new(visit(config, args)?, environment(config)?))
}

/// Expand files and directories into HTML documents, sorted.
pub fn collect_documents(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = paths
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                collect_html_files(path)
            } else {
                vec![path.clone()]
            }
        })
        .collect();
    documents.sort();
    documents.dedup();
    documents
}

fn collect_html_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_html_path(p))
        .collect()
}

/// Path relative to the project root, for display.
pub fn display_path(config: &Config, path: &Path) -> String {
    path.strip_prefix(config.get_root())
        .unwrap_or(path)
        .display()
        .to_string()
}
