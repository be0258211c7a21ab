//! `regionlink index`: load the site index and summarize it.

use anyhow::Result;

use super::common::environment;
use crate::config::Config;
use crate::log;
use crate::sitemap::SiteIndex;

pub async fn run(config: &Config, refresh: bool) -> Result<()> {
    let env = environment(config)?.with_refresh(refresh);
    let index = env.index_cache().get().await;

    log!("sitemap"; "{} paths from {}", index.len(), env.source.describe());
    for line in summary(&index) {
        log!("sitemap"; "{}", line);
    }
    Ok(())
}

/// One line per language that has regional paths.
fn summary(index: &SiteIndex) -> Vec<String> {
    index
        .languages()
        .into_iter()
        .filter_map(|lang| {
            let regions = index.regions(lang)?;
            let list: Vec<&str> = regions.iter().map(String::as_str).collect();
            Some(format!("{}: {}", lang, list.join(", ")))
        })
        .collect()
}
