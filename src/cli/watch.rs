//! `regionlink watch`: localize, then keep localizing as content changes.
//!
//! The watcher starts before the initial pass so no change is missed. Each
//! batch of changes is handled as a new page load: preferences carry over,
//! the index comes from the durable cache until it goes stale.

use std::time::Duration;

use anyhow::{Context as _, Result, bail};

use super::common::{collect_documents, display_path, page_context};
use super::localize::localize_documents;
use super::VisitArgs;
use crate::config::Config;
use crate::context::Context;
use crate::core::{is_shutdown, set_watching};
use crate::localize::{ContentEvent, ContentWatcher, LinkLocalizer, Scope};
use crate::log;
use crate::logger::{status_error, status_success, status_unchanged};

/// How often the loop checks for shutdown while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub async fn run(config: &Config, visit: &VisitArgs) -> Result<()> {
    let content = &config.localize.content;
    if !content.is_dir() {
        bail!("content directory '{}' does not exist", content.display());
    }

    let watcher = ContentWatcher::new(content)
        .with_context(|| format!("Failed to watch {}", content.display()))?;

    let mut ctx = page_context(config, visit)?;
    log!("detect"; "{} → {}", ctx.detect(), ctx.preference());

    let scope = config.localize.scope();
    let documents = collect_documents(std::slice::from_ref(content));
    let total = localize_documents(config, &ctx, &documents, &scope, false).await?;
    log!("localize"; "{} documents, {}", documents.len(), total);

    set_watching();
    log!("watch"; "watching {} for changes", display_path(config, content));

    while !is_shutdown() {
        let Some(events) = wait_batch(&watcher) else {
            break;
        };
        if events.is_empty() {
            continue;
        }

        ctx = ctx.next_page_load(ctx.visit().clone());
        for event in &events {
            handle_event(config, &ctx, &scope, event).await;
        }
    }

    Ok(())
}

/// Wait for the next batch without stalling other tasks on this worker.
fn wait_batch(watcher: &ContentWatcher) -> Option<Vec<ContentEvent>> {
    tokio::task::block_in_place(|| watcher.next_batch(POLL_INTERVAL))
}

async fn handle_event(config: &Config, ctx: &Context, scope: &Scope, event: &ContentEvent) {
    let path = event.path();
    // Created then removed before we got to it
    if !path.is_file() {
        return;
    }

    let name = display_path(config, path);
    match LinkLocalizer::new(ctx).localize_file(path, scope, false).await {
        Ok(report) if report.is_unchanged() => status_unchanged(&name),
        Ok(report) => status_success(&format!("{name}: {report}")),
        Err(e) => status_error(&format!("failed: {name}"), &format!("{e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_handle_event_rewrites_and_settles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, r#"<main><a href="/shop">Shop</a></main>"#).unwrap();

        let mut config = crate::config::test_parse_config("");
        config.root = dir.path().to_path_buf();
        let ctx = context("/?locale=fr-CA", None, &["/fr/ca/shop"]);
        ctx.detect();

        let event = ContentEvent::Inserted(path.clone());
        handle_event(&config, &ctx, &Scope::Document, &event).await;
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"<main><a href="/fr/ca/shop">Shop</a></main>"#
        );

        // The write above shows up as another event; nothing changes the second time
        handle_event(&config, &ctx, &Scope::Document, &event).await;
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"<main><a href="/fr/ca/shop">Shop</a></main>"#
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_wait_batch_on_runtime() {
        let dir = TempDir::new().unwrap();
        let watcher = ContentWatcher::new(dir.path()).unwrap();
        let ticker = tokio::spawn(async { 7 });

        assert_eq!(wait_batch(&watcher), Some(Vec::new()));
        assert_eq!(ticker.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_handle_event_missing_file_ignored() {
        let dir = TempDir::new().unwrap();
        let config = crate::config::test_parse_config("");
        let ctx = context("/", None, &[]);
        let event = ContentEvent::Inserted(dir.path().join("gone.html"));
        handle_event(&config, &ctx, &Scope::Document, &event).await;
        assert!(!dir.path().join("gone.html").exists());
    }
}
