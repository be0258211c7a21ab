//! `regionlink localize`: detect once, then rewrite links in documents.

use std::path::PathBuf;

use anyhow::Result;

use super::common::{collect_documents, display_path, page_context};
use super::VisitArgs;
use crate::config::Config;
use crate::context::Context;
use crate::localize::{LinkLocalizer, LocalizeReport, Scope};
use crate::{debug, log};

pub async fn run(config: &Config, paths: &[PathBuf], visit: &VisitArgs, dry: bool) -> Result<()> {
    let ctx = page_context(config, visit)?;
    let detection = ctx.detect();
    log!("detect"; "{} → {}", detection, ctx.preference());

    let targets = if paths.is_empty() {
        vec![config.localize.content.clone()]
    } else {
        paths.to_vec()
    };
    let documents = collect_documents(&targets);
    if documents.is_empty() {
        log!("localize"; "no HTML documents found");
        return Ok(());
    }

    let total = localize_documents(config, &ctx, &documents, &config.localize.scope(), dry).await?;
    log!(
        "localize";
        "{} documents, {}{}",
        documents.len(),
        total,
        if dry { " (dry run)" } else { "" }
    );
    Ok(())
}

/// One pass over `documents`, sharing the context's index snapshot.
pub async fn localize_documents(
    config: &Config,
    ctx: &Context,
    documents: &[PathBuf],
    scope: &Scope,
    dry: bool,
) -> Result<LocalizeReport> {
    let localizer = LinkLocalizer::new(ctx);
    let mut total = LocalizeReport::default();

    for path in documents {
        let report = localizer.localize_file(path, scope, dry).await?;
        debug!("localize"; "{}: {}", display_path(config, path), report);
        total += report;
    }
    Ok(total)
}
