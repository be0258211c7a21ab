//! `regionlink href`: regionalize a single href.

use anyhow::Result;

use super::common::page_context;
use super::VisitArgs;
use crate::config::Config;
use crate::debug;
use crate::regionalize::compute_href;

/// Prints the result on stdout, unprefixed, for use in scripts.
pub async fn run(config: &Config, href: &str, visit: &VisitArgs) -> Result<()> {
    let ctx = page_context(config, visit)?;
    let detection = ctx.detect();
    let preference = ctx.preference();
    debug!("detect"; "{} → {}", detection, preference);

    let index = ctx.index().await;
    println!("{}", compute_href(href, &preference, &index, ctx.visit().url()));
    Ok(())
}
