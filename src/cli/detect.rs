//! `regionlink detect`: run locale detection for a visit.

use anyhow::Result;

use super::common::page_context;
use super::VisitArgs;
use crate::config::Config;
use crate::locale::{OVERRIDE_KEY, PREFERENCE_KEY};
use crate::log;

pub fn run(config: &Config, visit: &VisitArgs) -> Result<()> {
    let ctx = page_context(config, visit)?;
    let detection = ctx.detect();

    log!("detect"; "{}", detection);
    log!("detect"; "preference: {}", ctx.preference());

    let store = ctx.preferences();
    if let Some(pref) = store.read_override() {
        log!("detect"; "{}: {}", OVERRIDE_KEY, pref);
    }
    match store.read_durable() {
        Some(pref) => log!("detect"; "{}: {}", PREFERENCE_KEY, pref),
        None => log!("detect"; "{}: (none)", PREFERENCE_KEY),
    }
    Ok(())
}
