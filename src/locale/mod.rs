//! Locale preference resolution.
//!
//! - `store`: two-tier preference storage (session override, durable)
//! - `detect`: one-shot detection from URL and browser signals

mod detect;
mod store;

pub use detect::{Detection, LocaleDetector};
pub use store::{OVERRIDE_KEY, PREFERENCE_KEY, PreferenceStore};
