//! Core types - pure abstractions shared across the codebase.

mod link;
mod locale;
mod state;
mod visit;

pub use link::LinkKind;
pub use locale::{DEFAULT_LANGUAGE, LocalePreference, is_locale_token, normalize_locale};
pub use state::{is_shutdown, set_watching, setup_shutdown_handler};
pub use visit::{Visit, path_language};
