//! Command-line interface module.

mod args;
pub mod common;
pub mod detect;
pub mod href;
pub mod index;
pub mod localize;
pub mod watch;

pub use args::{Cli, Commands, VisitArgs};
