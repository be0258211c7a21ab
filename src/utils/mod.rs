//! Utility modules.

pub mod html;
