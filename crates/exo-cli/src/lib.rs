//! CLI library components for `exoclass`.

pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
