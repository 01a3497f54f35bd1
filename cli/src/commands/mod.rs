//! Subcommand handlers

pub mod list;
pub mod play;
