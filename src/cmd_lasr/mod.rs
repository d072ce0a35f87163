//! Subcommand modules for the `lasr` binary.

pub mod m4;
pub mod show;
