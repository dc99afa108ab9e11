//! Functionality related to the `ngs-accounting flagstat` subcommand.

pub mod command;
pub mod compute;
