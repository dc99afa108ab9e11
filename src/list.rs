//! Functionality related to the `ngs-accounting list` subcommand.

pub mod command;
