//! Functionality related to the `ngs-accounting sample` command.

pub mod command;
pub mod compute;
