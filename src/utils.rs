//! Utilities that are used across the `ngs-accounting` subcommands.

pub mod display;
pub mod extraction;
pub mod formats;
pub mod genome;
pub mod histogram;
pub mod pattern;
