//! `ngs-accounting` is a command line tool that reconciles how many raw,
//! unaligned, and aligned data files exist for each sample of a sequencing
//! pipeline against the sample metadata registry. It also summarizes each
//! sample's alignment QC (duplication, coverage, depth, and mapping rate) and
//! recommends the next pipeline action. This package is composed of both a
//! library crate, as well as a binary crate.
//!
//! This documentation generally refers to the library crate documentation for
//! use by developers of `ngs-accounting`.
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]

pub mod accounting;
pub mod errors;
pub mod flagstat;
pub mod list;
pub mod metrics;
pub mod sample;
pub mod utils;
