//! Extractors for the QC metrics written by the alignment pipeline.
//!
//! Each extractor reads one kind of file and returns an [`anyhow::Result`];
//! deciding what a failure means for the report is left to the caller.

pub mod coverage;
pub mod depth;
pub mod duplication;
