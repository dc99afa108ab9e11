//! Utilities related to bioinformatics file formats.

pub mod bam;
pub mod sam;
