//! Reference genomes produced by the UCSC Genome Browser group.

pub mod hg19;
