//! The UCSC hg19 build of the human reference genome (GRCh37 based), with
//! `chr`-prefixed sequence names and the mitochondrion named `chrM`.
//!
//! Link: https://hgdownload.soe.ucsc.edu/goldenPath/hg19/bigZips/

use crate::{
    sequence,
    utils::genome::{GenomeBasis, ReferenceGenome, Sequence},
};

/// Total size of hg19 in base pairs.
pub const HG19_SIZE: u64 = 3_101_804_739;

/// The UCSC hg19 reference genome.
#[derive(Debug)]
pub struct Hg19;

impl ReferenceGenome for Hg19 {
    fn name(&self) -> &'static str {
        "hg19"
    }

    fn source(&self) -> &'static str {
        "UCSC"
    }

    fn basis(&self) -> GenomeBasis {
        GenomeBasis::GRCh37
    }

    fn size(&self) -> u64 {
        HG19_SIZE
    }

    fn autosomes(&self) -> Option<Vec<Sequence>> {
        Some(vec![
            sequence!("chr1", "chromosome"),
            sequence!("chr2", "chromosome"),
            sequence!("chr3", "chromosome"),
            sequence!("chr4", "chromosome"),
            sequence!("chr5", "chromosome"),
            sequence!("chr6", "chromosome"),
            sequence!("chr7", "chromosome"),
            sequence!("chr8", "chromosome"),
            sequence!("chr9", "chromosome"),
            sequence!("chr10", "chromosome"),
            sequence!("chr11", "chromosome"),
            sequence!("chr12", "chromosome"),
            sequence!("chr13", "chromosome"),
            sequence!("chr14", "chromosome"),
            sequence!("chr15", "chromosome"),
            sequence!("chr16", "chromosome"),
            sequence!("chr17", "chromosome"),
            sequence!("chr18", "chromosome"),
            sequence!("chr19", "chromosome"),
            sequence!("chr20", "chromosome"),
            sequence!("chr21", "chromosome"),
            sequence!("chr22", "chromosome"),
        ])
    }

    fn sex_chromosomes(&self) -> Option<Vec<Sequence>> {
        Some(vec![
            sequence!("chrX", "chromosome"),
            sequence!("chrY", "chromosome"),
        ])
    }

    fn mitochondrion_chromosome(&self) -> Option<Sequence> {
        Some(sequence!("chrM", "mitochondrion"))
    }
}
