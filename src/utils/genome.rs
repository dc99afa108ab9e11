//! Utilities related to reference genomes.

pub mod ucsc;

use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use self::ucsc::hg19::Hg19;

//=================//
// Utility methods //
//=================//

/// Gets all of the supported reference genomes for the tool. When new reference
/// genomes are added, this needs to be updated.
pub fn get_all_reference_genomes() -> Vec<Box<dyn ReferenceGenome>> {
    vec![Box::new(Hg19)]
}

/// Utility method to map a string (generally passed on the command line) to a
/// reference genome. Matching is done case-insensitively against `.name()`.
pub fn get_reference_genome(s: &str) -> Option<Box<dyn ReferenceGenome>> {
    get_all_reference_genomes()
        .into_iter()
        .find(|genome| s.eq_ignore_ascii_case(genome.name()))
}

/// Parser for `--reference-genome` style arguments. Fails with a list of the
/// supported genomes when the name is unknown.
pub fn reference_genome_name(s: &str) -> Result<String, String> {
    match get_reference_genome(s) {
        Some(genome) => Ok(genome.name().to_string()),
        None => {
            let supported = get_all_reference_genomes()
                .iter()
                .map(|genome| genome.name())
                .collect::<Vec<_>>()
                .join(", ");
            Err(format!(
                "unknown reference genome: {} (supported: {})",
                s, supported
            ))
        }
    }
}

//====================//
// Types of sequences //
//====================//

/// A kind of sequence that can be included in a reference genome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceKind {
    /// A canonical sequence containing species-specific DNA.
    Chromosome,

    /// A sequence representing mitochondrial DNA.
    Mitochondrion,
}

impl FromStr for SequenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "chromosome" => Ok(SequenceKind::Chromosome),
            "mitochondrion" => Ok(SequenceKind::Mitochondrion),
            s => Err(format!("Unknown sequence kind: {}", s)),
        }
    }
}

//===========//
// Sequences //
//===========//

/// A sequence contained within a reference genome, including the name and the
/// kind of the sequence.
#[derive(Clone, Debug)]
pub struct Sequence {
    name: &'static str,
    kind: SequenceKind,
}

impl Sequence {
    /// Creates a new [`Sequence`].
    pub fn new(name: &'static str, kind: SequenceKind) -> Self {
        Self { name, kind }
    }

    /// Gives the name of the [`Sequence`].
    pub fn name(&self) -> &str {
        self.name
    }

    /// Gives the kind of the [`Sequence`].
    pub fn kind(&self) -> &SequenceKind {
        &self.kind
    }
}

/// Expands the provided arguments into a new Sequence. This is provided for
/// convenience when specifying large reference genomes.
#[macro_export]
macro_rules! sequence {
    ($name:expr,$kind:expr) => {
        Sequence::new($name, $kind.parse().unwrap())
    };
}

//==============//
// Genome Basis //
//==============//

/// The basis upon which a reference genome is created.
#[derive(Debug)]
pub enum GenomeBasis {
    /// GRCh37-based reference genomes
    GRCh37,
}

impl fmt::Display for GenomeBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GRCh37 => write!(f, "GRCh37"),
        }
    }
}

//===================//
// Reference Genomes //
//===================//

/// A struct is [`ReferenceGenome`] if it represents a reference genome that is
/// supported by this tool. The genome size is the denominator for every
/// coverage and depth calculation in the report.
pub trait ReferenceGenome: Debug {
    /// Name of the reference genome.
    fn name(&self) -> &'static str;

    /// Center that produced this reference genome.
    fn source(&self) -> &'static str;

    /// Build upon which this reference genome is based.
    fn basis(&self) -> GenomeBasis;

    /// Total size of the reference genome in base pairs.
    fn size(&self) -> u64;

    /// If available, the autosomes included in this reference genome.
    fn autosomes(&self) -> Option<Vec<Sequence>>;

    /// If available, the sex chromosomes included in this reference genome.
    fn sex_chromosomes(&self) -> Option<Vec<Sequence>>;

    /// If available, the mitochondrial DNA included in this reference genome.
    fn mitochondrion_chromosome(&self) -> Option<Sequence>;

    /// All chromosomes of the reference genome, in order: autosomes, then the
    /// sex chromosomes, then the mitochondrion.
    fn chromosomes(&self) -> Vec<Sequence> {
        let mut all: Vec<Sequence> = Vec::new();

        if let Some(autosomes) = self.autosomes() {
            all.extend(autosomes);
        }

        if let Some(sex_chromosomes) = self.sex_chromosomes() {
            all.extend(sex_chromosomes);
        }

        if let Some(mitochondrion_chromosome) = self.mitochondrion_chromosome() {
            all.push(mitochondrion_chromosome);
        }

        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let genome = get_reference_genome("HG19").unwrap();
        assert_eq!(genome.name(), "hg19");
        assert!(get_reference_genome("hg20").is_none());
    }

    #[test]
    fn test_reference_genome_name_parser() {
        assert_eq!(reference_genome_name("Hg19").unwrap(), "hg19");

        let err = reference_genome_name("mm10").unwrap_err();
        assert!(err.contains("mm10"));
        assert!(err.contains("hg19"));
    }

    #[test]
    fn test_unknown_sequence_kind() {
        assert!("decoy".parse::<SequenceKind>().is_err());
        assert_eq!(
            "Mitochondrion".parse::<SequenceKind>().unwrap(),
            SequenceKind::Mitochondrion
        );
    }
}
