//! Coverage breadth from a per-depth histogram.
//!
//! The histogram file has one whitespace-delimited row per depth, starting at
//! depth zero, with the number of bases observed at that depth in the third
//! field (the layout `bedtools genomecov` writes for its `genome` rows).

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context;
use tracing::warn;

use crate::errors::Error;
use crate::utils::genome::ReferenceGenome;
use crate::utils::histogram::Histogram;

/// Depth at or above which a base counts as covered, unless configured
/// otherwise.
pub const DEFAULT_COVERAGE_THRESHOLD: usize = 8;

/// Index of the base count within a histogram row.
const BASE_COUNT_FIELD: usize = 2;

/// Loads histogram rows into a [`Histogram`] indexed by depth.
pub fn load_histogram<I, S>(lines: I) -> anyhow::Result<Histogram>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = Vec::new();

    for (depth, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let field = match line.split_whitespace().nth(BASE_COUNT_FIELD) {
            Some(field) => field,
            None => bail!("depth {} has no base count: {:?}", depth, line),
        };

        let count = field
            .parse::<u64>()
            .with_context(|| format!("depth {} has a non-integer base count: {:?}", depth, field))?;
        counts.push(count);
    }

    let mut histogram = Histogram::zero_based_with_capacity(counts.len().saturating_sub(1));
    for (depth, count) in counts.into_iter().enumerate() {
        histogram
            .increment_by(depth, count)
            .map_err(|_| anyhow!("depth {} is outside of the histogram", depth))?;
    }

    Ok(histogram)
}

/// Percent of `genome` covered at a depth of at least `threshold`.
pub fn coverage_at_or_above<I, S>(
    lines: I,
    threshold: usize,
    genome: &dyn ReferenceGenome,
) -> anyhow::Result<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if genome.size() == 0 {
        bail!("reference genome {} has a size of zero", genome.name());
    }

    let histogram = load_histogram(lines)?;
    let covered = histogram.count_from_top_until(threshold).ok_or_else(|| {
        anyhow!(
            "bases covered at >= {}x overflow a 64-bit count",
            threshold
        )
    })?;
    let pct = covered as f64 / genome.size() as f64 * 100.0;

    if pct > 100.0 {
        warn!(
            "{} bases covered at >= {}x exceeds the size of {}; capping at 100%",
            covered,
            threshold,
            genome.name()
        );
        return Ok(100.0);
    }

    Ok(pct)
}

/// Reads a histogram file and computes [`coverage_at_or_above`].
pub fn from_file<P>(src: P, threshold: usize, genome: &dyn ReferenceGenome) -> anyhow::Result<f64>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| Error::missing_source(path, e))?;
    coverage_at_or_above(contents.lines(), threshold, genome)
        .with_context(|| format!("computing coverage from {}", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::utils::genome::{GenomeBasis, Sequence};

    /// A reference genome of arbitrary size for exercising the arithmetic.
    #[derive(Debug)]
    pub(crate) struct TinyGenome(pub u64);

    impl ReferenceGenome for TinyGenome {
        fn name(&self) -> &'static str {
            "tiny"
        }

        fn source(&self) -> &'static str {
            "tests"
        }

        fn basis(&self) -> GenomeBasis {
            GenomeBasis::GRCh37
        }

        fn size(&self) -> u64 {
            self.0
        }

        fn autosomes(&self) -> Option<Vec<Sequence>> {
            None
        }

        fn sex_chromosomes(&self) -> Option<Vec<Sequence>> {
            None
        }

        fn mitochondrion_chromosome(&self) -> Option<Sequence> {
            None
        }
    }

    pub(crate) fn histogram_rows(counts: &[u64]) -> Vec<String> {
        counts
            .iter()
            .enumerate()
            .map(|(depth, count)| format!("genome\t{}\t{}\t100\t0.1", depth, count))
            .collect()
    }

    #[test]
    fn test_coverage_at_8x() {
        let rows = histogram_rows(&[10, 10, 10, 10, 10, 10, 10, 10, 5, 5]);
        let pct = coverage_at_or_above(&rows, 8, &TinyGenome(100)).unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_zero_counts_everything() {
        let rows = histogram_rows(&[10, 20, 30]);
        let pct = coverage_at_or_above(&rows, 0, &TinyGenome(100)).unwrap();
        assert!((pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_histogram_is_not_covered() {
        let rows = histogram_rows(&[10, 20, 30]);
        assert_eq!(coverage_at_or_above(&rows, 8, &TinyGenome(100)).unwrap(), 0.0);
        assert_eq!(
            coverage_at_or_above(Vec::<String>::new(), 8, &TinyGenome(100)).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_malformed_rows_are_errors() {
        let rows = ["genome 0 10", "genome 1"];
        assert!(coverage_at_or_above(rows, 0, &TinyGenome(100)).is_err());

        let rows = ["genome 0 ten"];
        assert!(coverage_at_or_above(rows, 0, &TinyGenome(100)).is_err());
    }

    #[test]
    fn test_zero_size_genome_is_an_error() {
        let rows = histogram_rows(&[1]);
        assert!(coverage_at_or_above(&rows, 0, &TinyGenome(0)).is_err());
    }

    #[test]
    fn test_coverage_is_capped() {
        let rows = histogram_rows(&[0, 500]);
        assert_eq!(coverage_at_or_above(&rows, 1, &TinyGenome(100)).unwrap(), 100.0);
    }

    #[test]
    fn test_overflowing_base_counts_are_errors() {
        let rows = histogram_rows(&[0, u64::MAX, 1]);
        assert!(coverage_at_or_above(&rows, 1, &TinyGenome(100)).is_err());

        // Bins below the threshold are never summed.
        let pct = coverage_at_or_above(&rows, 2, &TinyGenome(100)).unwrap();
        assert!((pct - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = from_file(dir.path().join("S1.coverage"), 8, &TinyGenome(100)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingSource { .. })
        ));
    }
}
