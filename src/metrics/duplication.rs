//! Aggregation of duplicate-marking metrics.
//!
//! Duplicate marking runs once per contig and once per readgroup, leaving a
//! Picard `MarkDuplicates` metrics file behind for each run. The sections of
//! interest look like:
//!
//! ```text
//! ## METRICS CLASS	picard.sam.DuplicationMetrics
//! LIBRARY	UNPAIRED_READS_EXAMINED	READ_PAIRS_EXAMINED	...	UNPAIRED_READ_DUPLICATES	READ_PAIR_DUPLICATES	...
//! lib1	10	100	...	2	10	...
//! ```
//!
//! Columns are located by name, so files from Picard releases with extra
//! columns parse the same way. Every library row contributes its examined and
//! duplicate reads (pairs count twice) to one pooled percentage.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::errors::Error;

const METRICS_CLASS_PREFIX: &str = "## METRICS CLASS";
const UNPAIRED_READS_EXAMINED: &str = "UNPAIRED_READS_EXAMINED";
const READ_PAIRS_EXAMINED: &str = "READ_PAIRS_EXAMINED";
const UNPAIRED_READ_DUPLICATES: &str = "UNPAIRED_READ_DUPLICATES";
const READ_PAIR_DUPLICATES: &str = "READ_PAIR_DUPLICATES";

/// Read counts pooled from one or more duplication metrics rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DuplicationCounts {
    /// Reads examined for duplication.
    pub examined_reads: u64,

    /// Reads marked as duplicates.
    pub duplicate_reads: u64,
}

impl DuplicationCounts {
    /// Adds another set of counts into this one. Returns `None`, leaving the
    /// counts untouched, if either total would overflow.
    pub fn checked_add(&mut self, other: DuplicationCounts) -> Option<()> {
        let examined_reads = self.examined_reads.checked_add(other.examined_reads)?;
        let duplicate_reads = self.duplicate_reads.checked_add(other.duplicate_reads)?;

        self.examined_reads = examined_reads;
        self.duplicate_reads = duplicate_reads;
        Some(())
    }

    /// The duplicate percentage, bounded to `[0, 100]`. Zero when nothing was
    /// examined.
    pub fn percentage(&self) -> f64 {
        if self.examined_reads == 0 {
            return 0.0;
        }

        let pct = self.duplicate_reads as f64 / self.examined_reads as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }
}

fn invalid(path: &Path, reason: impl Into<String>) -> Error {
    Error::InvalidFormat {
        kind: "duplication metrics",
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// `single + 2 * pairs`, or `None` on overflow.
fn reads(single: u64, pairs: u64) -> Option<u64> {
    pairs.checked_mul(2)?.checked_add(single)
}

/// Parses the contents of one metrics file.
pub fn parse(contents: &str, path: &Path) -> Result<DuplicationCounts, Error> {
    let mut lines = contents.lines();

    if !lines.any(|line| line.starts_with(METRICS_CLASS_PREFIX)) {
        return Err(invalid(path, "no METRICS CLASS section"));
    }

    let header: Vec<&str> = match lines.next() {
        Some(line) if !line.trim().is_empty() => line.split('\t').collect(),
        _ => return Err(invalid(path, "METRICS CLASS section has no header")),
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| invalid(path, format!("missing column {}", name)))
    };

    let unpaired_examined = column(UNPAIRED_READS_EXAMINED)?;
    let pairs_examined = column(READ_PAIRS_EXAMINED)?;
    let unpaired_duplicates = column(UNPAIRED_READ_DUPLICATES)?;
    let pair_duplicates = column(READ_PAIR_DUPLICATES)?;

    let mut counts = DuplicationCounts::default();
    let mut rows = 0;

    for line in lines {
        if line.trim().is_empty() || line.starts_with('#') {
            break;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let value = |index: usize, name: &str| -> Result<u64, Error> {
            let raw = fields
                .get(index)
                .ok_or_else(|| invalid(path, format!("row {} has no {} value", rows, name)))?;

            raw.trim().parse::<u64>().map_err(|_| {
                invalid(
                    path,
                    format!("row {} has a non-integer {}: {:?}", rows, name, raw),
                )
            })
        };

        let unpaired = value(unpaired_examined, UNPAIRED_READS_EXAMINED)?;
        let pairs = value(pairs_examined, READ_PAIRS_EXAMINED)?;
        let unpaired_dups = value(unpaired_duplicates, UNPAIRED_READ_DUPLICATES)?;
        let pair_dups = value(pair_duplicates, READ_PAIR_DUPLICATES)?;

        let overflow = || invalid(path, format!("row {} read counts overflow", rows));
        let row = DuplicationCounts {
            examined_reads: reads(unpaired, pairs).ok_or_else(overflow)?,
            duplicate_reads: reads(unpaired_dups, pair_dups).ok_or_else(overflow)?,
        };
        counts.checked_add(row).ok_or_else(overflow)?;
        rows += 1;
    }

    if rows == 0 {
        return Err(invalid(path, "METRICS CLASS section has no rows"));
    }

    Ok(counts)
}

/// Reads and parses one metrics file.
pub fn parse_file<P>(src: P) -> Result<DuplicationCounts, Error>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| Error::missing_source(path, e))?;
    parse(&contents, path)
}

/// Combines any number of metrics files into one duplicate percentage. No
/// files gives `0.0`; any unreadable or malformed file fails the combination.
pub fn combine<I, P>(paths: I) -> anyhow::Result<f64>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut total = DuplicationCounts::default();
    let mut files = 0;

    for path in paths {
        let path = path.as_ref();
        let counts = parse_file(path)
            .with_context(|| format!("combining duplication metrics: {}", path.display()))?;
        debug!(
            "{}: {} of {} reads duplicated",
            path.display(),
            counts.duplicate_reads,
            counts.examined_reads
        );

        total.checked_add(counts).ok_or_else(|| {
            invalid(path, "read counts overflow when combined with earlier files")
        })?;
        files += 1;
    }

    debug!("combined {} duplication metrics files", files);
    Ok(total.percentage())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn metrics(rows: &[(u64, u64, u64, u64)]) -> String {
        let mut s = String::from(
            "## htsjdk.samtools.metrics.StringHeader\n\
             # MarkDuplicates INPUT=[S1.bam]\n\
             \n\
             ## METRICS CLASS\tpicard.sam.DuplicationMetrics\n\
             LIBRARY\tUNPAIRED_READS_EXAMINED\tREAD_PAIRS_EXAMINED\tSECONDARY_OR_SUPPLEMENTARY_RDS\t\
             UNMAPPED_READS\tUNPAIRED_READ_DUPLICATES\tREAD_PAIR_DUPLICATES\t\
             READ_PAIR_OPTICAL_DUPLICATES\tPERCENT_DUPLICATION\tESTIMATED_LIBRARY_SIZE\n",
        );

        for (i, (unpaired, pairs, unpaired_dups, pair_dups)) in rows.iter().enumerate() {
            s.push_str(&format!(
                "lib{}\t{}\t{}\t0\t0\t{}\t{}\t0\t0.1\t\n",
                i, unpaired, pairs, unpaired_dups, pair_dups
            ));
        }

        s.push_str("\n## HISTOGRAM\tjava.lang.Double\nBIN\tVALUE\n1.0\t1.0\n");
        s
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_combine_nothing_is_zero() {
        assert_eq!(combine(Vec::<PathBuf>::new()).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_pools_rows_and_counts_pairs_twice() {
        let counts = parse(&metrics(&[(10, 45, 0, 5), (0, 50, 0, 0)]), Path::new("x")).unwrap();
        assert_eq!(counts.examined_reads, 10 + 90 + 100);
        assert_eq!(counts.duplicate_reads, 10);
        assert_eq!(counts.percentage(), 5.0);
    }

    #[test]
    fn test_parse_ignores_extra_columns_by_name() {
        let contents = "## METRICS CLASS\tpicard.sam.DuplicationMetrics\n\
             READ_PAIR_DUPLICATES\tLIBRARY\tREAD_PAIRS_EXAMINED\tUNPAIRED_READ_DUPLICATES\tUNPAIRED_READS_EXAMINED\n\
             25\tlib\t100\t0\t0\n";
        let counts = parse(contents, Path::new("x")).unwrap();
        assert_eq!(counts.percentage(), 25.0);
    }

    #[test]
    fn test_combine_is_weighted_by_reads() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "S1.aln.chr1.metrics", &metrics(&[(0, 50, 0, 10)]));
        let b = write(dir.path(), "S1.aln.chr2.metrics", &metrics(&[(0, 450, 0, 0)]));

        // 20 duplicates out of 1000 reads, not the 10% average of 20% and 0%.
        let pct = combine([&a, &b]).unwrap();
        assert!((pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_is_monotonic_in_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let low = write(dir.path(), "low.metrics", &metrics(&[(0, 100, 0, 10)]));
        let high = write(dir.path(), "high.metrics", &metrics(&[(0, 100, 0, 30)]));

        assert!(combine([&high]).unwrap() > combine([&low]).unwrap());
    }

    #[test]
    fn test_combine_fails_on_any_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.metrics", &metrics(&[(0, 100, 0, 10)]));
        let bad = write(dir.path(), "bad.metrics", "no metrics here\n");

        assert!(combine([&good, &bad]).is_err());
        assert!(combine([good, dir.path().join("absent.metrics")]).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_columns_and_rows() {
        let contents = "## METRICS CLASS\tpicard.sam.DuplicationMetrics\nLIBRARY\tREAD_PAIRS_EXAMINED\nlib\t1\n";
        let err = parse(contents, Path::new("x")).unwrap_err();
        assert!(format!("{}", err).contains("UNPAIRED_READS_EXAMINED"));

        let contents = "## METRICS CLASS\tpicard.sam.DuplicationMetrics\n\
             LIBRARY\tUNPAIRED_READS_EXAMINED\tREAD_PAIRS_EXAMINED\tUNPAIRED_READ_DUPLICATES\tREAD_PAIR_DUPLICATES\n\n";
        assert!(parse(contents, Path::new("x")).is_err());
    }

    #[test]
    fn test_overflowing_read_counts_are_invalid() {
        let huge = 10_000_000_000_000_000_000;
        let err = parse(&metrics(&[(0, huge, 0, 0)]), Path::new("x")).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        assert!(format!("{}", err).contains("overflow"));

        let err = parse(&metrics(&[(0, huge / 2, 0, 0), (0, huge / 2, 0, 0)]), Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_combine_fails_when_files_overflow_together() {
        let dir = tempfile::tempdir().unwrap();
        let half = u64::MAX / 4 + 1;
        let a = write(dir.path(), "a.metrics", &metrics(&[(0, half, 0, 0)]));
        let b = write(dir.path(), "b.metrics", &metrics(&[(0, half, 0, 0)]));

        assert!(combine([&a]).is_ok());
        assert!(combine([&a, &b]).is_err());
    }

    #[test]
    fn test_percentage_is_bounded() {
        let counts = DuplicationCounts {
            examined_reads: 10,
            duplicate_reads: 20,
        };
        assert_eq!(counts.percentage(), 100.0);
    }
}
