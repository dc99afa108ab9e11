//! The pipeline passes that fill the accounting table from disk.
//!
//! Each pass reads one stage of the pipeline's outputs:
//!
//! * raw sequence files, counted per sample ([`count_sequence_files`]),
//! * unaligned BAMs, whose readgroups give the unaligned file count
//!   ([`count_unaligned_files`]),
//! * flagstat reports of the unaligned BAMs ([`parse_unaligned_reads`]),
//! * alignment directories, listed by their readgroup manifests
//!   ([`parse_aligned_stats`]).
//!
//! A sample whose outputs are missing or unreadable keeps zeroes for the
//! affected fields; only an unusable input location fails a pass.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use lazy_static::lazy_static;
use num_format::Locale;
use num_format::ToFormattedString;
use regex::Regex;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::accounting::table::AccountingTable;
use crate::accounting::table::CountField;
use crate::errors::Error;
use crate::flagstat::compute as flagstat;
use crate::sample::compute::bid_from_manifest_path;
use crate::sample::compute::build_sample_metrics;
use crate::sample::compute::SampleOptions;
use crate::utils::display::RecordCounter;
use crate::utils::formats::bam;
use crate::utils::genome::ReferenceGenome;
use crate::utils::pattern::matching_files;
use crate::utils::pattern::Pattern;

/// Raw sequence files: one per lane (1-8) and mate (1-2).
pub const SEQUENCE_FILE_PATTERN: &str = "2*_[1-8]_[12]_sequence.txt.gz";

/// Read length assumed when estimating sequencing depth, unless configured
/// otherwise.
pub const DEFAULT_READ_LENGTH: u64 = 100;

lazy_static! {
    static ref SEQUENCE_FILE_BID: Regex = Regex::new(r"(2\d+-\d+)_").unwrap();
}

/// Extracts the `bid` from the name of a raw sequence file.
pub fn bid_from_sequence_file(file_name: &str) -> Option<&str> {
    SEQUENCE_FILE_BID
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .map(|bid| bid.as_str())
}

/// Counts the raw sequence files in `seq_dir` for each sample. Returns the
/// number of files counted.
pub fn count_sequence_files(table: &mut AccountingTable, seq_dir: &Path) -> anyhow::Result<usize> {
    let pattern = Pattern::new(SEQUENCE_FILE_PATTERN)?;
    let files = matching_files(seq_dir, &pattern)
        .with_context(|| format!("listing sequence files in {}", seq_dir.display()))?;

    let mut counted = 0;
    for file in &files {
        let name = match file.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => continue,
        };

        match bid_from_sequence_file(name) {
            Some(bid) => {
                table.increment(bid, CountField::SequenceFiles);
                counted += 1;
            }
            None => debug!("no sample id in sequence file name: {}", name),
        }
    }

    info!(
        "  [*] Counted {} sequence files.",
        counted.to_formatted_string(&Locale::en)
    );
    Ok(counted)
}

fn unaligned_path(unaligned_dir: &Path, bid: &str, extension: &str) -> PathBuf {
    unaligned_dir
        .join(bid)
        .join(format!("{}.{}", bid, extension))
}

/// Counts the files represented in each known sample's unaligned BAM
/// (`<dir>/<bid>/<bid>.bam`): two per readgroup.
pub fn count_unaligned_files(table: &mut AccountingTable, unaligned_dir: &Path) {
    for bid in table.bids() {
        let path = unaligned_path(unaligned_dir, &bid, "bam");

        match bam::count_read_groups(&path) {
            Ok(read_groups) => {
                table.merge_counts(&bid, CountField::UnalignedFiles, read_groups as u64 * 2)
            }
            Err(err) => warn!(
                "[{}] unable to count readgroups in {}: {:#}",
                bid,
                path.display(),
                err
            ),
        }
    }
}

/// Sequencing depth of `total_reads` reads of `read_length` bases over
/// `genome`.
pub fn sequencing_depth(total_reads: u64, read_length: u64, genome: &dyn ReferenceGenome) -> f64 {
    if genome.size() == 0 {
        return 0.0;
    }

    total_reads as f64 * read_length as f64 / genome.size() as f64
}

fn unaligned_reads(path: &Path) -> anyhow::Result<u64> {
    let record = flagstat::parse_file(path)?;
    let counter = record
        .get("total_reads")
        .ok_or_else(|| Error::MissingField {
            field: String::from("total_reads"),
            context: path.display().to_string(),
        })?;

    Ok(counter.pass)
}

/// Reads the unaligned read count of each known sample from
/// `<dir>/<bid>/<bid>.bam.flagstats` and estimates its sequencing depth.
pub fn parse_unaligned_reads(
    table: &mut AccountingTable,
    unaligned_dir: &Path,
    genome: &dyn ReferenceGenome,
    read_length: u64,
) {
    for bid in table.bids() {
        let path = unaligned_path(unaligned_dir, &bid, "bam.flagstats");

        match unaligned_reads(&path) {
            Ok(reads) => {
                table.merge_counts(&bid, CountField::UnalignedReads, reads);
                table.set_sequencing_depth(&bid, sequencing_depth(reads, read_length, genome));
            }
            Err(err) => warn!("[{}] unaligned reads unavailable: {:#}", bid, err),
        }
    }
}

/// Gathers the aligned metrics of every sample whose readgroup manifest is
/// listed in `manifest_list`, one path per line. Returns the number of
/// samples gathered.
pub fn parse_aligned_stats(
    table: &mut AccountingTable,
    manifest_list: &Path,
    options: &SampleOptions,
) -> anyhow::Result<usize> {
    let contents =
        fs::read_to_string(manifest_list).map_err(|e| Error::missing_source(manifest_list, e))?;

    let mut counter = RecordCounter::default();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let manifest = Path::new(line);
        let bid = match bid_from_manifest_path(manifest) {
            Ok(bid) => bid,
            Err(err) => {
                warn!("skipping manifest: {:#}", err);
                continue;
            }
        };

        let metrics = build_sample_metrics(&bid, manifest, options);
        table.merge_sample_metrics(&bid, metrics);
        counter.inc();
    }

    info!(
        "  [*] Gathered aligned metrics for {} samples.",
        counter.get().to_formatted_string(&Locale::en)
    );
    Ok(counter.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounting::registry::RegistryRecord;
    use crate::metrics::coverage::tests::TinyGenome;

    fn seeded(bids: &[&str]) -> AccountingTable {
        let mut table = AccountingTable::new();
        table.clear_and_seed(bids.iter().map(|bid| RegistryRecord {
            bid: bid.to_string(),
            ..Default::default()
        }));
        table
    }

    #[test]
    fn test_bid_from_sequence_file() {
        assert_eq!(
            bid_from_sequence_file("2014-123_3_1_sequence.txt.gz"),
            Some("2014-123")
        );
        assert_eq!(bid_from_sequence_file("S1_3_1_sequence.txt.gz"), None);
    }

    #[test]
    fn test_count_sequence_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2014-123_1_1_sequence.txt.gz",
            "2014-123_1_2_sequence.txt.gz",
            "2014-124_8_1_sequence.txt.gz",
            "2014-124_9_1_sequence.txt.gz",
            "2014-124_1_3_sequence.txt.gz",
            "2014-124_1_1_sequence.txt",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let mut table = seeded(&["2014-123"]);
        assert_eq!(count_sequence_files(&mut table, dir.path()).unwrap(), 3);
        assert_eq!(table.get("2014-123").unwrap().sequence_files, 2);
        assert_eq!(table.get("2014-124").unwrap().sequence_files, 1);
    }

    #[test]
    fn test_count_sequence_files_needs_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = AccountingTable::new();
        assert!(count_sequence_files(&mut table, &dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_missing_unaligned_bam_leaves_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = seeded(&["S1"]);
        count_unaligned_files(&mut table, dir.path());
        assert_eq!(table.get("S1").unwrap().unaligned_files, 0);
    }

    #[test]
    fn test_parse_unaligned_reads() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("S1")).unwrap();
        fs::write(
            dir.path().join("S1").join("S1.bam.flagstats"),
            "2000 + 0 in total (QC-passed reads + QC-failed reads)\n0 + 0 duplicates\n",
        )
        .unwrap();

        let mut table = seeded(&["S1", "S2"]);
        parse_unaligned_reads(&mut table, dir.path(), &TinyGenome(1000), 100);

        let entry = table.get("S1").unwrap();
        assert_eq!(entry.unaligned_reads, 2000);
        assert!((entry.sequencing_depth - 200.0).abs() < 1e-9);

        let entry = table.get("S2").unwrap();
        assert_eq!(entry.unaligned_reads, 0);
        assert_eq!(entry.sequencing_depth, 0.0);
    }

    #[test]
    fn test_sequencing_depth_uses_read_length() {
        let genome = TinyGenome(1000);
        assert_eq!(sequencing_depth(10, 100, &genome), 1.0);
        assert_eq!(sequencing_depth(10, 150, &genome), 1.5);
        assert_eq!(sequencing_depth(10, 100, &TinyGenome(0)), 0.0);
    }

    #[test]
    fn test_parse_aligned_stats() {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join("S1");
        fs::create_dir_all(&sample_dir).unwrap();
        fs::write(sample_dir.join("RGfiles.txt"), "rg1.bam\nrg2.bam\n").unwrap();
        fs::write(sample_dir.join("S1.DoC"), "12.5\n").unwrap();

        let list = dir.path().join("rgfiles.list");
        fs::write(
            &list,
            format!("{}\n\nRGfiles.txt\n", sample_dir.join("RGfiles.txt").display()),
        )
        .unwrap();

        let mut table = seeded(&["S0"]);
        let options = SampleOptions {
            genome: Box::new(TinyGenome(100)),
            coverage_threshold: 8,
        };

        assert_eq!(parse_aligned_stats(&mut table, &list, &options).unwrap(), 1);
        let entry = table.get("S1").unwrap();
        assert_eq!(entry.aligned_files(), 4);
        assert_eq!(entry.aligned.mean_depth, 12.5);
        assert_eq!(table.get("S0").unwrap().aligned_files(), 0);
    }

    #[test]
    fn test_parse_aligned_stats_needs_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = AccountingTable::new();
        let options = SampleOptions::default();
        assert!(parse_aligned_stats(&mut table, &dir.path().join("absent"), &options).is_err());
    }
}
