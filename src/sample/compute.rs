//! Module holding the logic for gathering the aligned-stage metrics of one
//! sample.
//!
//! A sample's alignment directory holds its readgroup manifest (`RGfiles.txt`)
//! next to the QC outputs of the pipeline:
//!
//! | File                  | Metric                                  |
//! |-----------------------|-----------------------------------------|
//! | `<bid>.aln*metrics`   | contig-level duplication                |
//! | `<bid>.<bid>*metrics` | readgroup-level duplication             |
//! | `<bid>.coverage`      | percent of the genome covered at >= 8x  |
//! | `<bid>.DoC`           | mean depth of coverage                  |
//! | `<bid>.bam.flagstat`  | total, mapped, and percent mapped reads |
//!
//! Every metric is extracted independently. A missing or malformed file only
//! zeroes the metrics that depend on it and never prevents a [`SampleMetrics`]
//! from being produced.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::errors::Error;
use crate::flagstat::compute as flagstat;
use crate::metrics::coverage;
use crate::metrics::depth;
use crate::metrics::duplication;
use crate::utils::extraction::Extraction;
use crate::utils::genome::ucsc::hg19::Hg19;
use crate::utils::genome::ReferenceGenome;
use crate::utils::pattern;
use crate::utils::pattern::matching_files;
use crate::utils::pattern::Pattern;

/// Aligned-stage QC metrics for one sample. Any metric that could not be
/// extracted is zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SampleMetrics {
    /// Number of aligned sequence files: two mates per readgroup.
    pub readgroup_file_count: u64,

    /// Duplicate percentage pooled over the contig-level metrics files.
    pub contig_dup_pct: f64,

    /// Duplicate percentage pooled over the readgroup-level metrics files.
    pub readgroup_dup_pct: f64,

    /// Percent of the reference genome covered at or above the threshold depth.
    pub coverage_8x_pct: f64,

    /// Mean depth of coverage.
    pub mean_depth: f64,

    /// QC-passed reads in the aligned BAM.
    pub total_reads: u64,

    /// QC-passed mapped reads in the aligned BAM.
    pub mapped_reads: u64,

    /// Percent of reads mapped.
    pub pct_mapped: f64,
}

/// Options controlling how a sample's metrics are computed.
#[derive(Debug)]
pub struct SampleOptions {
    /// Reference genome used as the denominator for coverage.
    pub genome: Box<dyn ReferenceGenome>,

    /// Minimum depth for a base to count as covered.
    pub coverage_threshold: usize,
}

impl Default for SampleOptions {
    fn default() -> Self {
        SampleOptions {
            genome: Box::new(Hg19),
            coverage_threshold: coverage::DEFAULT_COVERAGE_THRESHOLD,
        }
    }
}

/// The locations of a sample's QC outputs within its alignment directory.
#[derive(Clone, Debug)]
pub struct SampleFiles {
    /// Directory holding the manifest and the QC outputs.
    pub dir: PathBuf,

    /// Glob selecting contig-level duplication metrics.
    pub contig_metrics: String,

    /// Glob selecting readgroup-level duplication metrics.
    pub readgroup_metrics: String,

    /// Per-depth coverage histogram.
    pub coverage: PathBuf,

    /// Mean depth of coverage.
    pub depth_of_coverage: PathBuf,

    /// Flagstat report of the aligned BAM.
    pub flagstat: PathBuf,
}

/// Lays out the QC outputs of `bid` within `dir`. Glob metacharacters in
/// `bid` are escaped in the metrics globs.
pub fn sample_files(bid: &str, dir: &Path) -> SampleFiles {
    let glob_bid = pattern::escape(bid);

    SampleFiles {
        dir: dir.to_path_buf(),
        contig_metrics: format!("{}.aln*metrics", glob_bid),
        readgroup_metrics: format!("{}.{}*metrics", glob_bid, glob_bid),
        coverage: dir.join(format!("{}.coverage", bid)),
        depth_of_coverage: dir.join(format!("{}.DoC", bid)),
        flagstat: dir.join(format!("{}.bam.flagstat", bid)),
    }
}

/// Reads and mapped reads taken from a flagstat report.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MappingStats {
    /// QC-passed reads.
    pub total_reads: u64,

    /// QC-passed mapped reads.
    pub mapped_reads: u64,

    /// Percent of reads mapped.
    pub pct_mapped: f64,
}

impl MappingStats {
    /// Extracts the mapping stats from a parsed flagstat report. The percentage
    /// printed in the `mapped` line is used when present; otherwise it is
    /// derived from the counts.
    pub fn from_record(record: &flagstat::CounterRecord) -> Result<Self, Error> {
        let counter = |name: &str| {
            record.get(name).ok_or_else(|| Error::MissingField {
                field: name.to_string(),
                context: String::from("flagstat report"),
            })
        };

        let total_reads = counter("total_reads")?.pass;
        let mapped_reads = counter("mapped")?.pass;

        let pct_mapped = match record.percentage("mapped") {
            Some(pct) => pct,
            None if total_reads == 0 => 0.0,
            None => mapped_reads as f64 / total_reads as f64 * 100.0,
        };

        Ok(MappingStats {
            total_reads,
            mapped_reads,
            pct_mapped: pct_mapped.clamp(0.0, 100.0),
        })
    }

    /// Reads a flagstat report and extracts the mapping stats.
    pub fn from_file<P>(src: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = src.as_ref();
        let record = flagstat::parse_file(path)?;
        Ok(Self::from_record(&record).with_context(|| format!("reading {}", path.display()))?)
    }
}

/// Derives a sample's `bid` from the path of its manifest: the name of the
/// directory holding the manifest.
pub fn bid_from_manifest_path(manifest: &Path) -> anyhow::Result<String> {
    let bid = manifest
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str());

    match bid {
        Some(bid) if !bid.is_empty() => Ok(bid.to_string()),
        _ => bail!(
            "cannot derive a sample id from manifest path: {}",
            manifest.display()
        ),
    }
}

/// Counts the aligned sequence files listed by a readgroup manifest: each
/// non-empty line is one readgroup, and each readgroup has two mate files.
pub fn readgroup_file_count(manifest: &Path) -> anyhow::Result<u64> {
    let contents = fs::read_to_string(manifest).map_err(|e| Error::missing_source(manifest, e))?;
    let readgroups = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count() as u64;

    Ok(readgroups * 2)
}

/// Pools the duplication metrics files matching `glob` within `dir`.
pub fn duplication_pct(dir: &Path, glob: &str) -> anyhow::Result<f64> {
    let pattern = Pattern::new(glob)?;
    let files = matching_files(dir, &pattern)?;
    debug!(
        "{} duplication metrics files match {}",
        files.len(),
        pattern.as_str()
    );
    duplication::combine(&files)
}

/// Builds the [`SampleMetrics`] for `bid` from the manifest at
/// `manifest_path` and the QC outputs next to it.
pub fn build_sample_metrics(bid: &str, manifest_path: &Path, options: &SampleOptions) -> SampleMetrics {
    let dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let files = sample_files(bid, dir);

    let readgroup_file_count =
        Extraction::from(readgroup_file_count(manifest_path)).or_default("readgroup file count", bid);

    let contig_dup_pct = Extraction::from(duplication_pct(&files.dir, &files.contig_metrics))
        .or_default("contig duplication", bid);

    let readgroup_dup_pct = Extraction::from(duplication_pct(&files.dir, &files.readgroup_metrics))
        .or_default("readgroup duplication", bid);

    let coverage_8x_pct = Extraction::from(coverage::from_file(
        &files.coverage,
        options.coverage_threshold,
        options.genome.as_ref(),
    ))
    .or_default(
        format!("coverage at {}x", options.coverage_threshold),
        bid,
    );

    let mean_depth =
        Extraction::from(depth::from_file(&files.depth_of_coverage)).or_default("mean depth", bid);

    let mapping =
        Extraction::from(MappingStats::from_file(&files.flagstat)).or_default("mapping stats", bid);

    SampleMetrics {
        readgroup_file_count,
        contig_dup_pct,
        readgroup_dup_pct,
        coverage_8x_pct,
        mean_depth,
        total_reads: mapping.total_reads,
        mapped_reads: mapping.mapped_reads,
        pct_mapped: mapping.pct_mapped,
    }
}
