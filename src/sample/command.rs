//! Functionality related to the `ngs-accounting sample` command itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::metrics::coverage::DEFAULT_COVERAGE_THRESHOLD;
use crate::sample::compute::bid_from_manifest_path;
use crate::sample::compute::build_sample_metrics;
use crate::sample::compute::SampleOptions;
use crate::utils::display::PercentageFormat;
use crate::utils::genome::get_reference_genome;
use crate::utils::genome::reference_genome_name;

//========================//
// Command line arguments //
//========================//

/// Clap arguments for the `ngs-accounting sample` subcommand.
#[derive(Args)]
pub struct SampleArgs {
    /// Readgroup manifest (`RGfiles.txt`) within the sample's alignment
    /// directory.
    #[arg(value_name = "RGFILES")]
    manifest: PathBuf,

    /// Sample id. Defaults to the name of the manifest's directory.
    #[arg(short, long)]
    bid: Option<String>,

    /// Reference genome used as the denominator for coverage.
    #[arg(long, default_value = "hg19", value_parser = reference_genome_name)]
    reference_genome: String,

    /// Minimum depth for a base to count as covered.
    #[arg(long, default_value_t = DEFAULT_COVERAGE_THRESHOLD)]
    coverage_threshold: usize,
}

//==============//
// Main command //
//==============//

/// Main method for the `ngs-accounting sample` subcommand.
pub fn sample(args: SampleArgs) -> anyhow::Result<()> {
    let bid = match args.bid {
        Some(bid) => bid,
        None => bid_from_manifest_path(&args.manifest)?,
    };

    let genome = get_reference_genome(&args.reference_genome)
        .with_context(|| format!("unknown reference genome: {}", args.reference_genome))?;

    let options = SampleOptions {
        genome,
        coverage_threshold: args.coverage_threshold,
    };

    info!("Computing aligned metrics for {}.", bid);
    let metrics = build_sample_metrics(&bid, &args.manifest, &options);
    info!(
        "  [*] {} of reads mapped.",
        PercentageFormat(metrics.mapped_reads, metrics.total_reads)
    );

    let output = serde_json::to_string_pretty(&metrics)?;
    println!("{}", output);

    Ok(())
}
