//! Functionality related to the `ngs-accounting report` command itself.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Args;
use num_format::Locale;
use num_format::ToFormattedString;
use tracing::info;
use tracing::warn;

use crate::accounting::registry::MetadataRegistry;
use crate::accounting::registry::TsvRegistry;
use crate::accounting::report::write_generated_line;
use crate::accounting::report::write_report;
use crate::accounting::sources;
use crate::accounting::table::AccountingTable;
use crate::metrics::coverage::DEFAULT_COVERAGE_THRESHOLD;
use crate::sample::compute::SampleOptions;
use crate::utils::genome::get_reference_genome;
use crate::utils::genome::reference_genome_name;

//========================//
// Command line arguments //
//========================//

/// Clap arguments for the `ngs-accounting report` subcommand.
#[derive(Args)]
pub struct ReportArgs {
    /// List of every `RGfiles.txt` path, used to locate the alignment stats of
    /// each sample.
    #[arg(short = 'r', long, value_name = "PATH")]
    readgroups_file: PathBuf,

    /// Tab-delimited export of the sample metadata registry.
    #[arg(short = 'k', long, value_name = "PATH")]
    registry: PathBuf,

    /// Directory containing the raw sequence files.
    #[arg(short = 's', long, value_name = "DIR")]
    seq_dir: PathBuf,

    /// Directory containing a directory per sample with its unaligned BAM.
    #[arg(short = 'u', long, value_name = "DIR")]
    unaligned_dir: PathBuf,

    /// Write the report here instead of to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Reference genome used for coverage and sequencing depth.
    #[arg(long, default_value = "hg19", value_parser = reference_genome_name)]
    reference_genome: String,

    /// Minimum depth for a base to count as covered.
    #[arg(long, default_value_t = DEFAULT_COVERAGE_THRESHOLD)]
    coverage_threshold: usize,

    /// Read length used to estimate sequencing depth from unaligned reads.
    #[arg(long, default_value_t = sources::DEFAULT_READ_LENGTH)]
    read_length: u64,

    /// Precede the report with a `# generated <time>` comment line.
    #[arg(long)]
    timestamp: bool,
}

//==============//
// Main command //
//==============//

fn emit<W>(mut writer: W, table: &AccountingTable, timestamp: bool) -> io::Result<()>
where
    W: Write,
{
    if timestamp {
        write_generated_line(&mut writer, &Local::now())?;
    }

    write_report(writer, table)
}

/// Main method for the `ngs-accounting report` subcommand.
pub fn report(args: ReportArgs) -> anyhow::Result<()> {
    let genome = get_reference_genome(&args.reference_genome)
        .with_context(|| format!("unknown reference genome: {}", args.reference_genome))?;

    let options = SampleOptions {
        genome,
        coverage_threshold: args.coverage_threshold,
    };

    let mut table = AccountingTable::new();

    info!("Loading samples from the registry.");
    let registry = TsvRegistry::new(&args.registry);
    let records = registry.records()?;
    table.clear_and_seed(records);
    if table.is_empty() {
        warn!("The registry lists no samples; rows will only come from disk.");
    } else {
        info!(
            "  [*] {} samples registered.",
            table.len().to_formatted_string(&Locale::en)
        );
    }

    info!("Counting sequence files.");
    sources::count_sequence_files(&mut table, &args.seq_dir)?;

    info!("Counting unaligned files.");
    sources::count_unaligned_files(&mut table, &args.unaligned_dir);

    info!("Counting unaligned reads.");
    sources::parse_unaligned_reads(
        &mut table,
        &args.unaligned_dir,
        options.genome.as_ref(),
        args.read_length,
    );

    info!("Gathering aligned stats.");
    sources::parse_aligned_stats(&mut table, &args.readgroups_file, &options)?;

    info!("Determining next actions.");
    table.decide_actions();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating report: {}", path.display()))?;
            emit(BufWriter::new(file), &table, args.timestamp)
                .with_context(|| format!("writing report: {}", path.display()))?;
            info!("Wrote report to {}.", path.display());
        }
        None => {
            let stdout = io::stdout();
            emit(stdout.lock(), &table, args.timestamp).context("writing report to stdout")?;
        }
    }

    Ok(())
}
