//! Functionality relating to the `ngs-accounting flagstat` subcommand itself.
//!
//! Parses a single `samtools flagstat` report and prints the named counters as
//! JSON. This is mostly useful for checking how a report will be read by the
//! `report` and `sample` subcommands.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::flagstat::compute;

/// Clap arguments for the `ngs-accounting flagstat` subcommand.
#[derive(Args)]
pub struct FlagstatArgs {
    /// Flagstat file to parse.
    #[arg(value_name = "FLAGSTAT")]
    src: PathBuf,
}

/// Main function for the `ngs-accounting flagstat` subcommand.
pub fn flagstat(args: FlagstatArgs) -> anyhow::Result<()> {
    info!("Starting flagstat subcommand.");

    let record = compute::parse_file(&args.src)
        .with_context(|| format!("parsing flagstat file: {}", args.src.display()))?;

    if record.is_empty() {
        warn!("{} has no counter lines", args.src.display());
    } else {
        info!("Parsed {} counters.", record.len());
    }

    for (name, counter) in record.iter() {
        debug!("{}: {} + {}", name, counter.pass, counter.fail);
    }

    let output = serde_json::to_string_pretty(&record)?;
    println!("{}", output);

    Ok(())
}
