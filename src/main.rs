use clap::{Parser, Subcommand};
use git_testament::{git_testament, render_testament};
use tracing::Level;

use ngs_accounting::accounting::command::{report, ReportArgs};
use ngs_accounting::errors::{exit, ExitCode};
use ngs_accounting::flagstat::command::{flagstat, FlagstatArgs};
use ngs_accounting::list::command::{list, ListArgs};
use ngs_accounting::sample::command::{sample, SampleArgs};

git_testament!(TESTAMENT);

#[derive(Subcommand)]
enum Subcommands {
    /// Builds the per-sample accounting report.
    Report(ReportArgs),

    /// Computes the aligned QC metrics of a single sample.
    Sample(SampleArgs),

    /// Parses a flagstat report.
    Flagstat(FlagstatArgs),

    /// Lists supported values for certain options.
    List(ListArgs),
}

#[derive(Parser)]
#[command(
    author,
    version = render_testament!(TESTAMENT),
    propagate_version = true,
    about = "Sequencing pipeline QC accounting",
    subcommand_required = true
)]
struct Args {
    #[command(subcommand)]
    pub subcommand: Subcommands,

    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// All available information, including debug information, is printed to
    /// stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();

    let mut level = Level::INFO;
    if args.quiet {
        level = Level::ERROR;
    } else if args.verbose {
        level = Level::DEBUG;
    }

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let result = match args.subcommand {
        Subcommands::Report(args) => report(args),
        Subcommands::Sample(args) => sample(args),
        Subcommands::Flagstat(args) => flagstat(args),
        Subcommands::List(args) => list(args),
    };

    if let Err(err) = result {
        let code = ExitCode::for_error(&err);
        let message = format!("{:#}", err);
        exit(message.as_str(), code);
    }
}
