//! Errors and exit codes used across the `ngs-accounting` subcommands.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

/// Error type for the parsing and accounting operations in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A line in a counter (flagstat) file did not match the expected grammar.
    /// The line index is zero-based.
    #[error("line {line} malformed: {content:?}")]
    MalformedLine {
        /// Zero-based index of the offending line.
        line: usize,

        /// The content of the offending line.
        content: String,
    },

    /// A source file could not be opened or read.
    #[error("unable to read {}: {source}", path.display())]
    MissingSource {
        /// Path to the file that could not be read.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// A required field was not present in a parsed source.
    #[error("field '{field}' not found in {context}")]
    MissingField {
        /// Name of the missing field.
        field: String,

        /// Where the field was expected.
        context: String,
    },

    /// A file was readable but its contents did not follow the expected format.
    #[error("invalid {kind} file '{}': {reason}", path.display())]
    InvalidFormat {
        /// The kind of file (e.g., "duplication metrics").
        kind: &'static str,

        /// Path to the file.
        path: PathBuf,

        /// Explanation of the problem.
        reason: String,
    },

    /// The metadata registry could not be read. This is always fatal, as the
    /// accounting table cannot be seeded without it.
    #[error("metadata registry unavailable: {0}")]
    Registry(String),
}

impl Error {
    /// Wraps an [`io::Error`] encountered while reading `path`.
    pub fn missing_source(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::MissingSource {
            path: path.into(),
            source,
        }
    }
}

/// Process exit codes for fatal errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    /// Indicates that invalid data was supplied to the given subcommand.
    InvalidInputData = 1,

    /// Indicates that the metadata registry could not be queried. Distinct
    /// from the status of 2 that clap uses for usage errors.
    RegistryUnavailable = 3,
}

impl ExitCode {
    /// The process status for this exit code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Chooses the exit code for an error that escaped a subcommand.
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(Error::Registry(_)) => ExitCode::RegistryUnavailable,
            _ => ExitCode::InvalidInputData,
        }
    }
}

/// Logs the message as an error and terminates the process with `code`.
pub fn exit<I>(message: I, code: ExitCode) -> !
where
    I: tracing::Value,
{
    error!(message);
    std::process::exit(code.code());
}
