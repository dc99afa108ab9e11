//! Parsing of `samtools flagstat` style counter files.
//!
//! Each line of a counter file has the form `<pass> + <fail> <description>`,
//! where `pass` and `fail` are the QC-passed and QC-failed read counts. The
//! line's position selects its name from [`FLAGSTAT_SCHEMA`]. Lines beyond the
//! schema are tolerated (newer samtools releases emit more of them) but are not
//! retained.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::errors::Error;

/// Names of the counter lines, in the order they appear in the file.
pub const FLAGSTAT_SCHEMA: [&str; 11] = [
    "total_reads",
    "duplicates",
    "mapped",
    "paired",
    "read1",
    "read2",
    "proper",
    "mate_mapped",
    "singletons",
    "mate_chr",
    "mate_chr_mapq5",
];

lazy_static! {
    static ref COUNTER_LINE: Regex =
        Regex::new(r"^(?P<pass>\d+) \+ (?P<fail>\d+) (?P<description>.+)$").unwrap();
    static ref PASS_PERCENTAGE: Regex = Regex::new(r"\(\s*(?P<pct>\d+(?:\.\d+)?)%").unwrap();
}

/// A single counter line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counter {
    /// Count of QC-passed reads.
    pub pass: u64,

    /// Count of QC-failed reads.
    pub fail: u64,

    /// The free text following the counts.
    pub description: String,
}

/// The counters parsed from one file, keyed by schema name and kept in schema
/// order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct CounterRecord {
    counters: IndexMap<&'static str, Counter>,
}

impl CounterRecord {
    /// Gets the counter for a schema name, if that line was present.
    pub fn get(&self, name: &str) -> Option<&Counter> {
        self.counters.get(name)
    }

    /// The QC-passed percentage samtools prints in some descriptions, such as
    /// `mapped (99.50% : N/A)`.
    pub fn percentage(&self, name: &str) -> Option<f64> {
        let counter = self.get(name)?;
        let captures = PASS_PERCENTAGE.captures(&counter.description)?;
        captures["pct"].parse().ok()
    }

    /// Number of counters in the record.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether the record holds no counters.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Iterates over `(name, counter)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Counter)> {
        self.counters.iter().map(|(name, counter)| (*name, counter))
    }
}

/// Parses counter lines. Parsing stops at the first malformed line, which is
/// reported by its zero-based index.
pub fn parse<I, S>(lines: I) -> Result<CounterRecord, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut record = CounterRecord::default();

    for (i, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let malformed = || Error::MalformedLine {
            line: i,
            content: line.to_string(),
        };

        let captures = COUNTER_LINE.captures(line).ok_or_else(malformed)?;
        let pass = captures["pass"].parse::<u64>().map_err(|_| malformed())?;
        let fail = captures["fail"].parse::<u64>().map_err(|_| malformed())?;

        match FLAGSTAT_SCHEMA.get(i) {
            Some(name) => {
                record.counters.insert(
                    name,
                    Counter {
                        pass,
                        fail,
                        description: captures["description"].to_string(),
                    },
                );
            }
            None => warn!("line {} may be extra", i),
        }
    }

    Ok(record)
}

/// Reads and parses a counter file.
pub fn parse_file<P>(src: P) -> Result<CounterRecord, Error>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| Error::missing_source(path, e))?;
    parse(contents.lines())
}
