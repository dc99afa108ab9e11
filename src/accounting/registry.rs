//! The external metadata registry that seeds the accounting table.
//!
//! The registry is the source of record for which samples exist, how they are
//! classified, and how many raw sequence files are expected for each. It is
//! read through the [`MetadataRegistry`] trait; [`TsvRegistry`] reads a
//! tab-delimited export of it.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::errors::Error;

/// Column holding the sample id.
pub const BID_COLUMN: &str = "BID";

/// Column holding the sample's classification.
pub const SAMPLE_TYPE_COLUMN: &str = "Sample Type";

/// Column holding the number of raw sequence files the registry expects.
pub const SEQUENCE_FILES_COLUMN: &str = "Total # of Sequence Files from PE runs (AD)";

/// One sample as known to the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryRecord {
    /// Sample id.
    pub bid: String,

    /// Sample classification, if the registry has one.
    pub sample_type: Option<String>,

    /// Raw sequence files the registry expects for the sample.
    pub sequence_files: u64,
}

/// A source of [`RegistryRecord`]s. Failing to produce the records is fatal
/// to the run, so implementations report every failure as
/// [`Error::Registry`].
pub trait MetadataRegistry {
    /// Fetches every sample known to the registry.
    fn records(&self) -> Result<Vec<RegistryRecord>, Error>;
}

/// A registry read from a tab-delimited export with a header row.
#[derive(Clone, Debug)]
pub struct TsvRegistry {
    path: PathBuf,
}

impl TsvRegistry {
    /// Creates a registry backed by the export at `path`. The file is not read
    /// until [`MetadataRegistry::records`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TsvRegistry { path: path.into() }
    }

    /// The export's location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataRegistry for TsvRegistry {
    fn records(&self) -> Result<Vec<RegistryRecord>, Error> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            Error::Registry(format!("unable to read {}: {}", self.path.display(), e))
        })?;

        parse_export(&contents)
    }
}

/// Parses the contents of a registry export.
pub fn parse_export(contents: &str) -> Result<Vec<RegistryRecord>, Error> {
    let mut lines = contents.lines().enumerate();

    let header: Vec<&str> = match lines.next() {
        Some((_, line)) if !line.trim().is_empty() => line.split('\t').map(str::trim).collect(),
        _ => return Err(Error::Registry(String::from("export has no header row"))),
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| Error::Registry(format!("export has no '{}' column", name)))
    };

    let bid_column = column(BID_COLUMN)?;
    let sample_type_column = column(SAMPLE_TYPE_COLUMN)?;
    let sequence_files_column = column(SEQUENCE_FILES_COLUMN)?;

    let mut records = Vec::new();

    for (i, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let field = |index: usize| fields.get(index).copied().unwrap_or("");

        let bid = field(bid_column);
        if bid.is_empty() {
            return Err(Error::Registry(format!("line {} has no {}", i, BID_COLUMN)));
        }

        let sample_type = match field(sample_type_column) {
            "" => None,
            s => Some(s.to_string()),
        };

        let raw_count = field(sequence_files_column);
        let sequence_files = match raw_count.parse::<u64>() {
            Ok(count) => count,
            Err(_) if raw_count.is_empty() => 0,
            Err(_) => {
                warn!(
                    "[{}] registry sequence file count is not a number ({:?}), using zero",
                    bid, raw_count
                );
                0
            }
        };

        records.push(RegistryRecord {
            bid: bid.to_string(),
            sample_type,
            sequence_files,
        });
    }

    debug!("read {} records from the registry", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
BID\tProject\tSample Type\tTotal # of Sequence Files from PE runs (AD)
2014-001\tP1\tTumor\t8
2014-002\tP1\t\t4

2014-003\tP2\tGermline\tn/a
";

    #[test]
    fn test_parse_export() {
        let records = parse_export(EXPORT).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(
            records[0],
            RegistryRecord {
                bid: String::from("2014-001"),
                sample_type: Some(String::from("Tumor")),
                sequence_files: 8,
            }
        );
        assert_eq!(records[1].sample_type, None);
        assert_eq!(records[1].sequence_files, 4);
        assert_eq!(records[2].sequence_files, 0);
    }

    #[test]
    fn test_missing_column_is_a_registry_error() {
        let err = parse_export("BID\tSample Type\n2014-001\tTumor\n").unwrap_err();
        match err {
            Error::Registry(reason) => assert!(reason.contains(SEQUENCE_FILES_COLUMN)),
            other => panic!("expected registry error, got {:?}", other),
        }

        assert!(matches!(parse_export(""), Err(Error::Registry(_))));
    }

    #[test]
    fn test_empty_bid_is_a_registry_error() {
        let export = "BID\tSample Type\tTotal # of Sequence Files from PE runs (AD)\n\tTumor\t2\n";
        assert!(matches!(parse_export(export), Err(Error::Registry(_))));
    }

    #[test]
    fn test_unreadable_export_is_a_registry_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TsvRegistry::new(dir.path().join("registry.tsv"));
        assert!(matches!(registry.records(), Err(Error::Registry(_))));

        fs::write(registry.path(), EXPORT).unwrap();
        assert_eq!(registry.records().unwrap().len(), 3);
    }
}
