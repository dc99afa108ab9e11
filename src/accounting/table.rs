//! The cross-sample accounting table.
//!
//! Every pipeline pass writes into one [`AccountingTable`] keyed by `bid`.
//! Entries are created on first touch and only ever removed by
//! [`AccountingTable::clear_and_seed`], so a sample found on disk but missing
//! from the registry still gets a row.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::accounting::action::decide;
use crate::accounting::action::Action;
use crate::accounting::registry::RegistryRecord;
use crate::sample::compute::SampleMetrics;

/// Everything known about one sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountingEntry {
    /// Sample id.
    pub bid: String,

    /// Sample classification from the registry.
    pub sample_type: Option<String>,

    /// Raw sequence files the registry expects.
    pub registry_files: u64,

    /// Raw sequence files found on disk.
    pub sequence_files: u64,

    /// Files represented in the unaligned BAM (two per readgroup).
    pub unaligned_files: u64,

    /// QC-passed reads in the unaligned BAM.
    pub unaligned_reads: u64,

    /// Sequencing depth estimated from the unaligned reads.
    pub sequencing_depth: f64,

    /// Aligned-stage metrics.
    pub aligned: SampleMetrics,

    /// Recommended next step.
    pub action: Action,
}

impl AccountingEntry {
    /// Creates an entry with every count at zero.
    pub fn new(bid: impl Into<String>) -> Self {
        AccountingEntry {
            bid: bid.into(),
            ..Default::default()
        }
    }

    /// Aligned sequence files (two per aligned readgroup).
    pub fn aligned_files(&self) -> u64 {
        self.aligned.readgroup_file_count
    }
}

/// The integer count fields of an [`AccountingEntry`] that the pipeline
/// passes write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountField {
    /// [`AccountingEntry::registry_files`].
    RegistryFiles,

    /// [`AccountingEntry::sequence_files`].
    SequenceFiles,

    /// [`AccountingEntry::unaligned_files`].
    UnalignedFiles,

    /// [`AccountingEntry::unaligned_reads`].
    UnalignedReads,
}

impl CountField {
    fn get_mut(self, entry: &mut AccountingEntry) -> &mut u64 {
        match self {
            CountField::RegistryFiles => &mut entry.registry_files,
            CountField::SequenceFiles => &mut entry.sequence_files,
            CountField::UnalignedFiles => &mut entry.unaligned_files,
            CountField::UnalignedReads => &mut entry.unaligned_reads,
        }
    }
}

/// Accounting entries keyed and ordered by `bid`.
#[derive(Debug, Default)]
pub struct AccountingTable {
    entries: BTreeMap<String, AccountingEntry>,
}

impl AccountingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, bid: &str) -> &mut AccountingEntry {
        self.entries
            .entry(bid.to_string())
            .or_insert_with(|| AccountingEntry::new(bid))
    }

    /// Discards every entry and seeds the table from registry records. A
    /// `bid` listed more than once keeps its last record.
    pub fn clear_and_seed<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = RegistryRecord>,
    {
        self.entries.clear();

        for record in records {
            let entry = self.entry(&record.bid);
            entry.sample_type = record.sample_type;
            entry.registry_files = record.sequence_files;
        }

        debug!("seeded accounting table with {} samples", self.len());
    }

    /// Sets a count field, replacing whatever was there.
    pub fn merge_counts(&mut self, bid: &str, field: CountField, value: u64) {
        *field.get_mut(self.entry(bid)) = value;
    }

    /// Adds one to a count field.
    pub fn increment(&mut self, bid: &str, field: CountField) {
        *field.get_mut(self.entry(bid)) += 1;
    }

    /// Sets the sequencing depth estimated from the unaligned reads.
    pub fn set_sequencing_depth(&mut self, bid: &str, depth: f64) {
        self.entry(bid).sequencing_depth = depth;
    }

    /// Stores the aligned-stage metrics of a sample, replacing earlier ones.
    pub fn merge_sample_metrics(&mut self, bid: &str, metrics: SampleMetrics) {
        self.entry(bid).aligned = metrics;
    }

    /// Decides the next action of every entry from its file counts.
    pub fn decide_actions(&mut self) {
        for entry in self.entries.values_mut() {
            entry.action = decide(
                entry.sequence_files,
                entry.unaligned_files,
                entry.aligned_files(),
            );
        }
    }

    /// The sample ids, in order.
    pub fn bids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Gets the entry of a sample.
    pub fn get(&self, bid: &str) -> Option<&AccountingEntry> {
        self.entries.get(bid)
    }

    /// Number of samples in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no samples.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, ordered by `bid`.
    pub fn snapshot(&self) -> Vec<&AccountingEntry> {
        self.entries.values().collect()
    }
}
