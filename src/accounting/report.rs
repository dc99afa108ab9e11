//! Tab-delimited rendering of the accounting table.

use std::fmt::Display;
use std::io::Write;

use chrono::DateTime;
use chrono::TimeZone;

use crate::accounting::table::AccountingEntry;
use crate::accounting::table::AccountingTable;

/// Columns of the report, in order.
pub const HEADERS: [&str; 16] = [
    "BID",
    "Sample Type",
    "HGAC_files",
    "Beagle_files",
    "Unaligned_files",
    "Aligned_files",
    "Unaligned_reads",
    "Contig_rmdup_pct",
    "Readgroup_rmdup_pct",
    "total_reads",
    "mapped",
    "%mapped",
    "Sequencing_depth",
    "Doc",
    "%_8x",
    "Action",
];

/// Shown in place of a sample type the registry does not have.
pub const MISSING_SAMPLE_TYPE: &str = "NA";

/// Renders one entry as report fields, in [`HEADERS`] order.
pub fn fields(entry: &AccountingEntry) -> Vec<String> {
    let aligned = &entry.aligned;

    vec![
        entry.bid.clone(),
        entry
            .sample_type
            .clone()
            .unwrap_or_else(|| MISSING_SAMPLE_TYPE.to_string()),
        entry.registry_files.to_string(),
        entry.sequence_files.to_string(),
        entry.unaligned_files.to_string(),
        entry.aligned_files().to_string(),
        entry.unaligned_reads.to_string(),
        format!("{:.4}", aligned.contig_dup_pct),
        format!("{:.4}", aligned.readgroup_dup_pct),
        aligned.total_reads.to_string(),
        aligned.mapped_reads.to_string(),
        format!("{:.2}", aligned.pct_mapped),
        format!("{:.2}", entry.sequencing_depth),
        format!("{:.2}", aligned.mean_depth),
        format!("{:.2}", aligned.coverage_8x_pct),
        entry.action.to_string(),
    ]
}

/// Prefix of the comment line that records when a report was generated.
pub const GENERATED_PREFIX: &str = "# generated ";

/// Writes a comment line recording when the report was generated, in the
/// locale's date and time representation.
pub fn write_generated_line<W, Tz>(writer: &mut W, at: &DateTime<Tz>) -> std::io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(writer, "{}{}", GENERATED_PREFIX, at.format("%c"))
}

/// Writes the header row followed by one row per sample, ordered by `bid`.
pub fn write_report<W>(mut writer: W, table: &AccountingTable) -> std::io::Result<()>
where
    W: Write,
{
    writeln!(writer, "{}", HEADERS.join("\t"))?;

    for entry in table.snapshot() {
        writeln!(writer, "{}", fields(entry).join("\t"))?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::accounting::table::CountField;
    use crate::sample::compute::SampleMetrics;

    #[test]
    fn test_empty_table_is_just_the_header() {
        let mut out = Vec::new();
        write_report(&mut out, &AccountingTable::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", HEADERS.join("\t")));
    }

    #[test]
    fn test_rows_are_formatted_and_sorted() {
        let mut table = AccountingTable::new();
        table.merge_counts("S2", CountField::SequenceFiles, 2);
        table.merge_counts("S1", CountField::RegistryFiles, 4);
        table.merge_counts("S1", CountField::SequenceFiles, 4);
        table.merge_counts("S1", CountField::UnalignedFiles, 4);
        table.merge_counts("S1", CountField::UnalignedReads, 1000);
        table.set_sequencing_depth("S1", 1.0 / 3.0);
        table.merge_sample_metrics(
            "S1",
            SampleMetrics {
                readgroup_file_count: 2,
                contig_dup_pct: 12.345678,
                readgroup_dup_pct: 1.5,
                coverage_8x_pct: 97.126,
                mean_depth: 30.0,
                total_reads: 900,
                mapped_reads: 850,
                pct_mapped: 94.4444,
            },
        );
        table.decide_actions();

        let mut out = Vec::new();
        write_report(&mut out, &table).unwrap();
        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split('\t').count(), HEADERS.len());
        assert_eq!(
            lines[1],
            "S1\tNA\t4\t4\t4\t2\t1000\t12.3457\t1.5000\t900\t850\t94.44\t0.33\t30.00\t97.13\tAlign"
        );
        assert!(lines[2].starts_with("S2\tNA\t0\t2\t0\t0\t0\t"));
        assert!(lines[2].ends_with("\tBamify + Align"));
    }

    #[test]
    fn test_generated_line_precedes_the_header() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let mut out = Vec::new();
        write_generated_line(&mut out, &at).unwrap();
        write_report(&mut out, &AccountingTable::new()).unwrap();

        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(GENERATED_PREFIX));
        assert!(lines[0].contains("Jan"));
        assert!(lines[0].contains("03:04:05 2026"));
        assert_eq!(lines[1], HEADERS.join("\t"));
    }
}
