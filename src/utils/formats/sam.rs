//! Utilities related to Sequence Alignment Map (SAM) headers.

use anyhow::Context;
use lazy_static::lazy_static;
use noodles::sam;
use regex::Captures;
use regex::Regex;

lazy_static! {
    /// Matches the platform field of a read group header line.
    static ref PLATFORM_FIELD: Regex = Regex::new("(\tPL:)([^\t\n]+)").unwrap();
}

/// Corrects common header mistakes. See the inline comments for the things that
/// are automatically corrected.
pub fn correct_common_header_mistakes(header: &str) -> String {
    // (1) Corrects any lowercase platform units in the read group to be all
    // uppercase. This is especially important for data that contains 'illumina'
    // instead of the correct 'ILLUMINA'.
    let replaced = PLATFORM_FIELD.replace_all(header, |c: &Captures<'_>| {
        format!("{}{}", &c[1], c[2].to_uppercase())
    });

    replaced.to_string()
}

/// Parses a SAM/BAM header from a string while also correcting common header
/// mistakes.
pub fn parse_header(header: &str) -> anyhow::Result<sam::Header> {
    correct_common_header_mistakes(header)
        .parse::<sam::Header>()
        .context("parsing SAM header")
}
