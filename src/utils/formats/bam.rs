//! Utilities related to opening Binary Alignment Map (BAM) files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use tracing::debug;

use crate::errors::Error;

/// Attempts to open a BAM file from a given source.
fn open<P>(src: P) -> anyhow::Result<bam::Reader<bgzf::Reader<BufReader<File>>>>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("bam") => {}
        _ => bail!("not a BAM file: {}", path.display()),
    }

    let file = File::open(path).map_err(|e| Error::missing_source(path, e))?;
    Ok(bam::Reader::new(BufReader::new(file)))
}

/// Opens a BAM file and parses only its header. No records are read.
pub fn read_header<P>(src: P) -> anyhow::Result<sam::Header>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    debug!("reading BAM header from {}", path.display());

    let mut reader = open(path)?;
    let raw_header = reader
        .read_header()
        .with_context(|| format!("reading header of {}", path.display()))?
        .to_string();

    super::sam::parse_header(&raw_header)
        .with_context(|| format!("parsing header of {}", path.display()))
}

/// Counts the read groups (`@RG` header records) declared by a BAM file.
pub fn count_read_groups<P>(src: P) -> anyhow::Result<usize>
where
    P: AsRef<Path>,
{
    Ok(read_header(src)?.read_groups().len())
}
