//! Mean depth of coverage.
//!
//! The depth-of-coverage file holds a single floating point value on its
//! first line; anything after that line is ignored.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use anyhow::bail;
use anyhow::Context;

use crate::errors::Error;

/// Reads the mean depth from the first line of `reader`.
pub fn read_mean_depth<R>(reader: R) -> anyhow::Result<f64>
where
    R: BufRead,
{
    let line = match reader.lines().next() {
        Some(line) => line.context("reading depth of coverage")?,
        None => bail!("depth of coverage source is empty"),
    };

    let value = line.trim();
    let depth = value
        .parse::<f64>()
        .with_context(|| format!("depth of coverage is not a number: {:?}", value))?;

    if !depth.is_finite() || depth < 0.0 {
        bail!("depth of coverage out of range: {}", depth);
    }

    Ok(depth)
}

/// Opens a depth-of-coverage file and reads its mean depth.
pub fn from_file<P>(src: P) -> anyhow::Result<f64>
where
    P: AsRef<Path>,
{
    let path = src.as_ref();
    let file = File::open(path).map_err(|e| Error::missing_source(path, e))?;
    read_mean_depth(BufReader::new(file)).with_context(|| format!("reading {}", path.display()))
}
