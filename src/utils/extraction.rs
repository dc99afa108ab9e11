//! The outcome of extracting one metric from one pipeline output.
//!
//! Every metric in the report is read from a file that may be missing,
//! truncated, or malformed. Extractors return ordinary [`anyhow::Result`]s;
//! the caller turns each of them into an [`Extraction`] and then applies the
//! zero-default policy in one place with [`Extraction::or_default`], which
//! also emits the diagnostic for the absent value.

use std::fmt;

use tracing::warn;

/// Either a successfully extracted value or the reason it is absent.
#[derive(Clone, Debug, PartialEq)]
pub enum Extraction<T> {
    /// The value was extracted.
    Present(T),

    /// The value could not be extracted.
    Absent {
        /// Human readable explanation, including the underlying cause.
        reason: String,
    },
}

impl<T> Extraction<T> {
    /// Converts the result of an extractor, rendering the full error chain
    /// into the reason on failure.
    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Extraction::Present(value),
            Err(err) => Extraction::Absent {
                reason: format!("{:#}", err),
            },
        }
    }

    /// Returns the value, or `T::default()` after logging why the value is
    /// absent. `metric` names what was being extracted and `bid` the sample
    /// it belongs to.
    pub fn or_default(self, metric: impl fmt::Display, bid: &str) -> T
    where
        T: Default,
    {
        match self {
            Extraction::Present(value) => value,
            Extraction::Absent { reason } => {
                warn!("[{}] {} unavailable, defaulting to zero: {}", bid, metric, reason);
                T::default()
            }
        }
    }
}

impl<T> From<anyhow::Result<T>> for Extraction<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        Extraction::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_present_values_pass_through() {
        let extraction: Extraction<f64> = Ok(12.5).into();
        assert_eq!(extraction, Extraction::Present(12.5));
        assert_eq!(extraction.or_default("mean depth", "S1"), 12.5);
    }

    #[test]
    fn test_absent_values_default_to_zero() {
        let result: anyhow::Result<u64> = Err(anyhow::anyhow!("no such file"));
        let extraction = Extraction::from_result(result.context("reading S1.DoC"));

        match &extraction {
            Extraction::Absent { reason } => {
                assert!(reason.contains("reading S1.DoC"));
                assert!(reason.contains("no such file"));
            }
            Extraction::Present(_) => unreachable!(),
        }

        assert_eq!(extraction.or_default("mean depth", "S1"), 0);
    }
}
