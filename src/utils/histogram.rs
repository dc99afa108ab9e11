//! Histogram used as the in-memory form of per-depth coverage files.
//!
//! # Overview
//!
//! The histogram follows two rules:
//!
//! 1. Only discrete numbers are considered as bins. In other words, bins
//!    represent values in the range of `[0, 1, 2, 3, ..., n]`.
//! 2. The range of numerical values always starts at zero and ends at the
//!    capacity specified in the constructor. Coverage histograms always
//!    include depth zero as a valid bin.
//!
//! # Usage
//!
//! ```
//! use ngs_accounting::utils::histogram::Histogram;
//! let mut hist = Histogram::zero_based_with_capacity(10);
//!
//! // Increments the one bin by fourty-two.
//! let result = hist.increment_by(1, 42);
//! assert!(result.is_ok());
//!
//! // Remember, this includes zero!
//! assert_eq!(hist.count_from_top_until(0), Some(42));
//! assert_eq!(hist.count_from_top_until(2), Some(0));
//! ```
//!
//! Incrementing a bin outside the range gives a [`BinOutOfBoundsError`].
//!
//! ```
//! use ngs_accounting::utils::histogram::Histogram;
//! use ngs_accounting::utils::histogram::BinOutOfBoundsError;
//! let mut hist = Histogram::zero_based_with_capacity(10);
//!
//! let result = hist.increment_by(11, 1);
//! assert_eq!(result.unwrap_err(), BinOutOfBoundsError);
//! ```

/// Histogram used as the basis for depth-of-coverage accounting. For more in
/// depth information, please see the [module-level documentation].
///
/// [module-level documentation]: self
#[derive(Clone, Debug)]
pub struct Histogram {
    // Vec-backed value store for the histogram.
    values: Vec<u64>,
    // Starting range for the histogram.
    range_start: usize,
    // Ending range for the histogram.
    range_stop: usize,
}

/// An error that occurs if we try to increment a bin of the histogram that is
/// out-of-bounds for that histogram.
#[derive(Debug, PartialEq, Eq)]
pub struct BinOutOfBoundsError;

impl Histogram {
    //=================//
    // Initializations //
    //=================//

    /// Creates a zero-based histogram with a given capacity.
    pub fn zero_based_with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![0; capacity + 1],
            range_start: 0,
            range_stop: capacity,
        }
    }

    //=====================//
    // Incrementing values //
    //=====================//

    /// Increments a particular bin in the histogram by the specified value. A
    /// bin that would overflow saturates at `u64::MAX`.
    pub fn increment_by(&mut self, bin: usize, value: u64) -> Result<(), BinOutOfBoundsError> {
        if !self.in_range(bin) {
            return Err(BinOutOfBoundsError);
        }

        self.values[bin] = self.values[bin].saturating_add(value);
        Ok(())
    }

    //=======//
    // Range //
    //=======//

    /// Indicates whether a particular value falls within the range of the histogram.
    pub fn in_range(&self, value: usize) -> bool {
        (self.range_start..=self.range_stop).contains(&value)
    }

    //========================//
    // Numerical computations //
    //========================//

    /// Counts from the top of the histogram down until a certain bin
    /// (inclusive). A bin past the top of the histogram counts nothing.
    /// Returns `None` if the count overflows a `u64`.
    pub fn count_from_top_until(&self, bin: usize) -> Option<u64> {
        if bin > self.range_stop {
            return Some(0);
        }

        self.values[bin..]
            .iter()
            .try_fold(0u64, |total, value| total.checked_add(*value))
    }
}
