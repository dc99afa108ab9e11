//! Utilities related to displaying things.

use std::fmt;

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::info;

/// Utility struct for displaying percentages. The first item in the struct is
/// the numerator and the second item in the struct is the denominator.
pub struct PercentageFormat(pub u64, pub u64);

impl fmt::Display for PercentageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 == 0 {
            f.write_str("N/A")
        } else {
            let (a, b) = (self.0 as f64, self.1 as f64);
            write!(f, "{:.2}%", a / b * 100.0)
        }
    }
}

/// Utility struct used to uniformly count and report the number of samples
/// processed.
pub struct RecordCounter {
    /// The number of samples processed.
    count: usize,

    /// The number of samples to log every.
    log_every: usize,
}

impl Default for RecordCounter {
    fn default() -> Self {
        RecordCounter {
            count: 0,
            log_every: 100,
        }
    }
}

impl RecordCounter {
    /// Gets the current number of samples counted via a copy.
    pub fn get(&self) -> usize {
        self.count
    }

    /// Increments the counter and reports the number of samples processed (if
    /// appropriate).
    pub fn inc(&mut self) {
        self.count += 1;

        if self.log_every > 0 && self.count % self.log_every == 0 {
            info!(
                "  [*] Processed {} samples.",
                self.count.to_formatted_string(&Locale::en),
            );
        }
    }
}
