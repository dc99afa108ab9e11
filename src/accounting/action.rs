//! The next pipeline step recommended for a sample.

use std::fmt;

use serde::Serialize;

/// Recommended next pipeline step for a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Every stage is caught up.
    #[default]
    NoAction,

    /// Some unaligned files have not been aligned yet.
    Align,

    /// Some raw sequence files have not been converted to unaligned BAM yet,
    /// so the sample has to be converted and then aligned.
    BamifyAndAlign,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoAction => write!(f, "-"),
            Action::Align => write!(f, "Align"),
            Action::BamifyAndAlign => write!(f, "Bamify + Align"),
        }
    }
}

/// Decides the action for a sample from its raw sequence, unaligned, and
/// aligned file counts. A conversion backlog takes precedence over an
/// alignment backlog.
pub fn decide(sequence_files: u64, unaligned_files: u64, aligned_files: u64) -> Action {
    if sequence_files > unaligned_files {
        Action::BamifyAndAlign
    } else if unaligned_files > aligned_files {
        Action::Align
    } else {
        Action::NoAction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caught_up_sample_needs_nothing() {
        assert_eq!(decide(4, 4, 4), Action::NoAction);
        assert_eq!(decide(0, 0, 0), Action::NoAction);
        assert_eq!(decide(2, 4, 6), Action::NoAction);
    }

    #[test]
    fn test_unaligned_backlog_needs_alignment() {
        assert_eq!(decide(4, 4, 2), Action::Align);
    }

    #[test]
    fn test_conversion_backlog_overrides_alignment() {
        assert_eq!(decide(6, 4, 2), Action::BamifyAndAlign);
        assert_eq!(decide(6, 4, 8), Action::BamifyAndAlign);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::default().to_string(), "-");
        assert_eq!(Action::Align.to_string(), "Align");
        assert_eq!(Action::BamifyAndAlign.to_string(), "Bamify + Align");
    }
}
