//! Comparator verdicts

use std::fmt;

/// Coarse result of comparing two payloads structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    FullMatch,
    StructuralMismatch,
    PrimaryInvalid,
    CandidateInvalid,
    BothInvalid,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        self == Self::FullMatch
    }

    /// Whether the primary payload failed to parse
    pub fn primary_invalid(self) -> bool {
        matches!(self, Self::PrimaryInvalid | Self::BothInvalid)
    }

    /// Whether the candidate payload failed to parse
    pub fn candidate_invalid(self) -> bool {
        matches!(self, Self::CandidateInvalid | Self::BothInvalid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::FullMatch => write!(f, "FullMatch"),
            Verdict::StructuralMismatch => write!(f, "StructuralMismatch"),
            Verdict::PrimaryInvalid => write!(f, "PrimaryInvalid"),
            Verdict::CandidateInvalid => write!(f, "CandidateInvalid"),
            Verdict::BothInvalid => write!(f, "BothInvalid"),
        }
    }
}

/// A verdict together with its human-readable diff report
///
/// The report is empty for [`Verdict::FullMatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub verdict: Verdict,
    pub report: String,
}

impl Comparison {
    pub fn full_match() -> Self {
        Self {
            verdict: Verdict::FullMatch,
            report: String::new(),
        }
    }

    pub fn new(verdict: Verdict, report: impl Into<String>) -> Self {
        Self {
            verdict,
            report: report.into(),
        }
    }
}
