//! Outcome classification
//!
//! Maps the pair of backend outcomes (and, when both succeeded, the
//! comparator's verdict) onto match/diff/ignore:
//!
//! | primary | candidate | classification |
//! |---------|-----------|----------------|
//! | failure | failure   | ignore         |
//! | failure | success   | ignore         |
//! | success | failure   | diff           |
//! | success | success   | match if the verdict is `FullMatch`, else diff |
//!
//! A failed primary leaves nothing to judge the candidate against, so it is
//! never counted as a diff.

use crate::{BackendOutcome, Comparison, DETAIL_TARGET, RESULT_TARGET};
use std::fmt;
use tracing::info;

/// Three-way classification of one replayed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Match,
    Diff,
    Ignore,
}

impl Classification {
    /// Log tag for this classification
    pub fn tag(self) -> &'static str {
        match self {
            Classification::Match => "match",
            Classification::Diff => "diff",
            Classification::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Classified result of one replayed request
#[derive(Debug, Clone)]
pub struct Outcome {
    pub classification: Classification,
    /// Why the request landed in its class (`ALL FAIL`, `MISMATCH`, ...)
    pub sub_tag: Option<&'static str>,
    /// Present only when both backends answered
    pub comparison: Option<Comparison>,
    pub primary: BackendOutcome,
    pub candidate: BackendOutcome,
}

/// Classify a pair of backend outcomes
///
/// `compare` is invoked with `(primary_body, candidate_body)` only when both
/// calls succeeded.
pub fn classify<F>(primary: BackendOutcome, candidate: BackendOutcome, compare: F) -> Outcome
where
    F: FnOnce(&[u8], &[u8]) -> Comparison,
{
    let (classification, sub_tag, comparison) = match (&primary, &candidate) {
        (BackendOutcome::Failure { .. }, BackendOutcome::Failure { .. }) => {
            (Classification::Ignore, Some("ALL FAIL"), None)
        }
        (BackendOutcome::Failure { .. }, BackendOutcome::Success { .. }) => {
            (Classification::Ignore, Some("PRIMARY FAIL"), None)
        }
        (BackendOutcome::Success { .. }, BackendOutcome::Failure { .. }) => {
            (Classification::Diff, Some("CANDIDATE FAIL"), None)
        }
        (BackendOutcome::Success { body: p }, BackendOutcome::Success { body: c }) => {
            let comparison = compare(&p[..], &c[..]);
            if comparison.verdict.is_match() {
                (Classification::Match, None, Some(comparison))
            } else {
                (Classification::Diff, Some("MISMATCH"), Some(comparison))
            }
        }
    };

    Outcome {
        classification,
        sub_tag,
        comparison,
        primary,
        candidate,
    }
}

impl Outcome {
    pub fn is_match(&self) -> bool {
        self.classification == Classification::Match
    }

    pub fn is_diff(&self) -> bool {
        self.classification == Classification::Diff
    }

    /// Emit the log lines for this request
    ///
    /// Always exactly one `[result]` line. Mismatches add a `[detail]` line
    /// with the diff report, and invalid payloads add one raw-body line per
    /// offending side.
    pub fn log(&self, path: &str, query: &str) {
        let tag = self.classification.tag();
        let sub_tag = self.sub_tag.unwrap_or("");

        match self.classification {
            Classification::Ignore => {
                let primary_error = self.primary.reason().unwrap_or("");
                let candidate_error = self.candidate.reason().unwrap_or("");
                info!(
                    target: RESULT_TARGET,
                    tag,
                    sub_tag,
                    path,
                    query,
                    primary_error,
                    candidate_error,
                    "[result] [ignore] {} {} {}",
                    sub_tag,
                    path,
                    query
                );
            }
            Classification::Match => {
                info!(
                    target: RESULT_TARGET,
                    tag,
                    path,
                    query,
                    "[result] [match] {} {}",
                    path,
                    query
                );
            }
            Classification::Diff => match &self.comparison {
                None => {
                    let candidate_error = self.candidate.reason().unwrap_or("");
                    info!(
                        target: RESULT_TARGET,
                        tag,
                        sub_tag,
                        path,
                        query,
                        candidate_error,
                        "[result] [diff] {} {} {} {}",
                        sub_tag,
                        candidate_error,
                        path,
                        query
                    );
                }
                Some(comparison) => {
                    info!(
                        target: RESULT_TARGET,
                        tag,
                        sub_tag,
                        path,
                        query,
                        verdict = %comparison.verdict,
                        "[result] [diff] {} {} {}",
                        sub_tag,
                        path,
                        query
                    );
                    info!(target: DETAIL_TARGET, path, "[detail] {}", comparison.report);

                    if comparison.verdict.primary_invalid() {
                        let body = raw_body(&self.primary);
                        info!(target: DETAIL_TARGET, path, "[detail] [primary] {}", body);
                    }
                    if comparison.verdict.candidate_invalid() {
                        let body = raw_body(&self.candidate);
                        info!(target: DETAIL_TARGET, path, "[detail] [candidate] {}", body);
                    }
                }
            },
        }
    }
}

fn raw_body(outcome: &BackendOutcome) -> String {
    outcome
        .body()
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}
