//! Run counters and the plain-text report
//!
//! The counters are the only state shared between requests. Every update and
//! every read goes through one mutex, so a reader never sees `numDiff` bumped
//! without the matching `numTotal`.

use crate::{Classification, Outcome};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Immutable copy of the counters taken under the lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub total: u64,
    pub diffed: u64,
    pub matched: u64,
}

impl CounterSnapshot {
    /// Requests that were neither a match nor a diff
    pub fn ignored(&self) -> u64 {
        self.total - self.diffed - self.matched
    }
}

/// Renders the report body served on the report path
impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "numTotal: {}", self.total)?;
        writeln!(f, "numDiff: {}", self.diffed)?;
        writeln!(f, "numMatch: {}", self.matched)?;
        writeln!(f, "numIgnore: {}", self.ignored())
    }
}

/// Process-lifetime comparison counters
///
/// Shared behind an `Arc` between the ingress handler and the reporter.
#[derive(Debug, Default)]
pub struct RunCounters {
    inner: Mutex<CounterSnapshot>,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified request and return the counters as they stand
    /// right after it
    pub fn record(&self, outcome: &Outcome) -> CounterSnapshot {
        self.record_classification(outcome.classification)
    }

    /// Count one request of the given class
    pub fn record_classification(&self, classification: Classification) -> CounterSnapshot {
        let mut counters = self.lock();
        counters.total += 1;
        match classification {
            Classification::Match => counters.matched += 1,
            Classification::Diff => counters.diffed += 1,
            Classification::Ignore => {}
        }
        *counters
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, CounterSnapshot> {
        // Nothing inside the critical section can panic halfway through an
        // update, so a poisoned lock still holds consistent counters.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
