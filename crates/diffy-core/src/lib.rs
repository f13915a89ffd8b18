//! Core types for diffy
//!
//! This crate provides the types shared by every stage of the shadow-traffic
//! pipeline: the per-backend [`BackendOutcome`], the comparator's [`Verdict`],
//! the three-way [`Classification`] and the process-wide [`RunCounters`].
//!
//! ```text
//!   (primary, candidate) outcomes
//!              │
//!        ┌─────▼─────┐   both succeeded   ┌────────────┐
//!        │ classify  ├───────────────────►│ comparator │
//!        └─────┬─────┘◄───────────────────┴────────────┘
//!              │ Outcome
//!        ┌─────▼───────┐
//!        │ RunCounters │──► CounterSnapshot (report)
//!        └─────────────┘
//! ```

mod classify;
mod counters;
mod outcome;
mod verdict;

pub use classify::{classify, Classification, Outcome};
pub use counters::{CounterSnapshot, RunCounters};
pub use outcome::BackendOutcome;
pub use verdict::{Comparison, Verdict};

/// Tracing target for the one-per-request classification line
pub const RESULT_TARGET: &str = "diffy::result";

/// Tracing target for diff reports and raw invalid bodies
pub const DETAIL_TARGET: &str = "diffy::detail";
