//! Structural JSON comparison
//!
//! Decides whether two payloads encode the same JSON document and, when they
//! do not, describes every differing path:
//!
//! - object keys are matched by name, insertion order is irrelevant
//! - arrays are compared element by element, order matters
//! - scalars are compared by value (`1` and `1.0` are different numbers)
//! - a missing key is not the same as a key holding `null`
//!
//! Matching paths are left out of the report. Object keys are visited in
//! sorted order, so the same inputs always produce the same report text.

mod compare;

pub use compare::{compare, compare_default, diff_values, DiffKind, DiffOptions, Difference};
