//! Response comparison

use diffy_core::{Comparison, Verdict};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Markers used when rendering a diff report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Prefix for paths only present in the candidate
    pub added: String,
    /// Prefix for paths only present in the primary
    pub removed: String,
    /// Prefix for paths present on both sides with different values
    pub changed: String,
    /// Placed between the old and the new value of a changed path
    pub changed_separator: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            added: "++ ".to_string(),
            removed: "-- ".to_string(),
            changed: "!! ".to_string(),
            changed_separator: ", ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
}

/// A single differing path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: DiffKind,
    /// Dotted path with `[i]` indices, `$` for the document root
    pub path: String,
    /// Compact JSON of the primary value, absent for added paths
    pub primary: Option<String>,
    /// Compact JSON of the candidate value, absent for removed paths
    pub candidate: Option<String>,
}

impl Difference {
    fn render(&self, options: &DiffOptions, out: &mut String) {
        let empty = String::new();
        let primary = self.primary.as_ref().unwrap_or(&empty);
        let candidate = self.candidate.as_ref().unwrap_or(&empty);
        // Writing into a String cannot fail
        let _ = match self.kind {
            DiffKind::Added => writeln!(out, "{}{}: {}", options.added, self.path, candidate),
            DiffKind::Removed => writeln!(out, "{}{}: {}", options.removed, self.path, primary),
            DiffKind::Changed => writeln!(
                out,
                "{}{}: {}{}{}",
                options.changed, self.path, primary, options.changed_separator, candidate
            ),
        };
    }
}

/// Compare two payloads with the default markers
pub fn compare_default(primary: &[u8], candidate: &[u8]) -> Comparison {
    compare(primary, candidate, &DiffOptions::default())
}

/// Compare two raw payloads
pub fn compare(primary: &[u8], candidate: &[u8], options: &DiffOptions) -> Comparison {
    let parsed_primary = serde_json::from_slice::<Value>(primary);
    let parsed_candidate = serde_json::from_slice::<Value>(candidate);

    match (parsed_primary, parsed_candidate) {
        (Ok(p), Ok(c)) => {
            let differences = diff_values(&p, &c);
            if differences.is_empty() {
                return Comparison::full_match();
            }
            let mut report = String::new();
            for difference in &differences {
                difference.render(options, &mut report);
            }
            Comparison::new(Verdict::StructuralMismatch, trim_newline(report))
        }
        (Err(e), Ok(_)) => Comparison::new(
            Verdict::PrimaryInvalid,
            format!("primary: invalid JSON: {}", e),
        ),
        (Ok(_), Err(e)) => Comparison::new(
            Verdict::CandidateInvalid,
            format!("candidate: invalid JSON: {}", e),
        ),
        (Err(pe), Err(ce)) => Comparison::new(
            Verdict::BothInvalid,
            format!(
                "primary: invalid JSON: {}\ncandidate: invalid JSON: {}",
                pe, ce
            ),
        ),
    }
}

/// Every differing path between two parsed documents
///
/// The result is empty exactly when the documents are structurally equal.
pub fn diff_values(primary: &Value, candidate: &Value) -> Vec<Difference> {
    let mut differences = Vec::new();
    walk("", primary, candidate, &mut differences);
    differences
}

fn walk(path: &str, primary: &Value, candidate: &Value, differences: &mut Vec<Difference>) {
    match (primary, candidate) {
        (Value::Object(p_obj), Value::Object(c_obj)) => {
            let keys: BTreeSet<&String> = p_obj.keys().chain(c_obj.keys()).collect();
            for key in keys {
                let new_path = key_path(path, key);
                match (p_obj.get(key), c_obj.get(key)) {
                    (Some(p), Some(c)) => walk(&new_path, p, c, differences),
                    (Some(p), None) => differences.push(removed(new_path, p)),
                    (None, Some(c)) => differences.push(added(new_path, c)),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(p_arr), Value::Array(c_arr)) => {
            for i in 0..p_arr.len().max(c_arr.len()) {
                let new_path = format!("{}[{}]", path, i);
                match (p_arr.get(i), c_arr.get(i)) {
                    (Some(p), Some(c)) => walk(&new_path, p, c, differences),
                    (Some(p), None) => differences.push(removed(new_path, p)),
                    (None, Some(c)) => differences.push(added(new_path, c)),
                    (None, None) => {}
                }
            }
        }
        _ => {
            if primary != candidate {
                differences.push(Difference {
                    kind: DiffKind::Changed,
                    path: display_path(path),
                    primary: Some(primary.to_string()),
                    candidate: Some(candidate.to_string()),
                });
            }
        }
    }
}

fn added(path: String, value: &Value) -> Difference {
    Difference {
        kind: DiffKind::Added,
        path: display_path(&path),
        primary: None,
        candidate: Some(value.to_string()),
    }
}

fn removed(path: String, value: &Value) -> Difference {
    Difference {
        kind: DiffKind::Removed,
        path: display_path(&path),
        primary: Some(value.to_string()),
        candidate: None,
    }
}

fn key_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '$' || ch == '@');

    if !plain {
        // Quote keys that would make the path ambiguous
        return format!("{}[{}]", parent, Value::String(key.to_string()));
    }
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

fn trim_newline(mut report: String) -> String {
    if report.ends_with('\n') {
        report.pop();
    }
    report
}
