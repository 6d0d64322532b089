//! Fuzzy resolution of free-form entity names against reference rows.
//!
//! User phrases rarely spell bank or product names the way the reference
//! tables do. These functions score candidates with a normalized Levenshtein
//! ratio on a 0-100 scale and pick the best one per input value. Ties keep
//! the first candidate in list order.

use strsim::normalized_levenshtein;

/// Similarity of two names on a 0-100 scale, case-insensitive.
///
/// 100.0 means the lowercased strings are equal.
pub fn similarity_ratio(left: &str, right: &str) -> f64 {
    normalized_levenshtein(&left.to_lowercase(), &right.to_lowercase()) * 100.0
}

fn best_candidate<'a>(
    value: &str,
    candidates: &'a [(i32, String)],
) -> Option<(&'a (i32, String), f64)> {
    let mut best: Option<(&(i32, String), f64)> = None;
    for candidate in candidates {
        let ratio = similarity_ratio(value, &candidate.1);
        if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
            best = Some((candidate, ratio));
        }
    }
    best
}

/// Resolves values to reference ids, dropping anything below `threshold`.
///
/// Whitespace-only values are skipped. Without candidates nothing resolves
/// and the result is empty.
pub fn resolve_to_ids(
    values: &[String],
    candidates: &[(i32, String)],
    threshold: f64,
) -> Vec<i32> {
    split_resolved(values, candidates, threshold).0
}

/// Resolves values to canonical reference names.
///
/// A value below `threshold` is kept verbatim; without candidates the
/// input comes back unchanged.
pub fn resolve_to_names(
    values: &[String],
    candidates: &[(i32, String)],
    threshold: f64,
) -> Vec<String> {
    if candidates.is_empty() {
        return values.to_vec();
    }

    values
        .iter()
        .map(|value| match best_candidate(value, candidates) {
            Some((candidate, ratio)) if ratio >= threshold => candidate.1.clone(),
            _ => value.clone(),
        })
        .collect()
}

/// Splits values into resolved ids and the names that stayed unresolved.
///
/// Whitespace-only values are dropped from both lists.
pub fn split_resolved(
    values: &[String],
    candidates: &[(i32, String)],
    threshold: f64,
) -> (Vec<i32>, Vec<String>) {
    let mut ids = Vec::new();
    let mut unresolved = Vec::new();

    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        match best_candidate(value, candidates) {
            Some((candidate, ratio)) if ratio >= threshold => ids.push(candidate.0),
            _ => unresolved.push(value.clone()),
        }
    }

    (ids, unresolved)
}
