//! Region allocation: which region does a labeler see next?
//!
//! This module is pure. The API layer gathers the inputs (candidate region
//! ids with the requester's own submissions and completed regions already
//! excluded, plus per-region distinct-labeler counts) and delegates the
//! decision here. Callers supply the random generator so production can use
//! the process-wide RNG while tests use a seeded one.

use std::collections::{HashMap, HashSet};

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Completion threshold
// ---------------------------------------------------------------------------

/// Normalize the "labelers required per region" configuration value.
///
/// A non-positive threshold is a benign misconfiguration and is treated as
/// "no limit": regions are never considered complete and stay eligible
/// forever.
pub fn normalize_threshold(threshold: Option<i64>) -> Option<i64> {
    threshold.filter(|t| *t > 0)
}

/// Region ids whose distinct-labeler count has reached the threshold.
///
/// With no threshold the result is always empty -- nothing is ever complete
/// and every region remains eligible for further labeling.
pub fn completed_regions(
    label_counts: &HashMap<DbId, i64>,
    threshold: Option<i64>,
) -> HashSet<DbId> {
    match normalize_threshold(threshold) {
        Some(required) => label_counts
            .iter()
            .filter(|(_, count)| **count >= required)
            .map(|(id, _)| *id)
            .collect(),
        None => HashSet::new(),
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Select the next region to serve from a candidate set.
///
/// `candidates` must already exclude regions the requesting labeler has
/// labeled and regions that were complete as of the read. When
/// `prioritize_by_label_count` is set and a threshold exists, selection is
/// biased toward the candidates with the highest label count still below the
/// threshold, so near-complete regions finish before untouched ones are
/// started. Regions absent from `label_counts` count as zero.
///
/// Candidates at or over the threshold are dropped before prioritization;
/// this guards against a region completing between the exclusion read and
/// this call. If that filter empties the pool, selection falls back to the
/// full candidate set.
///
/// Returns `None` only when `candidates` is empty -- the terminal
/// "nothing left to label" state for this labeler.
pub fn select_region<R: Rng + ?Sized>(
    candidates: &[DbId],
    label_counts: &HashMap<DbId, i64>,
    threshold: Option<i64>,
    prioritize_by_label_count: bool,
    rng: &mut R,
) -> Option<DbId> {
    if candidates.is_empty() {
        return None;
    }

    if prioritize_by_label_count {
        if let Some(required) = normalize_threshold(threshold) {
            let below_threshold: Vec<(DbId, i64)> = candidates
                .iter()
                .map(|id| (*id, label_counts.get(id).copied().unwrap_or(0)))
                .filter(|(_, count)| *count < required)
                .collect();

            if let Some(max_count) = below_threshold.iter().map(|(_, c)| *c).max() {
                let prioritized: Vec<DbId> = below_threshold
                    .into_iter()
                    .filter(|(_, count)| *count == max_count)
                    .map(|(id, _)| id)
                    .collect();
                return prioritized.choose(rng).copied();
            }
            // Every candidate reached the threshold while this request was in
            // flight; fall through to a uniform choice over the full set.
        }
    }

    candidates.choose(rng).copied()
}
