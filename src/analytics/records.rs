//! Personal record flags
//!
//! Recomputed from scratch over the whole log so edits and deletions never
//! leave stale flags behind.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::history::TrainingHistory;
use crate::models::WorkoutEntry;
use crate::resolver::MuscleGroupResolver;

/// Entries flagged by the last evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub prs: usize,
    pub increases: usize,
}

#[derive(Default)]
struct Best {
    weight: Option<Decimal>,
    reps_at_weight: u32,
    bodyweight_reps: Option<u32>,
}

/// Sets `has_pr` and `has_strength_increase` on every entry.
///
/// A PR is a heavier top set than any earlier session of the exercise, or for
/// sessions with no stated weight, more total reps than any earlier such
/// session. A strength increase is more reps at a top weight equal to the
/// best so far. The first session of an exercise sets the baseline only.
pub fn evaluate_records(entries: &mut [WorkoutEntry], resolver: &MuscleGroupResolver) -> RecordSummary {
    for entry in entries.iter_mut() {
        entry.has_pr = false;
        entry.has_strength_increase = false;
    }

    let history = TrainingHistory::build(entries, resolver);
    let mut prs: BTreeSet<usize> = BTreeSet::new();
    let mut increases: BTreeSet<usize> = BTreeSet::new();

    for exercise in history.exercise_histories().values() {
        let mut best = Best::default();

        for session in &exercise.sessions {
            let performance = &session.performance;
            match (performance.top_weight(), performance.reps_at_top_weight()) {
                (Some(top), Some(reps)) => {
                    match best.weight {
                        Some(prior) if top > prior => {
                            prs.insert(session.position);
                        }
                        Some(prior) if top == prior && reps > best.reps_at_weight => {
                            increases.insert(session.position);
                        }
                        _ => {}
                    }
                    match best.weight {
                        Some(prior) if prior > top => {}
                        Some(prior) if prior == top => {
                            best.reps_at_weight = best.reps_at_weight.max(reps);
                        }
                        _ => {
                            best.weight = Some(top);
                            best.reps_at_weight = reps;
                        }
                    }
                }
                _ if performance.sets.is_empty() => {}
                _ => {
                    let total = performance.total_reps();
                    if matches!(best.bodyweight_reps, Some(prior) if total > prior) {
                        prs.insert(session.position);
                    }
                    best.bodyweight_reps = Some(best.bodyweight_reps.map_or(total, |p| p.max(total)));
                }
            }
        }
    }

    for &position in &prs {
        entries[position].has_pr = true;
    }
    for &position in &increases {
        entries[position].has_strength_increase = true;
    }

    let summary = RecordSummary {
        prs: prs.len(),
        increases: increases.len(),
    };
    info!(prs = summary.prs, increases = summary.increases, "Evaluated personal records");
    summary
}
