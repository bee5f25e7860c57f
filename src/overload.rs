//! Progressive overload suggestions
//!
//! For each exercise in a candidate workout that has been done before, the
//! most recent prior performance is turned into the next session's sets.
//! Policy, first match wins:
//!
//! 1. last done more than `deload_after_days` ago: drop the working weight
//!    by `deload_percent`, rounded to the equipment increment
//! 2. working reps fell versus the session before at the same weight: repeat
//! 3. last done more than `reacclimate_after_days` ago: repeat
//! 4. every working set reached the target reps: add the equipment
//!    increment, or one rep when no increment is configured
//! 5. otherwise add a rep to each working set still under target
//!
//! Working sets are the sets at the top weight; lighter sets are carried over
//! unchanged. Exercises with no prior occurrence produce no suggestion.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

use crate::history::{ExerciseHistory, ExerciseSession, TrainingHistory};
use crate::models::{format_weight, EquipmentClass, ExercisePerformance, WorkoutSet};
use crate::parser::{parse_workout_text, render_sets};
use crate::resolver::MuscleGroupResolver;

const FALLBACK_ROUNDING: Decimal = dec!(2.5);

/// Smallest standard load step per equipment class; `None` means progress by reps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentIncrements {
    pub barbell: Option<Decimal>,
    pub dumbbell: Option<Decimal>,
    pub machine: Option<Decimal>,
    pub cable: Option<Decimal>,
    pub bodyweight: Option<Decimal>,
    pub other: Option<Decimal>,
}

impl Default for EquipmentIncrements {
    fn default() -> Self {
        Self {
            barbell: Some(dec!(5)),
            dumbbell: Some(dec!(5)),
            machine: Some(dec!(5)),
            cable: Some(dec!(2.5)),
            bodyweight: None,
            other: Some(dec!(2.5)),
        }
    }
}

impl EquipmentIncrements {
    pub fn for_class(&self, class: EquipmentClass) -> Option<Decimal> {
        let increment = match class {
            EquipmentClass::Barbell => self.barbell,
            EquipmentClass::Dumbbell => self.dumbbell,
            EquipmentClass::Machine => self.machine,
            EquipmentClass::Cable => self.cable,
            EquipmentClass::Bodyweight => self.bodyweight,
            EquipmentClass::Other => self.other,
        };
        increment.filter(|inc| inc.is_sign_positive() && !inc.is_zero())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadConfig {
    /// Reps every working set must reach before weight goes up
    pub target_reps_weighted: u32,

    /// Same, for sets with no stated weight
    pub target_reps_bodyweight: u32,

    pub increments: EquipmentIncrements,

    /// Longer gaps than this repeat the last performance
    pub reacclimate_after_days: i64,

    /// Longer gaps than this deload
    pub deload_after_days: i64,

    /// Weight reduction for a deload, in percent
    pub deload_percent: Decimal,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        Self {
            target_reps_weighted: 6,
            target_reps_bodyweight: 12,
            increments: EquipmentIncrements::default(),
            reacclimate_after_days: 14,
            deload_after_days: 30,
            deload_percent: dec!(5),
        }
    }
}

/// Which branch of the policy produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverloadDecision {
    AddWeight,
    AddRep,
    Repeat,
    Reacclimate,
    Deload,
}

impl fmt::Display for OverloadDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverloadDecision::AddWeight => write!(f, "add weight"),
            OverloadDecision::AddRep => write!(f, "add rep"),
            OverloadDecision::Repeat => write!(f, "repeat"),
            OverloadDecision::Reacclimate => write!(f, "reacclimate"),
            OverloadDecision::Deload => write!(f, "deload"),
        }
    }
}

/// Next-session plan for one exercise, before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadPlan {
    pub decision: OverloadDecision,
    pub reason: String,
    pub last: ExerciseSession,
    pub days_since: i64,
    pub suggested_sets: Vec<WorkoutSet>,
}

/// Rendered suggestion, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverloadSuggestion {
    pub exercise: String,
    pub last_performance: String,
    pub current: String,
    pub suggested: String,
    pub reason: String,
    pub last_done: String,

    #[serde(skip)]
    pub decision: OverloadDecision,

    #[serde(skip)]
    pub suggested_sets: Vec<WorkoutSet>,
}

/// "today", "1 day ago", "12 days ago"
pub fn relative_days(days: i64) -> String {
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{} days ago", d),
    }
}

pub struct OverloadSuggester<'a> {
    config: &'a OverloadConfig,
    resolver: &'a MuscleGroupResolver,
}

impl<'a> OverloadSuggester<'a> {
    pub fn new(config: &'a OverloadConfig, resolver: &'a MuscleGroupResolver) -> Self {
        Self { config, resolver }
    }

    /// Suggestions for every previously seen exercise in `candidate_text`,
    /// in the order they appear
    pub fn suggest(
        &self,
        candidate_text: &str,
        history: &TrainingHistory,
        today: NaiveDate,
    ) -> Vec<OverloadSuggestion> {
        let candidate = parse_workout_text(candidate_text);
        let histories = history.exercise_histories();
        let mut seen = BTreeSet::new();

        let suggestions: Vec<OverloadSuggestion> = candidate
            .exercises
            .iter()
            .filter_map(|performance| {
                let exercise = self.resolver.resolve(&performance.exercise_name);
                let key = exercise.key();
                if !seen.insert(key.clone()) {
                    return None;
                }
                let Some(exercise_history) = histories.get(&key) else {
                    debug!(exercise = %performance.exercise_name, "No prior occurrence, skipping");
                    return None;
                };
                let plan = self.plan(exercise_history, today)?;
                Some(self.render(performance, plan))
            })
            .collect();

        info!(
            exercises = candidate.exercises.len(),
            suggestions = suggestions.len(),
            "Generated overload suggestions"
        );
        suggestions
    }

    fn render(&self, current: &ExercisePerformance, plan: OverloadPlan) -> OverloadSuggestion {
        OverloadSuggestion {
            exercise: current.exercise_name.clone(),
            last_performance: render_sets(&plan.last.performance.sets),
            current: render_sets(&current.sets),
            suggested: render_sets(&plan.suggested_sets),
            reason: plan.reason,
            last_done: relative_days(plan.days_since),
            decision: plan.decision,
            suggested_sets: plan.suggested_sets,
        }
    }

    /// Plan the next session from an exercise's history as of `today`.
    /// Sessions dated after `today` are ignored.
    pub fn plan(&self, history: &ExerciseHistory, today: NaiveDate) -> Option<OverloadPlan> {
        let prior = history.before(today.succ_opt()?);
        let (last, earlier) = prior.split_last()?;
        if last.performance.sets.is_empty() {
            return None;
        }

        let days_since = (today - last.date).num_days().max(0);
        let equipment = self.resolver.equipment_for(&history.canonical_name);
        let increment = self.config.increments.for_class(equipment);
        let sets = &last.performance.sets;

        let (decision, reason, suggested_sets) = if days_since > self.config.deload_after_days {
            let suggested = self.deload(sets, increment);
            (
                OverloadDecision::Deload,
                format!(
                    "slightly lighter after {} days off (-{}%)",
                    days_since,
                    format_weight(self.config.deload_percent)
                ),
                suggested,
            )
        } else if earlier
            .last()
            .is_some_and(|before| reps_regressed(&before.performance, &last.performance))
        {
            (
                OverloadDecision::Repeat,
                "reps dropped, repeat weight to rebuild".to_string(),
                sets.clone(),
            )
        } else if days_since > self.config.reacclimate_after_days {
            (
                OverloadDecision::Reacclimate,
                format!("match last performance (been {} days)", days_since),
                sets.clone(),
            )
        } else {
            let target = self.target_reps(&last.performance);
            let top = last.performance.top_weight();
            let all_met = working_sets(sets, top).all(|s| s.reps >= target);

            match (all_met, increment) {
                (true, Some(inc)) => (
                    OverloadDecision::AddWeight,
                    format!("hit all target reps, add weight (+{} lbs)", format_weight(inc)),
                    add_weight(sets, top, inc, target),
                ),
                (true, None) => (
                    OverloadDecision::AddRep,
                    "hit all target reps, add a rep (no weight increment)".to_string(),
                    add_rep(sets, top, None),
                ),
                (false, _) => (
                    OverloadDecision::AddRep,
                    format!("+1 rep (build to {} reps)", target),
                    add_rep(sets, top, Some(target)),
                ),
            }
        };

        Some(OverloadPlan {
            decision,
            reason,
            last: last.clone(),
            days_since,
            suggested_sets,
        })
    }

    fn target_reps(&self, performance: &ExercisePerformance) -> u32 {
        if performance.is_bodyweight() {
            self.config.target_reps_bodyweight
        } else {
            self.config.target_reps_weighted
        }
    }

    fn deload(&self, sets: &[WorkoutSet], increment: Option<Decimal>) -> Vec<WorkoutSet> {
        let top = sets.iter().filter_map(|s| s.weight).max();
        let Some(top) = top else {
            // nothing to lighten, trim a rep instead
            return sets
                .iter()
                .map(|s| WorkoutSet::bodyweight(s.reps.saturating_sub(1).max(1)))
                .collect();
        };

        let step = increment.unwrap_or(FALLBACK_ROUNDING);
        let factor = (dec!(100) - self.config.deload_percent) / dec!(100);
        let mut lighter = ((top * factor) / step).round() * step;
        if lighter >= top {
            lighter = top - step;
        }
        if lighter <= Decimal::ZERO {
            lighter = top;
        }

        sets.iter()
            .map(|s| {
                if s.weight == Some(top) {
                    WorkoutSet::weighted(lighter, s.reps)
                } else {
                    *s
                }
            })
            .collect()
    }
}

fn working_sets(sets: &[WorkoutSet], top: Option<Decimal>) -> impl Iterator<Item = &WorkoutSet> {
    sets.iter().filter(move |s| s.weight == top)
}

fn working_reps(performance: &ExercisePerformance) -> u32 {
    working_sets(&performance.sets, performance.top_weight())
        .map(|s| s.reps)
        .sum()
}

/// Fewer working reps than the session before at the same top weight
fn reps_regressed(before: &ExercisePerformance, last: &ExercisePerformance) -> bool {
    before.top_weight() == last.top_weight() && working_reps(last) < working_reps(before)
}

fn add_weight(
    sets: &[WorkoutSet],
    top: Option<Decimal>,
    increment: Decimal,
    target: u32,
) -> Vec<WorkoutSet> {
    let heavier = top.unwrap_or(Decimal::ZERO) + increment;
    let reps = target.saturating_sub(1).max(1);
    sets.iter()
        .map(|s| {
            if s.weight == top {
                WorkoutSet::weighted(heavier, reps)
            } else {
                *s
            }
        })
        .collect()
}

fn add_rep(sets: &[WorkoutSet], top: Option<Decimal>, cap: Option<u32>) -> Vec<WorkoutSet> {
    sets.iter()
        .map(|s| {
            let under_cap = cap.map_or(true, |cap| s.reps < cap);
            if s.weight == top && under_cap {
                WorkoutSet {
                    weight: s.weight,
                    reps: s.reps.saturating_add(1),
                }
            } else {
                *s
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutEntry;
    use crate::parser::parse_set_list;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    fn history(entries: &[(u32, &str)]) -> TrainingHistory {
        let entries: Vec<_> = entries
            .iter()
            .map(|(d, text)| WorkoutEntry::new(date(*d), *text))
            .collect();
        TrainingHistory::build(&entries, &MuscleGroupResolver::builtin())
    }

    fn suggest(
        entries: &[(u32, &str)],
        candidate: &str,
        today: u32,
    ) -> Vec<OverloadSuggestion> {
        let config = OverloadConfig::default();
        let resolver = MuscleGroupResolver::builtin();
        OverloadSuggester::new(&config, &resolver).suggest(candidate, &history(entries), date(today))
    }

    #[test]
    fn test_all_targets_met_adds_increment() {
        let out = suggest(&[(1, "bench press - 135 * 10; 185 * 6, 6, 7")], "bench press - 185 * 6", 4);
        assert_eq!(out.len(), 1);
        let s = &out[0];
        assert_eq!(s.decision, OverloadDecision::AddWeight);
        assert_eq!(s.suggested, "135 * 10, 190 * 5, 5, 5");
        assert_eq!(s.last_performance, "135 * 10, 185 * 6, 6, 7");
        assert_eq!(s.current, "185 * 6");
        assert_eq!(s.last_done, "3 days ago");
        assert!(s.reason.contains("add weight"));

        let top = s.suggested_sets.iter().filter_map(|set| set.weight).max().unwrap();
        assert_eq!(top, dec!(190));
    }

    #[test]
    fn test_cable_uses_smaller_increment() {
        let out = suggest(&[(1, "lat pulldown - 100 * 8, 8")], "lat pulldown - 100 * 8", 3);
        assert_eq!(out[0].suggested, "102.5 * 5, 5");
    }

    #[test]
    fn test_missed_target_adds_rep() {
        let out = suggest(&[(1, "squat - 225 * 6, 5, 4")], "squat - 225 * 5", 3);
        assert_eq!(out[0].decision, OverloadDecision::AddRep);
        assert_eq!(out[0].suggested, "225 * 6, 6, 5");
        assert_eq!(out[0].reason, "+1 rep (build to 6 reps)");
    }

    #[test]
    fn test_regression_repeats_prior_weight() {
        let out = suggest(
            &[(1, "squat - 225 * 6, 6"), (4, "squat - 225 * 5, 4")],
            "squat - 225 * 5",
            6,
        );
        assert_eq!(out[0].decision, OverloadDecision::Repeat);
        assert_eq!(out[0].suggested, "225 * 5, 4");
        assert_eq!(out[0].reason, "reps dropped, repeat weight to rebuild");
    }

    #[test]
    fn test_lower_weight_is_not_a_regression() {
        let out = suggest(
            &[(1, "squat - 245 * 6, 6"), (4, "squat - 225 * 6, 6")],
            "squat - 225 * 6",
            6,
        );
        assert_eq!(out[0].decision, OverloadDecision::AddWeight);
    }

    #[test]
    fn test_bodyweight_without_increment_adds_rep() {
        let out = suggest(&[(1, "pull-up 12, 12, 12")], "pull-up 10", 2);
        assert_eq!(out[0].decision, OverloadDecision::AddRep);
        assert_eq!(out[0].suggested, "13, 13, 13");
        assert!(out[0].reason.contains("no weight increment"));

        let out = suggest(&[(1, "pull-up 10, 8")], "pull-up 10", 2);
        assert_eq!(out[0].suggested, "11, 9");
    }

    #[test]
    fn test_add_rep_saturates() {
        let sets = vec![WorkoutSet::bodyweight(u32::MAX)];
        assert_eq!(add_rep(&sets, None, None)[0].reps, u32::MAX);
    }

    #[test]
    fn test_time_decay() {
        let out = suggest(&[(1, "squat - 225 * 6")], "squat - 225 * 6", 20);
        assert_eq!(out[0].decision, OverloadDecision::Reacclimate);
        assert_eq!(out[0].suggested, "225 * 6");
        assert_eq!(out[0].last_done, "19 days ago");

        let config = OverloadConfig::default();
        let resolver = MuscleGroupResolver::builtin();
        let today = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let out = OverloadSuggester::new(&config, &resolver).suggest(
            "squat - 225 * 6",
            &history(&[(1, "squat - 225 * 6")]),
            today,
        );
        assert_eq!(out[0].decision, OverloadDecision::Deload);
        // 225 * 0.95 = 213.75, nearest 5
        assert_eq!(out[0].suggested, "215 * 6");
    }

    #[test]
    fn test_novel_exercises_are_omitted() {
        let out = suggest(
            &[(1, "squat - 225 * 6")],
            "squat - 225 * 6\nzercher carry - 135 * 3\nrun 2 mi",
            3,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].exercise, "squat");
    }

    #[test]
    fn test_future_sessions_are_ignored() {
        let out = suggest(&[(10, "squat - 225 * 6")], "squat - 225 * 6", 5);
        assert!(out.is_empty());
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(relative_days(0), "today");
        assert_eq!(relative_days(1), "1 day ago");
        assert_eq!(relative_days(9), "9 days ago");
    }

    proptest! {
        #[test]
        fn prop_suggested_text_round_trips(
            weight in 1u32..400,
            reps in proptest::collection::vec(1u32..15, 1..5),
            gap in 1u32..20,
        ) {
            let sets = reps.iter().map(|r| format!("{}", r)).collect::<Vec<_>>().join(", ");
            let entry = format!("bench press - {} * {}", weight, sets);
            let out = suggest(&[(1, entry.as_str())], "bench press - 100 * 5", 1 + gap);
            prop_assert_eq!(out.len(), 1);
            let reparsed = parse_set_list(&out[0].suggested).unwrap();
            prop_assert_eq!(&reparsed, &out[0].suggested_sets);
        }

        #[test]
        fn prop_met_targets_raise_weight_by_increment(
            weight in 20u32..400,
            extra in proptest::collection::vec(0u32..5, 1..5),
        ) {
            let sets = extra.iter().map(|e| (6 + e).to_string()).collect::<Vec<_>>().join(", ");
            let entry = format!("squat - {} * {}", weight, sets);
            let out = suggest(&[(1, entry.as_str())], "squat - 100 * 5", 3);
            let top = out[0].suggested_sets.iter().filter_map(|s| s.weight).max().unwrap();
            prop_assert_eq!(top, Decimal::from(weight) + dec!(5));
        }
    }
}
