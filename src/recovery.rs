//! Muscle group recovery tracking
//!
//! Tracks when each muscle group was last trained and classifies it:
//!
//! - **Recovering**: trained fewer than the group's recovery days ago
//! - **Ready**: at least the recovery days have passed (boundary inclusive)
//! - **Neglected**: more than the neglect threshold has passed. This is a
//!   stronger form of ready, so a neglected group is also ready to train.
//! - **Untrained**: a tracked group with no history at all. Never reported
//!   as neglected, since there is no date to measure from.
//!
//! The tracker can also build a workout for the most urgent group out of the
//! exercises most recently done for it, with loads from the overload suggester.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::info;

use crate::history::{ExerciseHistory, TrainingHistory};
use crate::mapping::ExerciseMappingTable;
use crate::overload::{relative_days, OverloadSuggester};
use crate::parser::render_line;

/// Recovery thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Days to recover for groups without their own entry
    pub default_recovery_days: i64,

    /// Per-group recovery days
    pub recovery_days: BTreeMap<String, i64>,

    /// Days after which a group counts as neglected
    pub neglect_days: i64,

    /// Groups reported even when they have never been trained
    pub tracked_groups: Vec<String>,

    /// Exercises in a synthesized workout
    pub max_workout_exercises: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        let recovery_days = [
            ("arms", 2),
            ("biceps", 2),
            ("triceps", 2),
            ("shoulders", 2),
            ("calves", 1),
            ("core", 1),
            ("abs", 1),
        ]
        .into_iter()
        .map(|(group, days)| (group.to_string(), days))
        .collect();

        let tracked_groups = [
            "chest", "back", "shoulders", "arms", "biceps", "triceps", "legs", "glutes", "calves",
            "core", "abs",
        ]
        .iter()
        .map(|g| g.to_string())
        .collect();

        Self {
            default_recovery_days: 3,
            recovery_days,
            neglect_days: 7,
            tracked_groups,
            max_workout_exercises: 4,
        }
    }
}

impl RecoveryConfig {
    pub fn threshold_for(&self, group: &str) -> i64 {
        self.recovery_days
            .get(group)
            .copied()
            .unwrap_or(self.default_recovery_days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Recovering,
    Ready,
    Neglected,
    Untrained,
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryStatus::Recovering => write!(f, "recovering"),
            RecoveryStatus::Ready => write!(f, "ready"),
            RecoveryStatus::Neglected => write!(f, "neglected"),
            RecoveryStatus::Untrained => write!(f, "untrained"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleGroupStatus {
    pub group: String,
    pub last_trained_date: Option<NaiveDate>,
    /// Absent for a group with no history
    pub days_since: Option<i64>,
    pub threshold_days: i64,
    pub status: RecoveryStatus,
}

impl MuscleGroupStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self.status, RecoveryStatus::Ready | RecoveryStatus::Neglected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryReport {
    /// Every known group, longest rested first, untrained last
    pub statuses: Vec<MuscleGroupStatus>,

    /// Ready groups that are not neglected, longest rested first
    pub ready: Vec<String>,

    /// Neglected groups, longest rested first, parents dropped when a sub-group is listed
    pub neglected: Vec<String>,

    pub recovering: Vec<String>,

    pub untrained: Vec<String>,
}

impl RecoveryReport {
    pub fn status_of(&self, group: &str) -> Option<&MuscleGroupStatus> {
        self.statuses.iter().find(|s| s.group == group)
    }

    fn messages(&self) -> Vec<(&'static str, String)> {
        let mut messages = Vec::new();
        if !self.neglected.is_empty() {
            let groups: Vec<_> = self.neglected.iter().take(3).cloned().collect();
            messages.push(("Neglected:", groups.join(", ")));
        }
        if !self.ready.is_empty() {
            let groups: Vec<_> = self
                .ready
                .iter()
                .map(|group| match self.status_of(group).and_then(|s| s.days_since) {
                    Some(days) => format!("{} ({})", group, relative_days(days)),
                    None => group.clone(),
                })
                .collect();
            messages.push(("Ready to train:", groups.join(", ")));
        }
        if !self.untrained.is_empty() && (!self.neglected.is_empty() || !self.ready.is_empty()) {
            messages.push(("Not yet trained:", self.untrained.join(", ")));
        }
        messages
    }

    /// Plain summary, categories joined with " • "
    pub fn summary(&self) -> String {
        let messages = self.messages();
        if messages.is_empty() {
            return "No recent workout data".to_string();
        }
        messages
            .iter()
            .map(|(label, groups)| format!("{} {}", label, groups))
            .collect::<Vec<_>>()
            .join(" • ")
    }

    /// Summary with emphasized labels, one category per line
    pub fn summary_html(&self) -> String {
        let messages = self.messages();
        if messages.is_empty() {
            return "No recent workout data".to_string();
        }
        messages
            .iter()
            .map(|(label, groups)| format!("<strong>{}</strong> {}", label, groups))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Workout built for the most urgent groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedWorkout {
    pub target_group: String,
    pub groups: Vec<String>,
    pub text: String,
}

pub struct RecoveryTracker<'a> {
    config: &'a RecoveryConfig,
    table: &'a ExerciseMappingTable,
}

impl<'a> RecoveryTracker<'a> {
    pub fn new(config: &'a RecoveryConfig, table: &'a ExerciseMappingTable) -> Self {
        Self { config, table }
    }

    pub fn check(&self, history: &TrainingHistory, today: NaiveDate) -> RecoveryReport {
        let last_trained = history.group_last_trained();

        let mut statuses: Vec<MuscleGroupStatus> = last_trained
            .iter()
            .map(|(group, last)| {
                let days = (today - *last).num_days().max(0);
                let threshold = self.config.threshold_for(group);
                let status = if days > self.config.neglect_days {
                    RecoveryStatus::Neglected
                } else if days >= threshold {
                    RecoveryStatus::Ready
                } else {
                    RecoveryStatus::Recovering
                };
                MuscleGroupStatus {
                    group: group.clone(),
                    last_trained_date: Some(*last),
                    days_since: Some(days),
                    threshold_days: threshold,
                    status,
                }
            })
            .collect();

        // longest rested first; ties by name
        statuses.sort_by(|a, b| b.days_since.cmp(&a.days_since).then_with(|| a.group.cmp(&b.group)));

        for group in &self.config.tracked_groups {
            if !last_trained.contains_key(group) {
                statuses.push(MuscleGroupStatus {
                    group: group.clone(),
                    last_trained_date: None,
                    days_since: None,
                    threshold_days: self.config.threshold_for(group),
                    status: RecoveryStatus::Untrained,
                });
            }
        }

        let names = |status: RecoveryStatus| -> Vec<String> {
            statuses
                .iter()
                .filter(|s| s.status == status)
                .map(|s| s.group.clone())
                .collect()
        };

        let report = RecoveryReport {
            ready: names(RecoveryStatus::Ready),
            neglected: self.drop_covered_parents(names(RecoveryStatus::Neglected)),
            recovering: names(RecoveryStatus::Recovering),
            untrained: names(RecoveryStatus::Untrained),
            statuses,
        };

        info!(
            ready = report.ready.len(),
            neglected = report.neglected.len(),
            untrained = report.untrained.len(),
            "Recovery check complete"
        );
        report
    }

    fn drop_covered_parents(&self, groups: Vec<String>) -> Vec<String> {
        let listed: BTreeSet<&str> = groups.iter().map(String::as_str).collect();
        groups
            .iter()
            .filter(|group| {
                !self
                    .table
                    .sub_groups(group)
                    .iter()
                    .any(|child| listed.contains(child.as_str()))
            })
            .cloned()
            .collect()
    }

    /// Build a workout for the most urgent ready or neglected group, topping
    /// up with the next most urgent groups until the exercise limit is reached.
    /// `None` when no trained group is ready.
    pub fn suggest_workout(
        &self,
        history: &TrainingHistory,
        suggester: &OverloadSuggester<'_>,
        today: NaiveDate,
    ) -> Option<SuggestedWorkout> {
        let report = self.check(history, today);

        let mut targets: Vec<&MuscleGroupStatus> =
            report.statuses.iter().filter(|s| s.is_ready()).collect();
        targets.sort_by(|a, b| {
            b.days_since
                .cmp(&a.days_since)
                .then_with(|| b.status.cmp(&a.status))
                .then_with(|| a.group.cmp(&b.group))
        });
        let target_group = targets.first()?.group.clone();

        let mut histories: Vec<_> = history.exercise_histories().into_values().collect();
        histories.sort_by(|a, b| {
            let last = |h: &ExerciseHistory| h.last().map(|s| s.date);
            last(b).cmp(&last(a))
        });

        let mut lines = Vec::new();
        let mut groups = Vec::new();
        let mut used = BTreeSet::new();

        for target in &targets {
            if lines.len() >= self.config.max_workout_exercises {
                break;
            }
            let before = lines.len();
            for exercise in histories
                .iter()
                .filter(|h| h.muscle_groups.contains(&target.group))
            {
                if lines.len() >= self.config.max_workout_exercises {
                    break;
                }
                if !used.insert(exercise.canonical_name.clone()) {
                    continue;
                }
                if let Some(plan) = suggester.plan(exercise, today) {
                    lines.push(render_line(&exercise.canonical_name, &plan.suggested_sets));
                }
            }
            if lines.len() > before {
                groups.push(target.group.clone());
            }
        }

        if lines.is_empty() {
            return None;
        }

        info!(target = %target_group, exercises = lines.len(), "Synthesized workout");
        Some(SuggestedWorkout {
            target_group,
            groups,
            text: lines.join("\n"),
        })
    }
}
