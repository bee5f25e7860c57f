//! Resolved training history
//!
//! Parses and resolves every entry once so recovery, analytics, overload and
//! search all read the same view. Sessions are ordered by date; entries on
//! the same day keep the order they were given in.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::models::{
    CardioActivity, EntryId, ExercisePerformance, NormalizedExercise, WorkoutEntry,
};
use crate::parser::{parse_workout_text, SkippedLine};
use crate::resolver::MuscleGroupResolver;

/// A parsed performance with its resolved exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPerformance {
    pub performance: ExercisePerformance,
    pub exercise: NormalizedExercise,
}

/// One entry after parsing and resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSession {
    /// Position of the entry in the caller's listing
    pub position: usize,
    pub entry_id: EntryId,
    pub date: NaiveDate,
    pub exercises: Vec<ResolvedPerformance>,
    pub cardio: Vec<CardioActivity>,
    pub skipped: Vec<SkippedLine>,
}

impl TrainingSession {
    /// Union of muscle groups over matched exercises
    pub fn muscle_groups(&self) -> BTreeSet<&str> {
        self.exercises
            .iter()
            .flat_map(|r| r.exercise.muscle_groups.iter().map(String::as_str))
            .collect()
    }

    pub fn trains_group(&self, group: &str) -> bool {
        self.exercises
            .iter()
            .any(|r| r.exercise.muscle_groups.contains(group))
    }
}

/// One dated occurrence of an exercise. Repeated lines for the same exercise
/// within an entry are merged in line order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSession {
    pub position: usize,
    pub entry_id: EntryId,
    pub date: NaiveDate,
    pub performance: ExercisePerformance,
}

/// Chronological sessions of one canonical exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistory {
    pub canonical_name: String,
    pub muscle_groups: BTreeSet<String>,
    pub unmatched: bool,
    pub sessions: Vec<ExerciseSession>,
}

impl ExerciseHistory {
    pub fn last(&self) -> Option<&ExerciseSession> {
        self.sessions.last()
    }

    /// Sessions strictly before `date`, oldest first
    pub fn before(&self, date: NaiveDate) -> &[ExerciseSession] {
        let end = self.sessions.partition_point(|s| s.date < date);
        &self.sessions[..end]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    sessions: Vec<TrainingSession>,
    unmatched: BTreeSet<String>,
    mapping_version: u32,
}

impl TrainingHistory {
    /// Parse and resolve `entries`. Positions refer to indices in `entries`.
    pub fn build(entries: &[WorkoutEntry], resolver: &MuscleGroupResolver) -> Self {
        let mut sessions: Vec<TrainingSession> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| resolve_entry(position, entry, resolver))
            .collect();
        sessions.sort_by_key(|s| (s.date, s.position));

        let unmatched: BTreeSet<String> = sessions
            .iter()
            .flat_map(|s| s.exercises.iter())
            .filter(|r| r.exercise.unmatched)
            .map(|r| r.exercise.canonical_name.clone())
            .collect();

        debug!(
            entries = entries.len(),
            unmatched = unmatched.len(),
            "Built training history"
        );

        Self {
            sessions,
            unmatched,
            mapping_version: resolver.version(),
        }
    }

    /// Version of the mapping table the sessions were resolved with
    pub fn mapping_version(&self) -> u32 {
        self.mapping_version
    }

    pub fn sessions(&self) -> &[TrainingSession] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.sessions.last().map(|s| s.date)
    }

    /// Exercise names with no mapping, for growing the table
    pub fn unmatched_exercises(&self) -> &BTreeSet<String> {
        &self.unmatched
    }

    pub fn skipped_lines(&self) -> impl Iterator<Item = (&TrainingSession, &SkippedLine)> {
        self.sessions
            .iter()
            .flat_map(|s| s.skipped.iter().map(move |line| (s, line)))
    }

    /// Sessions dated within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &TrainingSession> {
        self.sessions
            .iter()
            .filter(move |s| s.date >= start && s.date <= end)
    }

    /// Most recent date each muscle group was trained
    pub fn group_last_trained(&self) -> BTreeMap<String, NaiveDate> {
        let mut last = BTreeMap::new();
        for session in &self.sessions {
            for group in session.muscle_groups() {
                last.entry(group.to_string())
                    .and_modify(|d: &mut NaiveDate| *d = (*d).max(session.date))
                    .or_insert(session.date);
            }
        }
        last
    }

    /// Per-exercise chronological histories keyed by canonical key
    pub fn exercise_histories(&self) -> BTreeMap<String, ExerciseHistory> {
        let mut histories: BTreeMap<String, ExerciseHistory> = BTreeMap::new();

        for session in &self.sessions {
            for resolved in &session.exercises {
                let history = histories
                    .entry(resolved.exercise.key())
                    .or_insert_with(|| ExerciseHistory {
                        canonical_name: resolved.exercise.canonical_name.clone(),
                        muscle_groups: resolved.exercise.muscle_groups.clone(),
                        unmatched: resolved.exercise.unmatched,
                        sessions: Vec::new(),
                    });

                match history.sessions.last_mut() {
                    Some(last) if last.entry_id == session.entry_id => {
                        last.performance
                            .sets
                            .extend(resolved.performance.sets.iter().copied());
                    }
                    _ => history.sessions.push(ExerciseSession {
                        position: session.position,
                        entry_id: session.entry_id,
                        date: session.date,
                        performance: resolved.performance.clone(),
                    }),
                }
            }
        }

        histories
    }
}

fn resolve_entry(
    position: usize,
    entry: &WorkoutEntry,
    resolver: &MuscleGroupResolver,
) -> TrainingSession {
    let parsed = parse_workout_text(&entry.text);
    let exercises = parsed
        .exercises
        .into_iter()
        .map(|performance| ResolvedPerformance {
            exercise: resolver.resolve(&performance.exercise_name),
            performance,
        })
        .collect();

    TrainingSession {
        position,
        entry_id: entry.id,
        date: entry.date,
        exercises,
        cardio: parsed.cardio,
        skipped: parsed.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries() -> Vec<WorkoutEntry> {
        vec![
            WorkoutEntry::new(date(2024, 11, 12), "bench press - 185 * 5\nrun 2 mi"),
            WorkoutEntry::new(date(2024, 11, 10), "squat - 225 * 5\nbench - 180 * 5"),
            WorkoutEntry::new(
                date(2024, 11, 14),
                "bench press - 185 * 6\nbench press - 135 * 10\nturkish get up - 20 * 3\n???",
            ),
        ]
    }

    #[test]
    fn test_sessions_sorted_by_date_with_positions() {
        let history = TrainingHistory::build(&entries(), &MuscleGroupResolver::builtin());
        let positions: Vec<_> = history.sessions().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 0, 2]);
        assert_eq!(history.latest_date(), Some(date(2024, 11, 14)));
        assert_eq!(history.sessions()[1].cardio.len(), 1);
    }

    #[test]
    fn test_unmatched_and_skipped_are_surfaced() {
        let history = TrainingHistory::build(&entries(), &MuscleGroupResolver::builtin());
        assert!(history.unmatched_exercises().contains("turkish get up"));
        let skipped: Vec<_> = history.skipped_lines().map(|(_, l)| l.text.as_str()).collect();
        assert_eq!(skipped, vec!["???"]);
    }

    #[test]
    fn test_group_last_trained() {
        let history = TrainingHistory::build(&entries(), &MuscleGroupResolver::builtin());
        let last = history.group_last_trained();
        assert_eq!(last["chest"], date(2024, 11, 14));
        assert_eq!(last["legs"], date(2024, 11, 10));
        assert!(!last.contains_key("calves"));
    }

    #[test]
    fn test_exercise_histories_merge_repeated_lines() {
        let history = TrainingHistory::build(&entries(), &MuscleGroupResolver::builtin());
        let histories = history.exercise_histories();
        let bench = &histories["bench press"];
        assert_eq!(bench.sessions.len(), 3);
        assert_eq!(bench.sessions[2].performance.sets.len(), 2);
        assert_eq!(bench.before(date(2024, 11, 14)).len(), 2);
        assert!(histories["turkish get up"].unmatched);
    }
}
