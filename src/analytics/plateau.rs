//! Plateau detection
//!
//! A plateau is a run of at least `session_threshold` sessions, starting at
//! the most recent load increase, with no further increase. An increase is a
//! representative load more than `tolerance` above every earlier session.
//! Only loads of the same kind as the latest session are compared.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::history::{ExerciseSession, TrainingHistory};
use crate::models::RepresentativeLoad;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateauConfig {
    /// Sessions without an increase before an exercise is flagged
    pub session_threshold: usize,

    /// Load change that still counts as no increase
    pub tolerance: Decimal,

    /// Exercises not done for longer than this are not reported
    pub stale_after_days: i64,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            session_threshold: 3,
            tolerance: dec!(0.5),
            stale_after_days: 28,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateauFinding {
    pub exercise: String,
    pub current: String,
    pub weeks_stagnant: i64,
    pub sessions_without_increase: usize,
    pub last_increase: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateauReport {
    pub insight: String,
    pub exercises: Vec<PlateauFinding>,
}

pub fn analyze(history: &TrainingHistory, config: &PlateauConfig, today: NaiveDate) -> PlateauReport {
    let stale_before = today - Duration::days(config.stale_after_days);
    let mut exercises: Vec<PlateauFinding> = history
        .exercise_histories()
        .values()
        .filter_map(|exercise| {
            let sessions: Vec<&ExerciseSession> =
                exercise.sessions.iter().filter(|s| s.date <= today).collect();
            let last = sessions.last()?;
            if last.date < stale_before {
                return None;
            }
            detect(&exercise.canonical_name, &sessions, config, today)
        })
        .collect();

    exercises.sort_by(|a, b| {
        b.weeks_stagnant
            .cmp(&a.weeks_stagnant)
            .then_with(|| b.sessions_without_increase.cmp(&a.sessions_without_increase))
            .then_with(|| a.exercise.cmp(&b.exercise))
    });

    let insight = match exercises.as_slice() {
        [] => "No plateaus detected - keep pushing!".to_string(),
        [only] => format!(
            "{} has stalled at {} for {} sessions. Consider a deload or a new rep range.",
            only.exercise, only.current, only.sessions_without_increase
        ),
        [first, rest @ ..] => format!(
            "{} has stalled at {}, along with {} other exercise{}. Consider a deload or a new rep range.",
            first.exercise,
            first.current,
            rest.len(),
            if rest.len() == 1 { "" } else { "s" }
        ),
    };

    PlateauReport { insight, exercises }
}

fn detect(
    name: &str,
    sessions: &[&ExerciseSession],
    config: &PlateauConfig,
    today: NaiveDate,
) -> Option<PlateauFinding> {
    let loads: Vec<(NaiveDate, RepresentativeLoad)> = sessions
        .iter()
        .filter_map(|s| s.performance.representative_load().map(|l| (s.date, l)))
        .collect();
    let (_, latest) = *loads.last()?;
    let loads: Vec<(NaiveDate, RepresentativeLoad)> = loads
        .into_iter()
        .filter(|(_, l)| l.same_kind(&latest))
        .collect();

    let mut best = loads.first()?.1.value();
    let mut last_increase = 0;
    for (i, (_, load)) in loads.iter().enumerate().skip(1) {
        if load.value() > best + config.tolerance {
            last_increase = i;
        }
        best = best.max(load.value());
    }

    let run = loads.len() - last_increase;
    if run < config.session_threshold.max(2) {
        return None;
    }

    let increase_date = loads[last_increase].0;
    Some(PlateauFinding {
        exercise: name.to_string(),
        current: latest.to_string(),
        weeks_stagnant: (today - increase_date).num_days().max(0) / 7,
        sessions_without_increase: run,
        last_increase: increase_date,
    })
}
