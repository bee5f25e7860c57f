//! Strength trend report
//!
//! Per canonical exercise, compares the earliest and latest representative
//! load inside a trailing window. Weighted sessions are preferred; reps are
//! only used for exercises with no weighted session in the window, and the
//! two are never mixed.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round1;
use crate::history::{ExerciseSession, TrainingHistory};
use crate::models::{format_weight, RepresentativeLoad};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    /// Trailing window in weeks, used when `last_sessions` is unset
    pub window_weeks: i64,

    /// Use the last N sessions of each exercise instead of a date window
    pub last_sessions: Option<usize>,

    /// Sessions needed in the window before a trend is reported
    pub min_sessions: usize,

    pub top_k: usize,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            window_weeks: 8,
            last_sessions: None,
            min_sessions: 2,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthTrend {
    pub exercise: String,

    /// Latest minus earliest, in `unit`
    pub improvement: f64,

    /// Omitted when the earliest value is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,

    pub unit: String,
    pub earliest: String,
    pub latest: String,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthTrendReport {
    pub insight: String,
    pub exercises: Vec<StrengthTrend>,
}

pub fn analyze(history: &TrainingHistory, config: &StrengthConfig, today: NaiveDate) -> StrengthTrendReport {
    let window_start = today - Duration::weeks(config.window_weeks);
    let mut trends: Vec<(Decimal, StrengthTrend)> = Vec::new();

    for exercise in history.exercise_histories().values() {
        let prior: Vec<&ExerciseSession> = exercise
            .sessions
            .iter()
            .filter(|s| s.date <= today)
            .collect();
        let windowed: Vec<&ExerciseSession> = match config.last_sessions {
            Some(n) => prior[prior.len().saturating_sub(n)..].to_vec(),
            None => prior.into_iter().filter(|s| s.date >= window_start).collect(),
        };

        let loads = comparable_loads(&windowed);
        if loads.len() < config.min_sessions.max(2) {
            continue;
        }
        let (Some(earliest), Some(latest)) = (loads.first(), loads.last()) else {
            continue;
        };

        let improvement = latest.value() - earliest.value();
        let percent = if earliest.value().is_zero() {
            None
        } else {
            (improvement / earliest.value() * Decimal::from(100))
                .to_f64()
                .map(round1)
        };

        trends.push((
            improvement,
            StrengthTrend {
                exercise: exercise.canonical_name.clone(),
                improvement: round1(improvement.to_f64().unwrap_or_default()),
                percent,
                unit: latest.unit().to_string(),
                earliest: earliest.to_string(),
                latest: latest.to_string(),
                sessions: loads.len(),
            },
        ));
    }

    let measured = trends.len();
    trends.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.exercise.cmp(&b.1.exercise)));
    let exercises: Vec<StrengthTrend> = trends
        .into_iter()
        .take(config.top_k)
        .map(|(_, trend)| trend)
        .collect();

    StrengthTrendReport {
        insight: insight(&exercises, measured, config),
        exercises,
    }
}

/// Loads of one kind across the sessions, weighted preferred
fn comparable_loads(sessions: &[&ExerciseSession]) -> Vec<RepresentativeLoad> {
    let loads: Vec<RepresentativeLoad> = sessions
        .iter()
        .filter_map(|s| s.performance.representative_load())
        .collect();
    let any_weighted = loads
        .iter()
        .any(|l| matches!(l, RepresentativeLoad::Weight(_)));

    loads
        .into_iter()
        .filter(|l| matches!(l, RepresentativeLoad::Weight(_)) == any_weighted)
        .collect()
}

fn window_label(config: &StrengthConfig) -> String {
    match config.last_sessions {
        Some(n) => format!("last {} sessions", n),
        None => format!("last {} weeks", config.window_weeks),
    }
}

fn insight(exercises: &[StrengthTrend], measured: usize, config: &StrengthConfig) -> String {
    if measured == 0 {
        return "Track more workouts to see strength trends".to_string();
    }

    let gains: Vec<&StrengthTrend> = exercises.iter().filter(|t| t.improvement > 0.0).collect();
    let Some(best) = gains.first() else {
        return format!(
            "No strength gains over the {} yet. Steady sessions will move the numbers.",
            window_label(config)
        );
    };

    let amount = Decimal::try_from(best.improvement)
        .map(format_weight)
        .unwrap_or_else(|_| best.improvement.to_string());
    let percent = best
        .percent
        .map(|p| format!(" (+{}%)", p.round()))
        .unwrap_or_default();
    let mut text = format!(
        "{} is up {} {}{} over the {}.",
        best.exercise,
        amount,
        best.unit,
        percent,
        window_label(config)
    );
    if gains.len() > 1 {
        text.push_str(&format!(" {} exercises are trending up.", gains.len()));
    }
    text
}
