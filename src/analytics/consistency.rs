use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::round1;
use crate::history::TrainingHistory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Trailing window for the weekly average
    pub window_days: i64,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self { window_days: 28 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub insight: String,
    pub workouts_per_week: f64,
    /// Consecutive training days ending at the most recent entry
    pub current_streak: u32,
    pub workouts_in_window: usize,
    pub last_workout: Option<NaiveDate>,
}

/// Entries in the trailing window divided by its length in weeks, and the
/// run of consecutive days walking back from the latest entry. Entries dated
/// after `today` are ignored.
pub fn analyze(history: &TrainingHistory, config: &ConsistencyConfig, today: NaiveDate) -> ConsistencyReport {
    let window_start = today - Duration::days(config.window_days);
    let workouts_in_window = history.between(window_start, today).count();
    let weeks = config.window_days.max(1) as f64 / 7.0;
    let workouts_per_week = round1(workouts_in_window as f64 / weeks);

    let days: BTreeSet<NaiveDate> = history
        .sessions()
        .iter()
        .map(|s| s.date)
        .filter(|d| *d <= today)
        .collect();
    let last_workout = days.iter().next_back().copied();

    let mut current_streak = 0;
    if let Some(mut day) = last_workout {
        while days.contains(&day) {
            current_streak += 1;
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
    }

    let insight = if last_workout.is_none() {
        "Log more workouts to see consistency metrics".to_string()
    } else {
        let streak = if current_streak == 1 {
            "1-day streak".to_string()
        } else {
            format!("{}-day streak", current_streak)
        };
        format!(
            "You're averaging {:.1} workouts/week with a {}",
            workouts_per_week, streak
        )
    };

    ConsistencyReport {
        insight,
        workouts_per_week,
        current_streak,
        workouts_in_window,
        last_workout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutEntry;
    use crate::resolver::MuscleGroupResolver;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    fn history(days: &[u32]) -> TrainingHistory {
        let entries: Vec<_> = days
            .iter()
            .map(|d| WorkoutEntry::new(date(*d), "squat - 200 * 5"))
            .collect();
        TrainingHistory::build(&entries, &MuscleGroupResolver::builtin())
    }

    #[test]
    fn test_workouts_per_week() {
        let report = analyze(&history(&[1, 5, 9, 12, 15, 20, 22, 29]), &ConsistencyConfig::default(), date(29));
        // 11/01 is exactly 28 days back and still counts
        assert_eq!(report.workouts_in_window, 8);
        assert_eq!(report.workouts_per_week, 2.0);
    }

    #[test]
    fn test_streak_walks_back_from_latest_entry() {
        let report = analyze(&history(&[3, 5, 6, 7]), &ConsistencyConfig::default(), date(20));
        assert_eq!(report.current_streak, 3);
        assert_eq!(report.last_workout, Some(date(7)));
        assert_eq!(report.workouts_per_week, 1.0);
    }

    #[test]
    fn test_same_day_entries_count_once_in_streak() {
        let report = analyze(&history(&[6, 7, 7]), &ConsistencyConfig::default(), date(7));
        assert_eq!(report.current_streak, 2);
        assert_eq!(report.workouts_in_window, 3);
        assert_eq!(report.insight, "You're averaging 0.8 workouts/week with a 2-day streak");
    }

    #[test]
    fn test_empty_history() {
        let report = analyze(&history(&[]), &ConsistencyConfig::default(), date(7));
        assert_eq!(report.current_streak, 0);
        assert_eq!(report.workouts_per_week, 0.0);
        assert_eq!(report.insight, "Log more workouts to see consistency metrics");
    }

    #[test]
    fn test_future_entries_ignored() {
        let report = analyze(&history(&[5, 6, 10]), &ConsistencyConfig::default(), date(6));
        assert_eq!(report.current_streak, 2);
        assert_eq!(report.workouts_in_window, 2);
    }
}
