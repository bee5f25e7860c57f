//! Training analytics
//!
//! Four independent reports over the resolved history, plus the personal
//! record flags stored on entries. Every report tolerates an empty or short
//! history and answers with a neutral insight instead of an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::history::TrainingHistory;

pub mod balance;
pub mod consistency;
pub mod plateau;
pub mod records;
pub mod strength;

pub use balance::{BalanceConfig, GroupCount, MuscleBalanceReport};
pub use consistency::{ConsistencyConfig, ConsistencyReport};
pub use plateau::{PlateauConfig, PlateauFinding, PlateauReport};
pub use records::{evaluate_records, RecordSummary};
pub use strength::{StrengthConfig, StrengthTrend, StrengthTrendReport};

/// Thresholds for all four reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub strength: StrengthConfig,
    pub consistency: ConsistencyConfig,
    pub plateau: PlateauConfig,
    pub balance: BalanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub strength_trends: StrengthTrendReport,
    pub consistency: ConsistencyReport,
    pub plateaus: PlateauReport,
    pub muscle_balance: MuscleBalanceReport,
}

impl AnalyticsReport {
    /// Rule-based insight per report, keyed by report name
    pub fn insights(&self) -> [(&'static str, &str); 4] {
        [
            ("strength_trends", self.strength_trends.insight.as_str()),
            ("consistency", self.consistency.insight.as_str()),
            ("plateaus", self.plateaus.insight.as_str()),
            ("muscle_balance", self.muscle_balance.insight.as_str()),
        ]
    }
}

/// Runs every report against one history snapshot
pub struct AnalyticsEngine<'a> {
    config: &'a AnalyticsConfig,
    tracked_groups: &'a [String],
}

impl<'a> AnalyticsEngine<'a> {
    /// `tracked_groups` are the groups the balance report lists as untrained
    /// when they never appear in history.
    pub fn new(config: &'a AnalyticsConfig, tracked_groups: &'a [String]) -> Self {
        Self {
            config,
            tracked_groups,
        }
    }

    pub fn analyze(&self, history: &TrainingHistory, today: NaiveDate) -> AnalyticsReport {
        let report = AnalyticsReport {
            strength_trends: strength::analyze(history, &self.config.strength, today),
            consistency: consistency::analyze(history, &self.config.consistency, today),
            plateaus: plateau::analyze(history, &self.config.plateau, today),
            muscle_balance: balance::analyze(
                history,
                &self.config.balance,
                self.tracked_groups,
                today,
            ),
        };

        info!(
            sessions = history.len(),
            trends = report.strength_trends.exercises.len(),
            plateaus = report.plateaus.exercises.len(),
            imbalances = report.muscle_balance.imbalances.len(),
            "Analytics generated"
        );
        report
    }
}

/// Round for display in reports
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutEntry;
    use crate::resolver::MuscleGroupResolver;

    #[test]
    fn test_empty_history_gives_neutral_insights() {
        let config = AnalyticsConfig::default();
        let history = TrainingHistory::build(&[], &MuscleGroupResolver::builtin());
        let today = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        let report = AnalyticsEngine::new(&config, &[]).analyze(&history, today);

        assert!(report.strength_trends.exercises.is_empty());
        assert_eq!(report.consistency.current_streak, 0);
        assert_eq!(report.consistency.workouts_per_week, 0.0);
        assert!(report.plateaus.exercises.is_empty());
        assert!(report.muscle_balance.imbalances.is_empty());
        for (_, insight) in report.insights() {
            assert!(!insight.is_empty());
        }
    }

    #[test]
    fn test_reports_are_independent_of_entry_order() {
        let config = AnalyticsConfig::default();
        let resolver = MuscleGroupResolver::builtin();
        let d = |day| NaiveDate::from_ymd_opt(2024, 11, day).unwrap();
        let mut entries = vec![
            WorkoutEntry::new(d(1), "squat - 200 * 5"),
            WorkoutEntry::new(d(8), "squat - 210 * 5"),
            WorkoutEntry::new(d(15), "squat - 220 * 5"),
        ];
        let forward = AnalyticsEngine::new(&config, &[])
            .analyze(&TrainingHistory::build(&entries, &resolver), d(16));
        entries.reverse();
        let backward = AnalyticsEngine::new(&config, &[])
            .analyze(&TrainingHistory::build(&entries, &resolver), d(16));

        assert_eq!(forward.strength_trends, backward.strength_trends);
        assert_eq!(forward.consistency, backward.consistency);
    }
}
