use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::round1;
use crate::history::TrainingHistory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub window_days: i64,

    /// Groups trained less than this share of the busiest group are flagged
    pub imbalance_percent: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            imbalance_percent: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub group: String,
    /// Sessions in the window that trained the group
    pub count: usize,
    /// Share of the busiest group's count, in percent
    pub vs_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleBalanceReport {
    pub insight: String,
    pub counts: Vec<GroupCount>,
    pub imbalances: Vec<GroupCount>,
    /// Tracked groups with no session anywhere in history
    pub untrained: Vec<String>,
}

/// Sessions per muscle group over the trailing window. A session counts once
/// per group no matter how many of its exercises hit it. Groups seen earlier
/// in history but absent from the window are reported with a zero count.
pub fn analyze(
    history: &TrainingHistory,
    config: &BalanceConfig,
    tracked_groups: &[String],
    today: NaiveDate,
) -> MuscleBalanceReport {
    let window_start = today - Duration::days(config.window_days);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for session in history.sessions().iter().filter(|s| s.date <= today) {
        let in_window = session.date >= window_start;
        for group in session.muscle_groups() {
            let count = counts.entry(group.to_string()).or_insert(0);
            if in_window {
                *count += 1;
            }
        }
    }

    let untrained: Vec<String> = tracked_groups
        .iter()
        .filter(|g| !counts.contains_key(g.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let max = counts.values().copied().max().unwrap_or(0);
    if max == 0 {
        return MuscleBalanceReport {
            insight: "Not enough data yet".to_string(),
            counts: Vec::new(),
            imbalances: Vec::new(),
            untrained,
        };
    }

    let mut counts: Vec<GroupCount> = counts
        .into_iter()
        .map(|(group, count)| GroupCount {
            vs_max: round1(count as f64 / max as f64 * 100.0),
            group,
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));

    let mut imbalances: Vec<GroupCount> = counts
        .iter()
        .filter(|c| c.vs_max < config.imbalance_percent)
        .cloned()
        .collect();
    imbalances.sort_by(|a, b| {
        a.vs_max
            .total_cmp(&b.vs_max)
            .then_with(|| a.group.cmp(&b.group))
    });

    let insight = match (counts.first(), imbalances.first()) {
        (Some(top), Some(low)) => format!(
            "{} trained {}x in the last {} days but {} only {}x. Consider balancing.",
            top.group, top.count, config.window_days, low.group, low.count
        ),
        _ => "Your muscle group training is well-balanced!".to_string(),
    };

    MuscleBalanceReport {
        insight,
        counts,
        imbalances,
        untrained,
    }
}
