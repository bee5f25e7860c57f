//! Request and response shapes
//!
//! Field names here are the contract with callers and must not change.
//! Optional fields are omitted from JSON when absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::AnalyticsReport;
use crate::error::LiftLogError;
use crate::overload::OverloadSuggestion;
use crate::recovery::{MuscleGroupStatus, RecoveryReport, SuggestedWorkout};
use crate::search::{SearchOutcome, SearchSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub workout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestResponse {
    pub success: bool,
    pub suggestions: Vec<OverloadSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryResponse {
    pub success: bool,
    pub recovery_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_status_formatted: Option<String>,
    pub neglected_groups: Vec<String>,
    pub ready: Vec<String>,
    /// Tracked groups with no history, kept apart from neglected ones
    pub untrained: Vec<String>,
    pub groups: Vec<MuscleGroupStatus>,
}

impl From<RecoveryReport> for RecoveryResponse {
    fn from(report: RecoveryReport) -> Self {
        let has_status = !report.neglected.is_empty() || !report.ready.is_empty();
        Self {
            success: true,
            recovery_status: report.summary(),
            recovery_status_formatted: has_status.then(|| report.summary_html()),
            neglected_groups: report.neglected,
            ready: report.ready,
            untrained: report.untrained,
            groups: report.statuses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeglectedWorkoutResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_group: Option<String>,
    /// Only set when no workout could be built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Option<SuggestedWorkout>> for NeglectedWorkoutResponse {
    fn from(workout: Option<SuggestedWorkout>) -> Self {
        match workout {
            Some(workout) => Self {
                success: true,
                workout: Some(workout.text),
                target_group: Some(workout.target_group),
                message: None,
            },
            None => Self {
                success: false,
                workout: None,
                target_group: None,
                message: Some("No muscle group is ready and has prior exercises to build from".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: AnalyticsReport,
    /// Advisory narrative per report, when the collaborator answered
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub narrative: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub workout_indices: Vec<usize>,
    pub source: SearchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_notice: Option<String>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            success: true,
            workout_indices: outcome.indices,
            source: outcome.source,
            advisory_notice: outcome.notice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when cost control refused the call
    pub budget_exhausted: bool,
}

/// Failure body for any request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub budget_exhausted: bool,
}

impl From<&LiftLogError> for ErrorResponse {
    fn from(error: &LiftLogError) -> Self {
        Self {
            success: false,
            error: error.user_message(),
            budget_exhausted: error.is_budget_exhausted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdvisoryError, BudgetPeriod};
    use serde_json::json;

    #[test]
    fn test_neglected_response_shapes() {
        let ok = NeglectedWorkoutResponse::from(Some(SuggestedWorkout {
            target_group: "legs".to_string(),
            groups: vec!["legs".to_string()],
            text: "Squat - 230 * 5".to_string(),
        }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"success": true, "workout": "Squat - 230 * 5", "target_group": "legs"})
        );

        let failed = serde_json::to_value(NeglectedWorkoutResponse::from(None)).unwrap();
        assert_eq!(failed["success"], false);
        assert!(failed.get("workout").is_none());
        assert!(failed["message"].is_string());
    }

    #[test]
    fn test_search_request_and_response() {
        let request: SearchRequest = serde_json::from_str(r#"{"query": "leg day"}"#).unwrap();
        assert_eq!(request.query, "leg day");

        let response = SearchResponse::from(SearchOutcome {
            indices: vec![3, 1],
            source: SearchSource::Fallback,
            notice: None,
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["workout_indices"], json!([3, 1]));
        assert_eq!(value["source"], "fallback");
        assert!(value.get("advisory_notice").is_none());
    }

    #[test]
    fn test_recovery_response_without_data() {
        let response = RecoveryResponse::from(RecoveryReport::default());
        assert_eq!(response.recovery_status, "No recent workout data");
        assert!(response.recovery_status_formatted.is_none());
    }

    #[test]
    fn test_error_response_flags_budget() {
        let err = LiftLogError::Advisory(AdvisoryError::BudgetExhausted {
            period: BudgetPeriod::Monthly,
            spent: 20.5,
            limit: 20.0,
        });
        let response = ErrorResponse::from(&err);
        assert!(!response.success);
        assert!(response.budget_exhausted);
        assert!(response.error.contains("monthly"));
    }
}
