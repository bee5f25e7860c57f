//! Request handlers
//!
//! [`Engine`] owns the configuration, the mapping table and the advisory
//! collaborator. Every handler is a pure function of the entries it is given
//! plus `today`; nothing derived is kept between calls except the optional
//! search index file.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::advisory::{advisor_from_config, AdvisoryProvider, InsightRequest};
use crate::analytics::{evaluate_records, AnalyticsEngine, RecordSummary};
use crate::api::{
    AnalyticsResponse, NeglectedWorkoutResponse, RecoveryResponse, SearchRequest, SearchResponse,
    SuggestRequest, SuggestResponse, ThemeResponse,
};
use crate::config::AppConfig;
use crate::error::{AdvisoryError, LiftLogError, Result};
use crate::history::TrainingHistory;
use crate::journal::WorkoutLog;
use crate::logging::DiagnosticReport;
use crate::mapping::ExerciseMappingTable;
use crate::models::WorkoutEntry;
use crate::overload::OverloadSuggester;
use crate::recovery::RecoveryTracker;
use crate::resolver::MuscleGroupResolver;
use crate::search::{SearchIndex, WorkoutSearch};

pub struct Engine {
    config: AppConfig,
    resolver: MuscleGroupResolver,
    advisor: Box<dyn AdvisoryProvider>,
}

impl Engine {
    /// Loads the configured mapping table and selects the advisor
    pub fn new(config: AppConfig) -> Result<Self> {
        let table = match &config.mapping {
            Some(path) => ExerciseMappingTable::load_from_file(path)?,
            None => ExerciseMappingTable::builtin(),
        };
        let table = Arc::new(table);
        let advisor = advisor_from_config(&config.advisory, Arc::clone(&table));
        Ok(Self::with_parts(config, table, advisor))
    }

    pub fn with_parts(
        config: AppConfig,
        table: Arc<ExerciseMappingTable>,
        advisor: Box<dyn AdvisoryProvider>,
    ) -> Self {
        info!(
            mapping_version = table.version,
            exercises = table.mappings.len(),
            advisor = advisor.name(),
            "Engine ready"
        );
        Self {
            resolver: MuscleGroupResolver::new(table),
            config,
            advisor,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn resolver(&self) -> &MuscleGroupResolver {
        &self.resolver
    }

    pub fn advisor(&self) -> &dyn AdvisoryProvider {
        self.advisor.as_ref()
    }

    /// Reads the configured journal and refreshes record flags
    pub fn load_journal(&self) -> Result<WorkoutLog> {
        let mut log = WorkoutLog::load(&self.config.journal)?;
        self.refresh_records(log.entries_mut());
        Ok(log)
    }

    pub fn refresh_records(&self, entries: &mut [WorkoutEntry]) -> RecordSummary {
        evaluate_records(entries, &self.resolver)
    }

    pub fn history(&self, entries: &[WorkoutEntry]) -> TrainingHistory {
        TrainingHistory::build(entries, &self.resolver)
    }

    pub fn suggest(
        &self,
        request: &SuggestRequest,
        entries: &[WorkoutEntry],
        today: NaiveDate,
    ) -> Result<SuggestResponse> {
        if request.workout.trim().is_empty() {
            return Err(LiftLogError::Validation("workout text is empty".to_string()));
        }
        let history = self.history(entries);
        let suggester = OverloadSuggester::new(&self.config.overload, &self.resolver);
        Ok(SuggestResponse {
            success: true,
            suggestions: suggester.suggest(&request.workout, &history, today),
        })
    }

    pub fn recovery(&self, entries: &[WorkoutEntry], today: NaiveDate) -> RecoveryResponse {
        let history = self.history(entries);
        let tracker = RecoveryTracker::new(&self.config.recovery, self.resolver.table());
        tracker.check(&history, today).into()
    }

    pub fn neglected_workout(&self, entries: &[WorkoutEntry], today: NaiveDate) -> NeglectedWorkoutResponse {
        let history = self.history(entries);
        let tracker = RecoveryTracker::new(&self.config.recovery, self.resolver.table());
        let suggester = OverloadSuggester::new(&self.config.overload, &self.resolver);
        tracker.suggest_workout(&history, &suggester, today).into()
    }

    /// The four reports. With `narrate`, the advisor rewrites each insight;
    /// a failing advisor leaves the rule-based insights in place.
    pub fn analytics(&self, entries: &[WorkoutEntry], today: NaiveDate, narrate: bool) -> AnalyticsResponse {
        let history = self.history(entries);
        let engine = AnalyticsEngine::new(&self.config.analytics, &self.config.recovery.tracked_groups);
        let analytics = engine.analyze(&history, today);

        let mut narrative = BTreeMap::new();
        let mut advisory_notice = None;
        if narrate {
            let findings = serde_json::to_value(&analytics).unwrap_or_default();
            for (report, insight) in analytics.insights() {
                let request = InsightRequest {
                    report: report.to_string(),
                    rule_insight: insight.to_string(),
                    findings: findings.get(report).cloned().unwrap_or_default(),
                };
                match self.advisor.insight(&request) {
                    Ok(text) => {
                        narrative.insert(report.to_string(), text);
                    }
                    Err(e) => {
                        warn!(report, error = %e, "Narrative insight unavailable");
                        advisory_notice = Some(advisory_notice_for(&e));
                        break;
                    }
                }
            }
        }

        AnalyticsResponse {
            success: true,
            analytics,
            narrative,
            advisory_notice,
        }
    }

    /// Never fails. Uses the cached preset index when it matches `entries`,
    /// rebuilding and re-saving it otherwise.
    pub fn search(&self, request: &SearchRequest, entries: &[WorkoutEntry]) -> SearchResponse {
        let history = self.history(entries);
        let index = self.search_index(entries, &history);
        WorkoutSearch::new(self.advisor.as_ref())
            .search(&request.query, entries, &history, Some(&index))
            .into()
    }

    fn search_index(&self, entries: &[WorkoutEntry], history: &TrainingHistory) -> SearchIndex {
        let path = self.config.search.index_file.as_ref();
        if let Some(cached) = path
            .filter(|p| p.exists())
            .and_then(|p| match SearchIndex::load(p) {
                Ok(index) => Some(index),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable search index");
                    None
                }
            })
            .filter(|index| index.is_fresh(entries, history.mapping_version()))
        {
            return cached;
        }

        let index = SearchIndex::build(entries, history, &self.config.search);
        if let Some(path) = path {
            if let Err(e) = index.save(path) {
                warn!(path = %path.display(), error = %e, "Failed to cache search index");
            }
        }
        index
    }

    /// Theme for one entry from the advisor. Budget refusals stay distinct.
    pub fn theme(&self, entry: &WorkoutEntry) -> Result<String> {
        Ok(self.advisor.theme(&entry.text)?)
    }

    pub fn theme_response(&self, entry: &WorkoutEntry) -> ThemeResponse {
        match self.theme(entry) {
            Ok(theme) => ThemeResponse {
                success: true,
                theme: Some(theme),
                message: None,
                budget_exhausted: false,
            },
            Err(e) => ThemeResponse {
                success: false,
                theme: None,
                message: Some(e.user_message()),
                budget_exhausted: e.is_budget_exhausted(),
            },
        }
    }

    pub fn diagnostics(&self, entries: &[WorkoutEntry]) -> DiagnosticReport {
        let history = self.history(entries);
        let mut report = DiagnosticReport::from_history(&history, self.resolver.version());
        if let Err(e) = self.resolver.table().validate() {
            report.add_warning(e.to_string());
        }
        report
    }
}

fn advisory_notice_for(error: &AdvisoryError) -> String {
    if error.is_budget_exhausted() {
        error.to_string()
    } else {
        "AI insights unavailable, showing computed insights".to_string()
    }
}
