//! Advisory collaborator
//!
//! Free-text search ranking, narrative insights and workout themes come from
//! an external language-model service. The engine only sees the
//! [`AdvisoryProvider`] capability and picks one of two implementations by
//! configuration: [`OfflineAdvisor`] is deterministic and never touches the
//! network, [`LiveAdvisor`] calls the messages API under a spending budget.
//! Every failure is an [`AdvisoryError`] so callers can degrade locally.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AdvisoryError, BudgetPeriod};
use crate::mapping::ExerciseMappingTable;
use crate::parser::parse_workout_text;
use crate::resolver::MuscleGroupResolver;

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryMode {
    Offline,
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub mode: AdvisoryMode,
    pub endpoint: String,
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Upper bound on one call, clamped to 1..=60
    pub timeout_secs: u64,
    pub max_tokens: u32,

    /// Dollars
    pub daily_budget: f64,
    pub monthly_budget: f64,
    pub input_cost_per_million: f64,
    pub output_cost_per_million: f64,

    /// Where token usage is persisted between runs
    pub usage_file: Option<PathBuf>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            mode: AdvisoryMode::Offline,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: 15,
            max_tokens: 300,
            daily_budget: 1.00,
            monthly_budget: 20.00,
            input_cost_per_million: 3.00,
            output_cost_per_million: 15.00,
            usage_file: None,
        }
    }
}

/// One entry as the collaborator sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    /// Position in the caller's listing; rankings refer to this
    pub position: usize,
    pub date: NaiveDate,
    pub theme: Option<String>,
    pub text: String,
    pub muscle_groups: Vec<String>,
    pub has_pr: bool,
}

impl EntrySummary {
    fn context_line(&self) -> String {
        let flags = if self.has_pr { " [PR]" } else { "" };
        format!(
            "[{}] {} | {}{} | {}",
            self.position,
            self.date,
            self.theme.as_deref().unwrap_or(""),
            flags,
            self.text.replace('\n', "; ")
        )
    }
}

/// Narrative request for one analytics report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRequest {
    pub report: String,
    /// Rule-based sentence computed locally
    pub rule_insight: String,
    pub findings: serde_json::Value,
}

/// Capability interface of the advisory collaborator
pub trait AdvisoryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Positions of matching entries, most relevant first
    fn rank_entries(&self, query: &str, entries: &[EntrySummary]) -> Result<Vec<usize>, AdvisoryError>;

    fn insight(&self, request: &InsightRequest) -> Result<String, AdvisoryError>;

    /// Short label for one workout
    fn theme(&self, text: &str) -> Result<String, AdvisoryError>;
}

/// Deterministic advisor built from local data only
pub struct OfflineAdvisor {
    resolver: MuscleGroupResolver,
}

impl OfflineAdvisor {
    pub fn new(table: Arc<ExerciseMappingTable>) -> Self {
        Self {
            resolver: MuscleGroupResolver::new(table),
        }
    }
}

impl AdvisoryProvider for OfflineAdvisor {
    fn name(&self) -> &'static str {
        "offline"
    }

    /// Scores entries by how many query words appear in text, theme or
    /// trained groups. Short queries such as "PR", and queries no word of
    /// which scores, match the whole query against text and theme instead.
    fn rank_entries(&self, query: &str, entries: &[EntrySummary]) -> Result<Vec<usize>, AdvisoryError> {
        let words: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 3)
            .map(str::to_lowercase)
            .collect();

        let mut scored: Vec<(usize, usize)> = entries
            .iter()
            .filter_map(|entry| {
                let haystack = format!(
                    "{} {} {}",
                    entry.text,
                    entry.theme.as_deref().unwrap_or(""),
                    entry.muscle_groups.join(" ")
                )
                .to_lowercase();
                let score = words.iter().filter(|w| haystack.contains(w.as_str())).count();
                (score > 0).then_some((entry.position, score))
            })
            .collect();

        if scored.is_empty() {
            let needle = query.trim().to_lowercase();
            return Ok(entries
                .iter()
                .filter(|entry| {
                    !needle.is_empty()
                        && (entry.text.to_lowercase().contains(&needle)
                            || entry
                                .theme
                                .as_deref()
                                .is_some_and(|theme| theme.to_lowercase().contains(&needle)))
                })
                .map(|entry| entry.position)
                .collect());
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(scored.into_iter().map(|(position, _)| position).collect())
    }

    fn insight(&self, request: &InsightRequest) -> Result<String, AdvisoryError> {
        Ok(request.rule_insight.clone())
    }

    /// The two muscle groups hit by the most exercises, e.g. "Chest & Triceps"
    fn theme(&self, text: &str) -> Result<String, AdvisoryError> {
        let parsed = parse_workout_text(text);
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for performance in &parsed.exercises {
            for group in self.resolver.resolve(&performance.exercise_name).muscle_groups {
                *counts.entry(group).or_default() += 1;
            }
        }

        let table = self.resolver.table();
        let present: BTreeSet<&str> = counts.keys().map(String::as_str).collect();
        let mut ranked: Vec<(&String, &usize)> = counts
            .iter()
            .filter(|(group, _)| {
                !table
                    .sub_groups(group)
                    .iter()
                    .any(|sub| present.contains(sub.as_str()))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let theme = match ranked.as_slice() {
            [] if !parsed.cardio.is_empty() => "Cardio".to_string(),
            [] => "General Training".to_string(),
            groups => groups
                .iter()
                .take(2)
                .map(|(group, _)| title_case(group))
                .collect::<Vec<_>>()
                .join(" & "),
        };
        Ok(theme)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
    pub requests: u32,
}

/// Token spend per day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageLedger {
    pub daily: BTreeMap<NaiveDate, DailyUsage>,
}

impl UsageLedger {
    pub fn spent_on(&self, day: NaiveDate) -> f64 {
        self.daily.get(&day).map(|u| u.cost).unwrap_or(0.0)
    }

    pub fn spent_in_month(&self, day: NaiveDate) -> f64 {
        self.daily
            .iter()
            .filter(|(d, _)| d.year() == day.year() && d.month() == day.month())
            .map(|(_, u)| u.cost)
            .sum()
    }
}

/// Prices calls and refuses them once a budget is spent
#[derive(Debug, Clone)]
pub struct CostControl {
    ledger: UsageLedger,
    daily_budget: f64,
    monthly_budget: f64,
    input_cost_per_million: f64,
    output_cost_per_million: f64,
    path: Option<PathBuf>,
}

impl CostControl {
    pub fn new(config: &AdvisoryConfig) -> Self {
        Self {
            ledger: UsageLedger::default(),
            daily_budget: config.daily_budget,
            monthly_budget: config.monthly_budget,
            input_cost_per_million: config.input_cost_per_million,
            output_cost_per_million: config.output_cost_per_million,
            path: None,
        }
    }

    /// Ledger persisted at `path`. A missing or unreadable file starts empty.
    pub fn with_ledger_file(config: &AdvisoryConfig, path: &Path) -> Self {
        let ledger = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(ledger) => Some(ledger),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable usage ledger");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            ledger,
            path: Some(path.to_path_buf()),
            ..Self::new(config)
        }
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn price(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 / 1_000_000.0 * self.input_cost_per_million
            + output_tokens as f64 / 1_000_000.0 * self.output_cost_per_million
    }

    /// Refuses when either budget is already spent
    pub fn check(&self, today: NaiveDate) -> Result<(), AdvisoryError> {
        let spent = self.ledger.spent_on(today);
        if spent >= self.daily_budget {
            return Err(AdvisoryError::BudgetExhausted {
                period: BudgetPeriod::Daily,
                spent,
                limit: self.daily_budget,
            });
        }
        let spent = self.ledger.spent_in_month(today);
        if spent >= self.monthly_budget {
            return Err(AdvisoryError::BudgetExhausted {
                period: BudgetPeriod::Monthly,
                spent,
                limit: self.monthly_budget,
            });
        }
        Ok(())
    }

    pub fn record(&mut self, today: NaiveDate, input_tokens: u64, output_tokens: u64) {
        let cost = self.price(input_tokens, output_tokens);
        let usage = self.ledger.daily.entry(today).or_default();
        usage.input_tokens += input_tokens;
        usage.output_tokens += output_tokens;
        usage.cost += cost;
        usage.requests += 1;
        debug!(input_tokens, output_tokens, cost, "Recorded advisory usage");

        if let Some(path) = &self.path {
            let written = serde_json::to_string_pretty(&self.ledger)
                .map_err(|e| e.to_string())
                .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
            if let Err(e) = written {
                warn!(path = %path.display(), error = %e, "Failed to save usage ledger");
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Network-backed advisor. Owns a small runtime so synchronous callers can
/// use it; it must not be called from inside another tokio runtime.
pub struct LiveAdvisor {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    timeout_secs: u64,
    costs: Mutex<CostControl>,
}

impl LiveAdvisor {
    /// Reads the API key from the configured environment variable
    pub fn new(config: &AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| AdvisoryError::MissingApiKey {
            var: config.api_key_env.clone(),
        })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &AdvisoryConfig, api_key: impl Into<String>) -> Result<Self, AdvisoryError> {
        let timeout_secs = config.timeout_secs.clamp(1, 60);
        let client = reqwest::Client::builder()
            .user_agent(format!("liftlog/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .build()
            .map_err(|e| AdvisoryError::Unavailable {
                reason: format!("cannot build HTTP client: {}", e),
            })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AdvisoryError::Unavailable {
                reason: format!("cannot start runtime: {}", e),
            })?;
        let costs = match &config.usage_file {
            Some(path) => CostControl::with_ledger_file(config, path),
            None => CostControl::new(config),
        };

        Ok(Self {
            client,
            runtime,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
            max_tokens: config.max_tokens,
            timeout_secs,
            costs: Mutex::new(costs),
        })
    }

    pub fn usage(&self) -> UsageLedger {
        self.costs
            .lock()
            .map(|costs| costs.ledger().clone())
            .unwrap_or_default()
    }

    async fn complete_async(&self, system: &str, user: &str) -> Result<(String, Usage), AdvisoryError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AdvisoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                AdvisoryError::Parse {
                    reason: e.to_string(),
                }
            }
        })?;

        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .find_map(|block| block.text)
            .ok_or_else(|| AdvisoryError::Parse {
                reason: "no text content in response".to_string(),
            })?;
        Ok((text, parsed.usage))
    }

    fn transport_error(&self, e: reqwest::Error) -> AdvisoryError {
        if e.is_timeout() {
            AdvisoryError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            AdvisoryError::Request {
                reason: e.to_string(),
            }
        }
    }

    /// One budgeted call
    fn complete(&self, system: &str, user: &str) -> Result<String, AdvisoryError> {
        let today = Local::now().date_naive();
        self.lock_costs()?.check(today).inspect_err(|e| {
            warn!(error = %e, "Advisory call refused");
        })?;

        let (text, usage) = self.runtime.block_on(self.complete_async(system, user))?;
        self.lock_costs()?
            .record(today, usage.input_tokens, usage.output_tokens);
        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Advisory call completed"
        );
        Ok(text)
    }

    fn lock_costs(&self) -> Result<std::sync::MutexGuard<'_, CostControl>, AdvisoryError> {
        self.costs.lock().map_err(|_| AdvisoryError::Unavailable {
            reason: "usage ledger poisoned".to_string(),
        })
    }
}

impl AdvisoryProvider for LiveAdvisor {
    fn name(&self) -> &'static str {
        "live"
    }

    fn rank_entries(&self, query: &str, entries: &[EntrySummary]) -> Result<Vec<usize>, AdvisoryError> {
        let context: Vec<String> = entries.iter().map(EntrySummary::context_line).collect();
        let prompt = format!(
            "Workout history (format: [index] date | theme | workout text):\n{}\n\n\
             Query: {}\n\n\
             Return ONLY the indices (numbers in brackets) of workouts that match the query, \
             most relevant first, as a comma-separated list. Return an empty line if none match.",
            context.join("\n"),
            query
        );
        let text = self.complete(
            "You match workout log entries to search queries.",
            &prompt,
        )?;

        let known: HashSet<usize> = entries.iter().map(|e| e.position).collect();
        Ok(parse_indices(&text, &known))
    }

    fn insight(&self, request: &InsightRequest) -> Result<String, AdvisoryError> {
        let prompt = format!(
            "Report: {}\nComputed summary: {}\nFindings: {}\n\n\
             Write one or two encouraging, specific sentences for the lifter.",
            request.report, request.rule_insight, request.findings
        );
        let text = self.complete("You are a concise strength coach.", &prompt)?;
        Ok(text.trim().to_string())
    }

    fn theme(&self, text: &str) -> Result<String, AdvisoryError> {
        let prompt = format!(
            "Workout:\n{}\n\nGive this workout a theme of at most five words. Reply with the theme only.",
            text
        );
        let theme = self.complete("You label workouts.", &prompt)?;
        Ok(clamp_words(theme.trim().trim_matches('"'), 5))
    }
}

/// Integers in `text` that name known positions, first mention wins
fn parse_indices(text: &str, known: &HashSet<usize>) -> Vec<usize> {
    let mut seen = HashSet::new();
    text.split(|c: char| !c.is_ascii_digit())
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|position| known.contains(position) && seen.insert(*position))
        .collect()
}

fn clamp_words(text: &str, max: usize) -> String {
    text.split_whitespace().take(max).collect::<Vec<_>>().join(" ")
}

/// Advisor selected by `config.mode`. A live advisor that cannot start falls
/// back to the offline one.
pub fn advisor_from_config(
    config: &AdvisoryConfig,
    table: Arc<ExerciseMappingTable>,
) -> Box<dyn AdvisoryProvider> {
    match config.mode {
        AdvisoryMode::Offline => Box::new(OfflineAdvisor::new(table)),
        AdvisoryMode::Live => match LiveAdvisor::new(config) {
            Ok(advisor) => Box::new(advisor),
            Err(e) => {
                warn!(error = %e, "Live advisor unavailable, using offline advisor");
                Box::new(OfflineAdvisor::new(table))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    fn summary(position: usize, text: &str, groups: &[&str]) -> EntrySummary {
        EntrySummary {
            position,
            date: date(1),
            theme: None,
            text: text.to_string(),
            muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
            has_pr: false,
        }
    }

    fn offline() -> OfflineAdvisor {
        OfflineAdvisor::new(Arc::new(ExerciseMappingTable::builtin()))
    }

    #[test]
    fn test_offline_rank_scores_words() {
        let entries = vec![
            summary(0, "squat - 225 * 5", &["legs", "glutes"]),
            summary(1, "bench press - 185 * 5", &["chest"]),
            summary(2, "front squat - 135 * 5\nleg press - 300 * 10", &["legs"]),
        ];
        let ranked = offline().rank_entries("squat legs", &entries).unwrap();
        assert_eq!(ranked, vec![0, 2]);
        assert!(offline().rank_entries("yoga", &entries).unwrap().is_empty());
    }

    #[test]
    fn test_offline_rank_short_query_matches_text() {
        let entries = vec![
            summary(0, "deadlift - 405 * 1 new PR", &["back"]),
            summary(1, "squat - 225 * 5", &["legs"]),
        ];
        assert_eq!(offline().rank_entries("PR", &entries).unwrap(), vec![0]);
        assert_eq!(offline().rank_entries("ab", &entries).unwrap(), Vec::<usize>::new());
        assert!(offline().rank_entries("  ", &entries).unwrap().is_empty());
    }

    #[test]
    fn test_offline_theme_from_groups() {
        let advisor = offline();
        assert_eq!(
            advisor.theme("bench press - 185 * 5\ndips 10, 10").unwrap(),
            "Chest & Triceps"
        );
        assert_eq!(advisor.theme("run 3 mi").unwrap(), "Cardio");
        assert_eq!(advisor.theme("stretching").unwrap(), "General Training");
    }

    #[test]
    fn test_offline_insight_passes_rule_text_through() {
        let request = InsightRequest {
            report: "consistency".to_string(),
            rule_insight: "You're averaging 3.0 workouts/week".to_string(),
            findings: serde_json::json!({}),
        };
        assert_eq!(offline().insight(&request).unwrap(), request.rule_insight);
    }

    #[test]
    fn test_cost_control_refuses_past_daily_budget() {
        let config = AdvisoryConfig {
            daily_budget: 0.01,
            ..AdvisoryConfig::default()
        };
        let mut costs = CostControl::new(&config);
        assert!(costs.check(date(5)).is_ok());

        costs.record(date(5), 1_000, 1_000);
        let err = costs.check(date(5)).unwrap_err();
        assert!(err.is_budget_exhausted());
        assert!(matches!(err, AdvisoryError::BudgetExhausted { period: BudgetPeriod::Daily, .. }));
        assert!(costs.check(date(6)).is_ok());
    }

    #[test]
    fn test_cost_control_monthly_budget() {
        let config = AdvisoryConfig {
            monthly_budget: 0.03,
            ..AdvisoryConfig::default()
        };
        let mut costs = CostControl::new(&config);
        costs.record(date(1), 1_000, 1_000);
        costs.record(date(2), 1_000, 1_000);
        let err = costs.check(date(3)).unwrap_err();
        assert!(matches!(err, AdvisoryError::BudgetExhausted { period: BudgetPeriod::Monthly, .. }));
        assert!(costs.check(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()).is_ok());
    }

    #[test]
    fn test_pricing() {
        let costs = CostControl::new(&AdvisoryConfig::default());
        assert!((costs.price(1_000_000, 0) - 3.0).abs() < 1e-9);
        assert!((costs.price(0, 1_000_000) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_ledger_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usage.json");
        let config = AdvisoryConfig::default();

        let mut costs = CostControl::with_ledger_file(&config, &path);
        costs.record(date(5), 2_000, 500);

        let reloaded = CostControl::with_ledger_file(&config, &path);
        assert_eq!(reloaded.ledger().daily[&date(5)].requests, 1);
        assert_eq!(reloaded.ledger().daily[&date(5)].input_tokens, 2_000);
    }

    #[test]
    fn test_parse_indices_keeps_known_positions_in_order() {
        let known: HashSet<usize> = [0, 2, 5].into_iter().collect();
        assert_eq!(parse_indices("5, 2, 9, 2, 0", &known), vec![5, 2, 0]);
        assert!(parse_indices("none", &known).is_empty());
    }

    #[test]
    fn test_missing_api_key() {
        let config = AdvisoryConfig {
            api_key_env: "LIFTLOG_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..AdvisoryConfig::default()
        };
        assert!(matches!(
            LiveAdvisor::new(&config),
            Err(AdvisoryError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_clamp_words() {
        assert_eq!(clamp_words("Heavy Push Day With Extra Volume Work", 5), "Heavy Push Day With Extra");
    }
}
