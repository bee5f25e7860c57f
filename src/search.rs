//! Workout search
//!
//! Preset queries are answered from a precomputed index built by rules over
//! resolved muscle groups and record flags. Anything else goes to the
//! advisory collaborator, and when that fails, to a case-insensitive
//! substring match over entry text and theme. Search never errors.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::advisory::{AdvisoryProvider, EntrySummary};
use crate::error::{LiftLogError, Result};
use crate::history::{TrainingHistory, TrainingSession};
use crate::models::WorkoutEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub presets: Vec<String>,

    /// Cap on results stored per preset
    pub max_results: usize,

    /// Where the preset index is cached between runs
    pub index_file: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            presets: ["chest workout", "leg day", "upper body", "PR personal record", "full body"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_results: 20,
            index_file: None,
        }
    }
}

const LOWER_BODY: &[&str] = &["legs", "quads", "hamstrings", "glutes", "calves"];
const UPPER_BODY: &[&str] = &["chest", "back", "shoulders", "arms", "biceps", "triceps"];

/// Rule answering one preset query
#[derive(Debug, Clone, PartialEq)]
enum PresetRule {
    Group(String),
    LowerBody,
    UpperBody,
    Records,
    FullBody,
    Text(String),
}

impl PresetRule {
    fn for_query(query: &str) -> Self {
        let lower = query.to_lowercase();
        if lower.contains("full body") {
            PresetRule::FullBody
        } else if lower.contains("upper body") {
            PresetRule::UpperBody
        } else if lower.contains("leg") || lower.contains("lower body") {
            PresetRule::LowerBody
        } else if lower.split_whitespace().any(|w| w == "pr") || lower.contains("record") {
            PresetRule::Records
        } else if let Some(group) = UPPER_BODY.iter().find(|g| lower.contains(*g)) {
            PresetRule::Group(group.to_string())
        } else {
            PresetRule::Text(lower)
        }
    }

    fn matches(&self, entry: &WorkoutEntry, session: &TrainingSession) -> bool {
        match self {
            PresetRule::Group(group) => session.trains_group(group),
            PresetRule::LowerBody => LOWER_BODY.iter().any(|g| session.trains_group(g)),
            PresetRule::UpperBody => {
                UPPER_BODY.iter().any(|g| session.trains_group(g))
                    && !LOWER_BODY.iter().any(|g| session.trains_group(g))
            }
            PresetRule::Records => entry.has_pr,
            PresetRule::FullBody => session.muscle_groups().len() >= 3,
            PresetRule::Text(query) => entry.matches_query(query),
        }
    }
}

/// Precomputed answers to preset queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Digest of the mapping version and every entry's date and text at build time
    pub fingerprint: String,
    /// Keyed by the lowercased preset query
    pub presets: BTreeMap<String, Vec<usize>>,
}

impl SearchIndex {
    /// `history` must be built from `entries`
    pub fn build(entries: &[WorkoutEntry], history: &TrainingHistory, config: &SearchConfig) -> Self {
        let mut by_position: Vec<&TrainingSession> = history.sessions().iter().collect();
        by_position.sort_by_key(|s| s.position);

        let presets = config
            .presets
            .iter()
            .map(|query| {
                let rule = PresetRule::for_query(query);
                let positions: Vec<usize> = by_position
                    .iter()
                    .filter(|s| entries.get(s.position).is_some_and(|e| rule.matches(e, s)))
                    .map(|s| s.position)
                    .take(config.max_results)
                    .collect();
                (preset_key(query), positions)
            })
            .collect();

        let index = Self {
            fingerprint: fingerprint(entries, history.mapping_version()),
            presets,
        };
        info!(presets = index.presets.len(), entries = entries.len(), "Built search index");
        index
    }

    /// False once any entry changed or the mapping table was replaced
    pub fn is_fresh(&self, entries: &[WorkoutEntry], mapping_version: u32) -> bool {
        self.fingerprint == fingerprint(entries, mapping_version)
    }

    /// Case-insensitive
    pub fn lookup(&self, query: &str) -> Option<&[usize]> {
        self.presets.get(&preset_key(query)).map(Vec::as_slice)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| {
            LiftLogError::Internal(format!(
                "invalid search index {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LiftLogError::Internal(format!("cannot serialize search index: {}", e)))?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}

fn preset_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// SHA-256 over the mapping version, then every entry's date and text in
/// listing order
pub fn fingerprint(entries: &[WorkoutEntry], mapping_version: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(mapping_version.to_be_bytes());
    hasher.update(b"\x1d");
    for entry in entries {
        hasher.update(entry.date.to_string().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(entry.text.as_bytes());
        hasher.update(b"\x1e");
    }
    format!("{:x}", hasher.finalize())
}

/// Where a result set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Preset,
    Advisory,
    Fallback,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub indices: Vec<usize>,
    pub source: SearchSource,
    /// Set when the advisory collaborator failed and the fallback answered
    pub notice: Option<String>,
}

/// Case-insensitive substring match over text and theme
pub fn substring_search(entries: &[WorkoutEntry], query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.matches_query(&query))
        .map(|(position, _)| position)
        .collect()
}

pub struct WorkoutSearch<'a> {
    advisor: &'a dyn AdvisoryProvider,
}

impl<'a> WorkoutSearch<'a> {
    pub fn new(advisor: &'a dyn AdvisoryProvider) -> Self {
        Self { advisor }
    }

    /// `history` must be built from `entries`. A stale `index` is ignored.
    pub fn search(
        &self,
        query: &str,
        entries: &[WorkoutEntry],
        history: &TrainingHistory,
        index: Option<&SearchIndex>,
    ) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome {
                indices: Vec::new(),
                source: SearchSource::Empty,
                notice: None,
            };
        }

        if let Some(hit) = index
            .filter(|index| index.is_fresh(entries, history.mapping_version()))
            .and_then(|index| index.lookup(query))
        {
            debug!(query, results = hit.len(), "Preset search hit");
            return SearchOutcome {
                indices: hit.to_vec(),
                source: SearchSource::Preset,
                notice: None,
            };
        }

        let summaries = summarize(entries, history);
        match self.advisor.rank_entries(query, &summaries) {
            Ok(ranked) => {
                let mut seen = HashSet::new();
                let indices: Vec<usize> = ranked
                    .into_iter()
                    .filter(|p| *p < entries.len() && seen.insert(*p))
                    .collect();
                debug!(query, advisor = self.advisor.name(), results = indices.len(), "Advisory search");
                SearchOutcome {
                    indices,
                    source: SearchSource::Advisory,
                    notice: None,
                }
            }
            Err(e) => {
                warn!(query, error = %e, "Advisory search failed, using substring match");
                SearchOutcome {
                    indices: substring_search(entries, query),
                    source: SearchSource::Fallback,
                    notice: Some(if e.is_budget_exhausted() {
                        e.to_string()
                    } else {
                        "Smart search unavailable, showing text matches".to_string()
                    }),
                }
            }
        }
    }
}

/// Entry view handed to the advisory collaborator
pub fn summarize(entries: &[WorkoutEntry], history: &TrainingHistory) -> Vec<EntrySummary> {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for session in history.sessions() {
        groups.insert(
            session.position,
            session.muscle_groups().into_iter().map(str::to_string).collect(),
        );
    }

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| EntrySummary {
            position,
            date: entry.date,
            theme: entry.theme.clone(),
            text: entry.text.clone(),
            muscle_groups: groups.remove(&position).unwrap_or_default(),
            has_pr: entry.has_pr,
        })
        .collect()
}
