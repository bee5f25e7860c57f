use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque identity assigned to a workout entry when it is created.
///
/// Date and text are mutable attributes of an entry; two entries logged on the
/// same day with identical text still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged workout: a calendar day plus the freeform note written for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Stable identity, never derived from date or text
    #[serde(default)]
    pub id: EntryId,

    /// Calendar day the workout was logged for
    pub date: NaiveDate,

    /// Raw freeform content, one exercise per line
    pub text: String,

    /// Short label assigned by the advisory collaborator
    #[serde(default)]
    pub theme: Option<String>,

    /// Heavier top set (or more bodyweight reps) than any earlier session
    #[serde(default)]
    pub has_pr: bool,

    /// Same top weight as the previous best, with more reps
    #[serde(default)]
    pub has_strength_increase: bool,
}

impl WorkoutEntry {
    pub fn new(date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            date,
            text: text.into(),
            theme: None,
            has_pr: false,
            has_strength_increase: false,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Case-insensitive substring match against text and theme.
    /// `query_lower` must already be lowercased.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return false;
        }
        self.text.to_lowercase().contains(query_lower)
            || self
                .theme
                .as_ref()
                .is_some_and(|theme| theme.to_lowercase().contains(query_lower))
    }
}

/// A single set. An absent weight is bodyweight work, never a zero load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: Option<Decimal>,
    pub reps: u32,
}

impl WorkoutSet {
    pub fn weighted(weight: Decimal, reps: u32) -> Self {
        Self {
            weight: Some(weight),
            reps,
        }
    }

    pub fn bodyweight(reps: u32) -> Self {
        Self { weight: None, reps }
    }

    pub fn is_bodyweight(&self) -> bool {
        self.weight.is_none()
    }
}

/// Structured performance parsed from one line of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePerformance {
    /// Exercise name as written, before normalization
    pub exercise_name: String,

    /// Sets in the order they were logged
    pub sets: Vec<WorkoutSet>,

    /// 1-based line number within the entry text
    pub line: usize,
}

impl ExercisePerformance {
    pub fn new(exercise_name: impl Into<String>, sets: Vec<WorkoutSet>) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            sets,
            line: 0,
        }
    }

    /// Heaviest stated weight, if any set carried one
    pub fn top_weight(&self) -> Option<Decimal> {
        self.sets.iter().filter_map(|s| s.weight).max()
    }

    /// Reps of the first set performed at the top weight
    pub fn reps_at_top_weight(&self) -> Option<u32> {
        let top = self.top_weight()?;
        self.sets
            .iter()
            .find(|s| s.weight == Some(top))
            .map(|s| s.reps)
    }

    pub fn total_reps(&self) -> u32 {
        self.sets.iter().fold(0u32, |total, s| total.saturating_add(s.reps))
    }

    pub fn is_bodyweight(&self) -> bool {
        self.sets.iter().all(WorkoutSet::is_bodyweight)
    }

    /// Single value summarizing the session for trend and plateau math.
    ///
    /// Weighted work is summarized by its top-set weight. Work with no stated
    /// weight at all is summarized by total reps.
    pub fn representative_load(&self) -> Option<RepresentativeLoad> {
        if self.sets.is_empty() {
            return None;
        }
        match self.top_weight() {
            Some(weight) => Some(RepresentativeLoad::Weight(weight)),
            None => Some(RepresentativeLoad::Reps(self.total_reps())),
        }
    }
}

/// Summary load of a session; weights and rep counts are never compared with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RepresentativeLoad {
    Weight(Decimal),
    Reps(u32),
}

impl RepresentativeLoad {
    pub fn value(&self) -> Decimal {
        match self {
            RepresentativeLoad::Weight(w) => *w,
            RepresentativeLoad::Reps(r) => Decimal::from(*r),
        }
    }

    pub fn same_kind(&self, other: &RepresentativeLoad) -> bool {
        matches!(
            (self, other),
            (RepresentativeLoad::Weight(_), RepresentativeLoad::Weight(_))
                | (RepresentativeLoad::Reps(_), RepresentativeLoad::Reps(_))
        )
    }

    pub fn unit(&self) -> &'static str {
        match self {
            RepresentativeLoad::Weight(_) => "lbs",
            RepresentativeLoad::Reps(_) => "reps",
        }
    }
}

impl fmt::Display for RepresentativeLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentativeLoad::Weight(w) => write!(f, "{} lbs", format_weight(*w)),
            RepresentativeLoad::Reps(r) => write!(f, "{} reps", r),
        }
    }
}

/// Distance or time based line (running, cycling, rowing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardioActivity {
    pub activity: String,
    pub text: String,
    pub line: usize,
}

/// Exercise name resolved against the mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedExercise {
    pub canonical_name: String,
    pub muscle_groups: BTreeSet<String>,
    pub unmatched: bool,
}

impl NormalizedExercise {
    /// Grouping key for per-exercise history
    pub fn key(&self) -> String {
        self.canonical_name.to_lowercase()
    }
}

/// Equipment class, used to pick the standard load increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentClass {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
    Other,
}

impl EquipmentClass {
    /// Infer the class from words in an exercise name
    pub fn infer(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("dumbbell") || name.contains("db ") {
            EquipmentClass::Dumbbell
        } else if name.contains("barbell") || name.contains("smith") || name.contains("deadlift") {
            EquipmentClass::Barbell
        } else if name.contains("cable") || name.contains("pulldown") {
            EquipmentClass::Cable
        } else if name.contains("machine") || name.contains("leg press") {
            EquipmentClass::Machine
        } else if name.contains("pull-up")
            || name.contains("pullup")
            || name.contains("push-up")
            || name.contains("pushup")
            || name.contains("dip")
        {
            EquipmentClass::Bodyweight
        } else {
            EquipmentClass::Other
        }
    }
}

impl fmt::Display for EquipmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentClass::Barbell => write!(f, "barbell"),
            EquipmentClass::Dumbbell => write!(f, "dumbbell"),
            EquipmentClass::Machine => write!(f, "machine"),
            EquipmentClass::Cable => write!(f, "cable"),
            EquipmentClass::Bodyweight => write!(f, "bodyweight"),
            EquipmentClass::Other => write!(f, "other"),
        }
    }
}

/// Render a weight without trailing zeros ("60", "57.5")
pub fn format_weight(weight: Decimal) -> String {
    weight.normalize().to_string()
}
