//! Exercise mapping table
//!
//! Reference data mapping raw exercise-name variants to a canonical name and
//! the muscle groups it trains. The table is versioned and passed explicitly
//! to whatever needs it, so callers (and tests) decide which table is in play.
//!
//! Muscle groups may be written as nested paths (`arms.biceps`), and bare
//! sub-groups listed under `categories` pick up their parent group; either
//! way the resolved set holds both labels.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::MappingError;
use crate::models::EquipmentClass;

/// One canonical exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Canonical display name
    pub normalized: String,

    /// Trained groups; `parent.child` paths are flattened on resolution
    pub muscle_groups: Vec<String>,

    /// Alternate spellings and sub-variants
    #[serde(default)]
    pub variations: Vec<String>,

    #[serde(default)]
    pub equipment: Option<EquipmentClass>,
}

/// Extra group implied by words in an exercise name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRule {
    pub keywords: Vec<String>,
    pub group: String,
}

impl InferenceRule {
    pub fn matches(&self, normalized_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| normalized_name.contains(&k.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMappingTable {
    /// Bumped on every change so cached results can be tied to a table revision
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub mappings: BTreeMap<String, MappingEntry>,

    /// Parent group to its sub-groups, e.g. `arms -> [biceps, triceps]`
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub inference_rules: Vec<InferenceRule>,
}

fn default_version() -> u32 {
    1
}

/// Lowercase and collapse internal whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl ExerciseMappingTable {
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            mappings: BTreeMap::new(),
            categories: BTreeMap::new(),
            inference_rules: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let table: ExerciseMappingTable =
            serde_json::from_str(json).map_err(|e| MappingError::Parse {
                reason: e.to_string(),
            })?;
        table.validate()?;
        Ok(table)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MappingError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, MappingError> {
        serde_json::to_string_pretty(self).map_err(|e| MappingError::Parse {
            reason: e.to_string(),
        })
    }

    /// Every entry needs a name and at least one group
    pub fn validate(&self) -> Result<(), MappingError> {
        for (key, entry) in &self.mappings {
            if entry.normalized.trim().is_empty() {
                return Err(MappingError::InvalidEntry {
                    key: key.clone(),
                    reason: "empty canonical name".to_string(),
                });
            }
            if entry.muscle_groups.is_empty() {
                return Err(MappingError::InvalidEntry {
                    key: key.clone(),
                    reason: "no muscle groups".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Add or replace an entry, producing a new table revision
    pub fn insert(&mut self, key: impl Into<String>, entry: MappingEntry) {
        self.mappings.insert(normalize_name(&key.into()), entry);
        self.version += 1;
    }

    /// Record an extra variation for an existing canonical entry
    pub fn add_variation(&mut self, key: &str, variation: &str) -> Result<(), MappingError> {
        let entry = self
            .mappings
            .get_mut(&normalize_name(key))
            .ok_or_else(|| MappingError::UnknownExercise {
                key: key.to_string(),
            })?;
        entry.variations.push(normalize_name(variation));
        self.version += 1;
        Ok(())
    }

    pub fn parent_of(&self, group: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, children)| children.iter().any(|c| c == group))
            .map(|(parent, _)| parent.as_str())
    }

    pub fn sub_groups(&self, parent: &str) -> &[String] {
        self.categories
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Flatten group labels: `arms.biceps` yields both `arms` and `biceps`, and a
    /// bare sub-group also yields its parent.
    pub fn flatten_groups<S: AsRef<str>>(&self, labels: &[S]) -> BTreeSet<String> {
        let mut groups = BTreeSet::new();
        for label in labels {
            for part in label.as_ref().split('.') {
                let part = part.trim().to_lowercase();
                if part.is_empty() {
                    continue;
                }
                if let Some(parent) = self.parent_of(&part) {
                    groups.insert(parent.to_string());
                }
                groups.insert(part);
            }
        }
        groups
    }

    /// Reference table shipped with the crate
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        for (key, normalized, groups, variations, equipment) in BUILTIN_EXERCISES {
            table.mappings.insert(
                key.to_string(),
                MappingEntry {
                    normalized: normalized.to_string(),
                    muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
                    variations: variations.iter().map(|v| v.to_string()).collect(),
                    equipment: Some(*equipment),
                },
            );
        }

        table.categories.insert(
            "arms".to_string(),
            vec!["biceps".to_string(), "triceps".to_string()],
        );
        table.categories.insert(
            "legs".to_string(),
            vec!["quads".to_string(), "hamstrings".to_string()],
        );
        table
            .categories
            .insert("core".to_string(), vec!["abs".to_string()]);

        table.inference_rules = vec![
            InferenceRule {
                keywords: ["squat", "lunge", "split", "hip", "glute"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                group: "glutes".to_string(),
            },
            InferenceRule {
                keywords: vec!["calf".to_string()],
                group: "calves".to_string(),
            },
            InferenceRule {
                keywords: ["crunch", "sit-up", "plank", "core"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                group: "abs".to_string(),
            },
        ];

        table
    }
}

impl Default for ExerciseMappingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

type BuiltinExercise = (
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    EquipmentClass,
);

const BUILTIN_EXERCISES: &[BuiltinExercise] = &[
    ("bench press", "Bench Press", &["chest", "triceps", "shoulders"],
        &["bench", "barbell bench press", "smith bench press", "flat bench", "dumbbell bench press"],
        EquipmentClass::Barbell),
    ("incline bench press", "Incline Bench Press", &["chest", "shoulders"],
        &["incline bench", "incline press", "incline dumbbell press"],
        EquipmentClass::Barbell),
    ("push-up", "Push-Up", &["chest", "triceps"],
        &["pushup", "pushups", "push up", "push-ups"],
        EquipmentClass::Bodyweight),
    ("chest fly", "Chest Fly", &["chest"],
        &["fly", "flye", "pec deck", "cable fly"],
        EquipmentClass::Cable),
    ("dip", "Dip", &["chest", "arms.triceps"],
        &["dips", "tricep dip"],
        EquipmentClass::Bodyweight),
    ("shoulder press", "Shoulder Press", &["shoulders", "triceps"],
        &["overhead press", "ohp", "military press", "dumbbell shoulder press"],
        EquipmentClass::Dumbbell),
    ("lateral raise", "Lateral Raise", &["shoulders"],
        &["side raise", "lat raise", "lateral raises"],
        EquipmentClass::Dumbbell),
    ("rear delt fly", "Rear Delt Fly", &["shoulders", "back"],
        &["rear delt", "reverse fly"],
        EquipmentClass::Dumbbell),
    ("pull-up", "Pull-Up", &["back", "biceps"],
        &["pullup", "pullups", "pull up", "chin-up", "chinup", "chin up"],
        EquipmentClass::Bodyweight),
    ("lat pulldown", "Lat Pulldown", &["back", "biceps"],
        &["pulldown", "lat pull down"],
        EquipmentClass::Cable),
    ("row", "Row", &["back"],
        &["barbell row", "bent over row", "dumbbell row", "cable row", "seated row", "t-bar row"],
        EquipmentClass::Barbell),
    ("deadlift", "Deadlift", &["back", "legs", "glutes"],
        &["rdl", "romanian deadlift", "trap bar deadlift"],
        EquipmentClass::Barbell),
    ("bicep curl", "Bicep Curl", &["arms.biceps"],
        &["curl", "biceps curl", "hammer curl", "preacher curl", "dumbbell curl"],
        EquipmentClass::Dumbbell),
    ("tricep extension", "Tricep Extension", &["arms.triceps"],
        &["triceps extension", "skull crusher", "tricep pushdown", "pushdown", "overhead extension"],
        EquipmentClass::Cable),
    ("squat", "Squat", &["legs", "glutes"],
        &["back squat", "front squat", "goblet squat", "smith squat"],
        EquipmentClass::Barbell),
    ("leg press", "Leg Press", &["legs"],
        &["sled press"],
        EquipmentClass::Machine),
    ("lunge", "Lunge", &["legs", "glutes"],
        &["lunges", "split squat", "bulgarian split squat", "walking lunge"],
        EquipmentClass::Dumbbell),
    ("leg curl", "Leg Curl", &["legs.hamstrings"],
        &["hamstring curl", "lying leg curl", "seated leg curl"],
        EquipmentClass::Machine),
    ("leg extension", "Leg Extension", &["legs.quads"],
        &["leg extensions", "quad extension"],
        EquipmentClass::Machine),
    ("calf raise", "Calf Raise", &["calves"],
        &["calf raises", "one leg calf raises", "standing calf raise", "seated calf raise"],
        EquipmentClass::Other),
    ("hip thrust", "Hip Thrust", &["glutes"],
        &["glute bridge", "barbell hip thrust"],
        EquipmentClass::Barbell),
    ("crunch", "Crunch", &["core.abs"],
        &["crunches", "sit-up", "situp", "sit up", "cable crunch"],
        EquipmentClass::Bodyweight),
    ("plank", "Plank", &["core.abs"],
        &["side plank"],
        EquipmentClass::Bodyweight),
    ("hanging leg raise", "Hanging Leg Raise", &["core.abs"],
        &["leg raise", "leg raises", "knee raise"],
        EquipmentClass::Bodyweight),
];
