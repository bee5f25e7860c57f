//! Muscle group resolution
//!
//! Resolution order for a raw exercise name:
//! 1. exact match on a table key, canonical name or listed variation
//! 2. whole-word match against the same names inside a longer name, longest
//!    match wins. A plural `s`/`es` after the name still counts.
//! 3. nested groups flattened through the table's categories
//! 4. keyword inference rules add implied groups
//!
//! A name nothing applies to comes back `unmatched` with no groups. It still
//! counts for per-exercise reports but not for per-group ones.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::mapping::{normalize_name, ExerciseMappingTable, MappingEntry};
use crate::models::{EquipmentClass, NormalizedExercise};

#[derive(Debug, Clone)]
pub struct MuscleGroupResolver {
    table: Arc<ExerciseMappingTable>,
    exact: HashMap<String, String>,
    /// (candidate, entry key), longest candidate first
    fuzzy: Vec<(String, String)>,
}

impl MuscleGroupResolver {
    pub fn new(table: Arc<ExerciseMappingTable>) -> Self {
        let mut exact = HashMap::new();
        let mut fuzzy = Vec::new();

        for key in table.mappings.keys() {
            let key_norm = normalize_name(key);
            exact.insert(key_norm.clone(), key.clone());
            fuzzy.push((key_norm, key.clone()));
        }
        for (key, entry) in &table.mappings {
            for candidate in std::iter::once(&entry.normalized).chain(entry.variations.iter()) {
                let candidate = normalize_name(candidate);
                if candidate.is_empty() {
                    continue;
                }
                exact.entry(candidate.clone()).or_insert_with(|| key.clone());
                fuzzy.push((candidate, key.clone()));
            }
        }

        fuzzy.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.cmp(b)));
        fuzzy.dedup_by(|a, b| a.0 == b.0);

        Self {
            table,
            exact,
            fuzzy,
        }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(ExerciseMappingTable::builtin()))
    }

    pub fn table(&self) -> &ExerciseMappingTable {
        &self.table
    }

    pub fn version(&self) -> u32 {
        self.table.version
    }

    fn lookup(&self, name: &str) -> Option<(&String, &MappingEntry)> {
        let key = self.exact.get(name).or_else(|| {
            self.fuzzy
                .iter()
                .find(|(candidate, _)| contains_term(name, candidate))
                .map(|(_, key)| key)
        })?;
        self.table.mappings.get_key_value(key)
    }

    pub fn resolve(&self, raw_name: &str) -> NormalizedExercise {
        let name = normalize_name(raw_name);
        let entry = self.lookup(&name);

        let (canonical_name, mut muscle_groups) = match entry {
            Some((_, entry)) => (
                entry.normalized.clone(),
                self.table.flatten_groups(&entry.muscle_groups),
            ),
            None => (name.clone(), BTreeSet::new()),
        };

        for rule in &self.table.inference_rules {
            if rule.matches(&name) {
                muscle_groups.extend(self.table.flatten_groups(&[rule.group.as_str()]));
            }
        }

        let unmatched = entry.is_none() && muscle_groups.is_empty();
        if unmatched {
            debug!(exercise = %name, "No muscle group mapping");
        }

        NormalizedExercise {
            canonical_name,
            muscle_groups,
            unmatched,
        }
    }

    /// Equipment class from the table entry, else inferred from the name
    pub fn equipment_for(&self, canonical_name: &str) -> EquipmentClass {
        self.lookup(&normalize_name(canonical_name))
            .and_then(|(_, entry)| entry.equipment)
            .unwrap_or_else(|| EquipmentClass::infer(canonical_name))
    }

    /// Entries whose groups include `group`, in table order
    pub fn exercises_for_group(&self, group: &str) -> Vec<&MappingEntry> {
        self.table
            .mappings
            .values()
            .filter(|entry| self.table.flatten_groups(&entry.muscle_groups).contains(group))
            .collect()
    }
}

/// `term` appears in `name` starting and ending on word boundaries
fn contains_term(name: &str, term: &str) -> bool {
    name.match_indices(term).any(|(i, _)| {
        let starts_word = name[..i].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
        let rest = &name[i + term.len()..];
        starts_word
            && (ends_word(rest)
                || ["es", "s"]
                    .iter()
                    .any(|plural| rest.strip_prefix(*plural).is_some_and(ends_word)))
    })
}

fn ends_word(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingEntry;

    fn groups(exercise: &NormalizedExercise) -> Vec<&str> {
        exercise.muscle_groups.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_exact_match_on_variation() {
        let resolver = MuscleGroupResolver::builtin();
        let ex = resolver.resolve("  Smith   Bench Press ");
        assert_eq!(ex.canonical_name, "Bench Press");
        assert!(!ex.unmatched);
        assert!(ex.muscle_groups.contains("chest"));
    }

    #[test]
    fn test_fuzzy_match_prefers_longest_variation() {
        let resolver = MuscleGroupResolver::builtin();
        // contains both "curl" and "leg curl"
        let ex = resolver.resolve("seated machine leg curl");
        assert_eq!(ex.canonical_name, "Leg Curl");
        assert_eq!(groups(&ex), vec!["hamstrings", "legs"]);

        let ex = resolver.resolve("incline hammer curl");
        assert_eq!(ex.canonical_name, "Bicep Curl");
    }

    #[test]
    fn test_fuzzy_match_respects_word_boundaries() {
        let resolver = MuscleGroupResolver::builtin();
        assert!(resolver.resolve("hip compressor").muscle_groups.iter().all(|g| g != "chest"));
        assert!(resolver.resolve("narrow stance walk").unmatched);

        let ex = resolver.resolve("cable bicep curls");
        assert_eq!(ex.canonical_name, "Bicep Curl");
        assert!(contains_term("wide grip pull-ups", "pull-up"));
        assert!(!contains_term("compress", "press"));
        assert!(!contains_term("pressure", "press"));
    }

    #[test]
    fn test_nested_groups_are_flattened() {
        let resolver = MuscleGroupResolver::builtin();
        let ex = resolver.resolve("bicep curl");
        assert_eq!(groups(&ex), vec!["arms", "biceps"]);
    }

    #[test]
    fn test_inference_rules_add_groups() {
        let resolver = MuscleGroupResolver::builtin();
        let ex = resolver.resolve("one leg calf raises");
        assert!(ex.muscle_groups.contains("calves"));

        // no table entry, but the keyword implies a group
        let ex = resolver.resolve("cossack squat shuffle");
        assert_eq!(ex.canonical_name, "Squat");

        let ex = resolver.resolve("glute kickback");
        assert!(!ex.unmatched);
        assert_eq!(ex.canonical_name, "glute kickback");
        assert_eq!(groups(&ex), vec!["glutes"]);
    }

    #[test]
    fn test_unmatched_has_no_groups() {
        let resolver = MuscleGroupResolver::builtin();
        let ex = resolver.resolve("Turkish Get Up");
        assert!(ex.unmatched);
        assert!(ex.muscle_groups.is_empty());
        assert_eq!(ex.canonical_name, "turkish get up");
    }

    #[test]
    fn test_injected_table_is_used() {
        let mut table = ExerciseMappingTable::empty();
        table.insert(
            "sled push",
            MappingEntry {
                normalized: "Sled Push".to_string(),
                muscle_groups: vec!["legs".to_string()],
                variations: vec!["prowler".to_string()],
                equipment: Some(EquipmentClass::Other),
            },
        );
        let resolver = MuscleGroupResolver::new(Arc::new(table));

        assert_eq!(resolver.resolve("heavy prowler").canonical_name, "Sled Push");
        assert!(resolver.resolve("bench press").unmatched);
        assert_eq!(resolver.version(), 2);
    }

    #[test]
    fn test_equipment_lookup() {
        let resolver = MuscleGroupResolver::builtin();
        let squat = resolver.resolve("back squat");
        assert_eq!(resolver.equipment_for(&squat.canonical_name), EquipmentClass::Barbell);
        let unknown = resolver.resolve("dumbbell windmill");
        assert_eq!(resolver.equipment_for(&unknown.canonical_name), EquipmentClass::Dumbbell);
    }

    #[test]
    fn test_exercises_for_group() {
        let resolver = MuscleGroupResolver::builtin();
        let names: Vec<_> = resolver
            .exercises_for_group("calves")
            .iter()
            .map(|e| e.normalized.as_str())
            .collect();
        assert_eq!(names, vec!["Calf Raise"]);
    }
}
