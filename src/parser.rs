//! Freeform workout text parser
//!
//! An entry is written one exercise per line. Two strength notations are
//! understood:
//!
//! - Weighted: `bicep curl - 55 * 7, 60 * 4, 2; 55 * 1`. A weight stated with
//!   `*` applies to every following bare rep count until another weight is
//!   stated, either inside the comma list or at the start of a `;` segment.
//! - Bodyweight: `pull-up 10, 8, 9, 7`. No weight is stated, so every set has
//!   an absent weight. `0 * 15` is accepted as bodyweight notation too.
//!
//! Lines carrying distance or time units (`run 2.5 mi`) are kept as cardio.
//! Anything else is skipped and reported; a bad line never rejects the entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::models::{format_weight, CardioActivity, ExercisePerformance, WorkoutSet};

const DISTANCE_TIME_UNITS: &[&str] = &[
    "mi", "mile", "miles", "km", "k", "m", "meter", "meters", "metres", "yd", "yds", "yards",
    "min", "mins", "minute", "minutes", "hr", "hrs", "hour", "hours", "sec", "secs", "seconds",
];

const WEIGHT_UNITS: &[&str] = &["lbs", "lb", "kgs", "kg"];

/// Largest rep count accepted for one set
pub const MAX_REPS: u32 = 1000;

/// Why a line produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Matches neither the weighted, bodyweight nor cardio notation
    Unrecognized,
    /// A `*` was present but the text before it is not a number
    InvalidWeight,
    /// Notation recognized but no rep counts could be read
    NoSets,
    /// A rep count above `MAX_REPS`
    TooManyReps,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unrecognized => write!(f, "unrecognized line"),
            SkipReason::InvalidWeight => write!(f, "invalid weight"),
            SkipReason::NoSets => write!(f, "no sets found"),
            SkipReason::TooManyReps => write!(f, "rep count above {}", MAX_REPS),
        }
    }
}

/// Diagnostic for a line the parser could not use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// A successfully understood line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Strength(ExercisePerformance),
    Cardio(CardioActivity),
}

/// Everything recovered from one entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedWorkout {
    pub exercises: Vec<ExercisePerformance>,
    pub cardio: Vec<CardioActivity>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedWorkout {
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty() && self.cardio.is_empty()
    }
}

/// Parse a whole entry. Blank lines are ignored; unusable lines are collected in `skipped`.
pub fn parse_workout_text(text: &str) -> ParsedWorkout {
    let mut parsed = ParsedWorkout::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        match parse_exercise_line(line) {
            Ok(ParsedLine::Strength(mut performance)) => {
                performance.line = line_no;
                parsed.exercises.push(performance);
            }
            Ok(ParsedLine::Cardio(mut cardio)) => {
                cardio.line = line_no;
                parsed.cardio.push(cardio);
            }
            Err(reason) => {
                debug!(line = line_no, %reason, text = line, "Skipping workout line");
                parsed.skipped.push(SkippedLine {
                    line: line_no,
                    text: line.to_string(),
                    reason,
                });
            }
        }
    }

    parsed
}

/// Parse a single non-blank line
pub fn parse_exercise_line(line: &str) -> Result<ParsedLine, SkipReason> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SkipReason::Unrecognized);
    }

    if line.contains('*') {
        let (name, spec) = line.split_once(" - ").ok_or(SkipReason::Unrecognized)?;
        let name = name.trim();
        if !has_letter(name) {
            return Err(SkipReason::Unrecognized);
        }
        let sets = parse_set_list(spec)?;
        return Ok(ParsedLine::Strength(ExercisePerformance::new(name, sets)));
    }

    if let Some((name, sets)) = split_bodyweight_line(line) {
        check_reps(&sets)?;
        return Ok(ParsedLine::Strength(ExercisePerformance::new(name, sets)));
    }

    if let Some(cardio) = parse_cardio_line(line) {
        return Ok(ParsedLine::Cardio(cardio));
    }

    Err(SkipReason::Unrecognized)
}

/// Parse the set notation that follows an exercise name.
///
/// Bare rep counts before any stated weight are bodyweight sets, which makes
/// a plain `10, 8, 9` list valid input as well.
pub fn parse_set_list(spec: &str) -> Result<Vec<WorkoutSet>, SkipReason> {
    let mut sets = Vec::new();
    let mut current_weight: Option<Decimal> = None;

    for segment in spec.split(';') {
        for item in segment.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }

            match item.split_once('*') {
                Some((weight_text, reps_text)) => {
                    current_weight = parse_weight(weight_text)?;
                    if let Some(reps) = leading_int(reps_text) {
                        sets.push(WorkoutSet {
                            weight: current_weight,
                            reps,
                        });
                    }
                }
                None => {
                    if let Some(reps) = leading_int(item) {
                        sets.push(WorkoutSet {
                            weight: current_weight,
                            reps,
                        });
                    }
                }
            }
        }
    }

    if sets.is_empty() {
        return Err(SkipReason::NoSets);
    }
    check_reps(&sets)?;
    Ok(sets)
}

fn check_reps(sets: &[WorkoutSet]) -> Result<(), SkipReason> {
    if sets.iter().any(|s| s.reps > MAX_REPS) {
        return Err(SkipReason::TooManyReps);
    }
    Ok(())
}

/// Render sets in the notation `parse_set_list` reads back.
pub fn render_sets(sets: &[WorkoutSet]) -> String {
    if sets.iter().all(WorkoutSet::is_bodyweight) {
        return sets
            .iter()
            .map(|s| s.reps.to_string())
            .collect::<Vec<_>>()
            .join(", ");
    }

    let mut items = Vec::with_capacity(sets.len());
    let mut stated: Option<Option<Decimal>> = None;
    for set in sets {
        if stated != Some(set.weight) {
            let weight = set.weight.map(format_weight).unwrap_or_else(|| "0".to_string());
            items.push(format!("{} * {}", weight, set.reps));
            stated = Some(set.weight);
        } else {
            items.push(set.reps.to_string());
        }
    }
    items.join(", ")
}

/// Render a full exercise line in the notation `parse_exercise_line` reads back
pub fn render_line(name: &str, sets: &[WorkoutSet]) -> String {
    if sets.iter().all(WorkoutSet::is_bodyweight) {
        format!("{} {}", name, render_sets(sets))
    } else {
        format!("{} - {}", name, render_sets(sets))
    }
}

/// Weight text before a `*`. Parenthetical notes and unit suffixes are ignored,
/// and an explicit zero is bodyweight notation.
fn parse_weight(text: &str) -> Result<Option<Decimal>, SkipReason> {
    let text = text.split('(').next().unwrap_or_default().trim().to_lowercase();
    let mut number = text.as_str();
    for unit in WEIGHT_UNITS {
        if let Some(stripped) = number.strip_suffix(unit) {
            number = stripped.trim_end();
            break;
        }
    }

    let weight = Decimal::from_str(number).map_err(|_| SkipReason::InvalidWeight)?;
    if weight.is_sign_negative() {
        return Err(SkipReason::InvalidWeight);
    }
    if weight.is_zero() {
        Ok(None)
    } else {
        Ok(Some(weight))
    }
}

fn leading_int(text: &str) -> Option<u32> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn has_letter(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// `<name> <reps>[, <reps>]*`, also tolerating a dangling ` -` after the name
fn split_bodyweight_line(line: &str) -> Option<(String, Vec<WorkoutSet>)> {
    let boundaries = line.char_indices().filter(|&(i, c)| {
        i > 0 && c.is_ascii_digit() && line[..i].ends_with(char::is_whitespace)
    });

    for (i, _) in boundaries {
        let name = line[..i].trim().trim_end_matches('-').trim();
        if !has_letter(name) {
            continue;
        }

        let reps: Option<Vec<u32>> = line[i..]
            .split(',')
            .map(|part| {
                let part = part.trim();
                if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
                    part.parse().ok()
                } else {
                    None
                }
            })
            .collect();

        if let Some(reps) = reps {
            let sets = reps.into_iter().map(WorkoutSet::bodyweight).collect();
            return Some((name.to_string(), sets));
        }
    }

    None
}

fn parse_cardio_line(line: &str) -> Option<CardioActivity> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == ',' || c == ';').to_lowercase())
        .collect();

    let mut found_unit = false;
    for (i, token) in tokens.iter().enumerate() {
        let digits_end = token
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ':'))
            .map(|(idx, _)| idx)
            .unwrap_or(token.len());
        if digits_end == 0 {
            continue;
        }

        let suffix = &token[digits_end..];
        let next_is_unit = suffix.is_empty()
            && tokens
                .get(i + 1)
                .is_some_and(|next| DISTANCE_TIME_UNITS.contains(&next.as_str()));
        if DISTANCE_TIME_UNITS.contains(&suffix) || next_is_unit {
            found_unit = true;
            break;
        }
    }

    if !found_unit {
        return None;
    }

    let activity: Vec<&str> = line
        .split_whitespace()
        .take_while(|word| !word.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    let activity = if activity.is_empty() {
        "cardio".to_string()
    } else {
        activity.join(" ")
    };

    Some(CardioActivity {
        activity,
        text: line.to_string(),
        line: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn strength(line: &str) -> ExercisePerformance {
        match parse_exercise_line(line) {
            Ok(ParsedLine::Strength(perf)) => perf,
            other => panic!("expected strength line for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_weight_persists_within_segment() {
        let perf = strength("bicep curl - 55 * 7, 60 * 4, 2; 55 * 1");
        assert_eq!(perf.exercise_name, "bicep curl");
        assert_eq!(
            perf.sets,
            vec![
                WorkoutSet::weighted(dec!(55), 7),
                WorkoutSet::weighted(dec!(60), 4),
                WorkoutSet::weighted(dec!(60), 2),
                WorkoutSet::weighted(dec!(55), 1),
            ]
        );
    }

    #[test]
    fn test_simple_weighted_line() {
        let perf = strength("dumbbell shoulder press - 75 * 6, 5, 4");
        assert_eq!(perf.sets.len(), 3);
        assert!(perf.sets.iter().all(|s| s.weight == Some(dec!(75))));
        assert_eq!(perf.sets.iter().map(|s| s.reps).collect::<Vec<_>>(), vec![6, 5, 4]);
    }

    #[test]
    fn test_weight_changes_inside_comma_list() {
        let perf = strength("smith bench press - 225 * 5, 5, 4, 195 * 4, 105 * 10");
        let weights: Vec<_> = perf.sets.iter().map(|s| s.weight.unwrap()).collect();
        assert_eq!(weights, vec![dec!(225), dec!(225), dec!(225), dec!(195), dec!(105)]);
    }

    #[test]
    fn test_bare_reps_carry_weight_into_next_segment() {
        let perf = strength("row - 100 * 8; 8, 6");
        assert!(perf.sets.iter().all(|s| s.weight == Some(dec!(100))));
        assert_eq!(perf.sets.len(), 3);
    }

    #[test]
    fn test_parenthetical_note_and_units_ignored() {
        let perf = strength("one leg calf raises - 75 (1 dumbbell) * 10, 10, 10");
        assert_eq!(perf.sets, vec![WorkoutSet::weighted(dec!(75), 10); 3]);

        let perf = strength("squat - 102.5kg * 5");
        assert_eq!(perf.sets, vec![WorkoutSet::weighted(dec!(102.5), 5)]);
    }

    #[test]
    fn test_bodyweight_line_has_absent_weight() {
        let perf = strength("pull-up 10, 8, 9, 7");
        assert_eq!(perf.exercise_name, "pull-up");
        assert_eq!(perf.sets.len(), 4);
        assert!(perf.sets.iter().all(|s| s.weight.is_none()));
        assert_eq!(perf.total_reps(), 34);
    }

    #[test]
    fn test_zero_weight_notation_is_bodyweight() {
        let perf = strength("pull-up - 0 * 15, 8, 8");
        assert!(perf.is_bodyweight());
        assert_eq!(perf.total_reps(), 31);
    }

    #[test]
    fn test_bodyweight_with_dangling_dash() {
        let perf = strength("pushup - 30, 25");
        assert_eq!(perf.exercise_name, "pushup");
        assert_eq!(perf.sets, vec![WorkoutSet::bodyweight(30), WorkoutSet::bodyweight(25)]);
    }

    #[test]
    fn test_bodyweight_name_with_digit() {
        let perf = strength("cable 3 way raise 12, 10");
        assert_eq!(perf.exercise_name, "cable 3 way raise");
        assert_eq!(perf.sets.len(), 2);
    }

    #[test]
    fn test_cardio_lines() {
        for line in ["run 2.5 mi", "bike 30 min", "row 2000m", "easy jog 5k"] {
            match parse_exercise_line(line) {
                Ok(ParsedLine::Cardio(cardio)) => assert_eq!(cardio.text, line),
                other => panic!("expected cardio for {:?}, got {:?}", line, other),
            }
        }
        match parse_exercise_line("run 2.5 mi") {
            Ok(ParsedLine::Cardio(cardio)) => assert_eq!(cardio.activity, "run"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_malformed_lines_are_skipped_not_fatal() {
        let text = "squat - 225 * 5, 5\nfelt great today\ncurl - heavy * 8\n\npull-up 10, 8\nrun 3 mi";
        let parsed = parse_workout_text(text);

        assert_eq!(parsed.exercises.len(), 2);
        assert_eq!(parsed.cardio.len(), 1);
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line, 2);
        assert_eq!(parsed.skipped[0].reason, SkipReason::Unrecognized);
        assert_eq!(parsed.skipped[1].reason, SkipReason::InvalidWeight);
        assert_eq!(parsed.exercises[1].line, 5);
        assert_eq!(parsed.total_sets(), 4);
    }

    #[test]
    fn test_huge_rep_counts_are_skipped() {
        let parsed = parse_workout_text("pull-up 4294967295, 1\nsquat - 225 * 5000\ndips 1000, 12");
        assert_eq!(parsed.exercises.len(), 1);
        assert_eq!(parsed.exercises[0].total_reps(), 1012);
        let reasons: Vec<_> = parsed.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::TooManyReps, SkipReason::TooManyReps]);
        assert_eq!(parsed.skipped[0].line, 1);
    }

    #[test]
    fn test_star_without_reps_is_no_sets() {
        assert_eq!(parse_set_list("60 *"), Err(SkipReason::NoSets));
        assert_eq!(parse_set_list(""), Err(SkipReason::NoSets));
    }

    #[test]
    fn test_render_groups_weights() {
        let sets = vec![
            WorkoutSet::weighted(dec!(55), 7),
            WorkoutSet::weighted(dec!(60), 4),
            WorkoutSet::weighted(dec!(60), 2),
            WorkoutSet::weighted(dec!(55), 1),
        ];
        assert_eq!(render_sets(&sets), "55 * 7, 60 * 4, 2, 55 * 1");
        assert_eq!(render_line("bicep curl", &sets), "bicep curl - 55 * 7, 60 * 4, 2, 55 * 1");

        let bodyweight = vec![WorkoutSet::bodyweight(10), WorkoutSet::bodyweight(8)];
        assert_eq!(render_line("pull-up", &bodyweight), "pull-up 10, 8");
    }

    use proptest::prelude::*;

    fn arb_set() -> impl Strategy<Value = WorkoutSet> {
        (prop::option::weighted(0.8, 1u32..200), 0u32..30).prop_map(|(weight, reps)| WorkoutSet {
            weight: weight.map(|w| Decimal::from(w) * dec!(2.5)),
            reps,
        })
    }

    proptest! {
        #[test]
        fn test_render_then_parse_reproduces_sets(sets in prop::collection::vec(arb_set(), 1..8)) {
            let rendered = render_sets(&sets);
            let reparsed = parse_set_list(&rendered).unwrap();
            prop_assert_eq!(reparsed, sets.clone());

            let line = render_line("test exercise", &sets);
            match parse_exercise_line(&line) {
                Ok(ParsedLine::Strength(perf)) => prop_assert_eq!(perf.sets, sets),
                other => prop_assert!(false, "line {:?} parsed as {:?}", line, other),
            }
        }

        #[test]
        fn test_segment_weight_applies_to_each_rep_count(
            weight in 1u32..500,
            reps in prop::collection::vec(0u32..50, 1..6),
        ) {
            let spec = format!(
                "{} * {}",
                weight,
                reps.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
            );
            let sets = parse_set_list(&spec).unwrap();
            prop_assert_eq!(sets.len(), reps.len());
            for (set, r) in sets.iter().zip(reps.iter()) {
                prop_assert_eq!(set.weight, Some(Decimal::from(weight)));
                prop_assert_eq!(set.reps, *r);
            }
        }
    }
}
