//! Workout journal
//!
//! The journal is the ordered listing of entries that positions in responses
//! refer to. Two storage formats are understood:
//!
//! * a plain notes file, where a date header line starts a new entry and the
//!   non-blank lines after it are that entry's text
//! * a JSON array of [`WorkoutEntry`] records, which also keeps ids, themes
//!   and record flags
//!
//! Recognized date headers: `11/11/25`, `11/11/2025`, `11/11/25 2:30 PM`,
//! `2024-11-11`, `11-11-25`, and any of those after a weekday name
//! (`Monday 11/11/19`). A bare `Workout` line is a heading, not content.

use chrono::{NaiveDate, NaiveTime};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{JournalError, LiftLogError, Result};
use crate::models::{EntryId, WorkoutEntry};

// year-first last, so `11-11-25` is never read as year 11
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%Y-%m-%d"];

const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "mon", "tue",
    "tues", "wed", "thu", "thur", "thurs", "fri", "sat", "sun",
];

/// Ordered collection of workout entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutLog {
    entries: Vec<WorkoutEntry>,
}

impl WorkoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<WorkoutEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WorkoutEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [WorkoutEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a new entry and return its id
    pub fn add(&mut self, date: NaiveDate, text: impl Into<String>) -> EntryId {
        let entry = WorkoutEntry::new(date, text);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: EntryId) -> Option<&WorkoutEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntryId) -> std::result::Result<&mut WorkoutEntry, JournalError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(JournalError::EntryNotFound { id })
    }

    /// Replace an entry's text. Record flags are cleared until the next re-evaluation.
    pub fn update_text(
        &mut self,
        id: EntryId,
        text: impl Into<String>,
    ) -> std::result::Result<(), JournalError> {
        let entry = self.get_mut(id)?;
        entry.text = text.into();
        entry.has_pr = false;
        entry.has_strength_increase = false;
        Ok(())
    }

    pub fn set_theme(
        &mut self,
        id: EntryId,
        theme: Option<String>,
    ) -> std::result::Result<(), JournalError> {
        self.get_mut(id)?.theme = theme;
        Ok(())
    }

    pub fn delete(&mut self, id: EntryId) -> std::result::Result<WorkoutEntry, JournalError> {
        let position = self
            .position_of(id)
            .ok_or(JournalError::EntryNotFound { id })?;
        Ok(self.entries.remove(position))
    }

    /// Load from disk, picking the format by extension (`.json` or notes)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(JournalError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path)?;
        let log = if is_json(path) {
            let entries: Vec<WorkoutEntry> = serde_json::from_str(&content)
                .map_err(|e| LiftLogError::Validation(format!("invalid journal JSON: {}", e)))?;
            Self::from_entries(entries)
        } else {
            Self::parse_notes(&content)?
        };

        debug!(path = %path.display(), entries = log.len(), "Loaded workout journal");
        Ok(log)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(&self.entries)
                .map_err(|e| LiftLogError::Internal(e.to_string()))?
        } else {
            self.to_notes()
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Only JSON journals keep ids and themes across a save
    pub fn keeps_metadata<P: AsRef<Path>>(path: P) -> bool {
        is_json(path.as_ref())
    }

    /// Split a notes file into entries
    pub fn parse_notes(content: &str) -> std::result::Result<Self, JournalError> {
        let mut entries = Vec::new();
        let mut current: Option<(NaiveDate, Vec<&str>)> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("workout") {
                continue;
            }

            match parse_date_header(line) {
                Some(Ok(date)) => {
                    if let Some((date, lines)) = current.take() {
                        push_entry(&mut entries, date, &lines);
                    }
                    current = Some((date, Vec::new()));
                }
                Some(Err(())) => {
                    return Err(JournalError::InvalidDate {
                        line: index + 1,
                        text: line.to_string(),
                    });
                }
                None => match current.as_mut() {
                    Some((_, lines)) => lines.push(line),
                    None => warn!(line = index + 1, text = line, "Text before first date header"),
                },
            }
        }

        if let Some((date, lines)) = current.take() {
            push_entry(&mut entries, date, &lines);
        }

        Ok(Self { entries })
    }

    /// Render as a notes file that `parse_notes` reads back
    pub fn to_notes(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}\n{}\n", e.date.format("%m/%d/%y"), e.text.trim_end()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn push_entry(entries: &mut Vec<WorkoutEntry>, date: NaiveDate, lines: &[&str]) {
    if lines.is_empty() {
        debug!(%date, "Date header with no workout text");
        return;
    }
    entries.push(WorkoutEntry::new(date, lines.join("\n")));
}

/// `None` when the line is not a header, `Some(Err)` when it is shaped like a
/// date but names no real day.
fn parse_date_header(line: &str) -> Option<std::result::Result<NaiveDate, ()>> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();

    if let Some(first) = tokens.first() {
        let word = first.trim_end_matches(',').to_lowercase();
        if WEEKDAYS.contains(&word.as_str()) {
            tokens.remove(0);
        }
    }

    let (date_token, rest) = tokens.split_first()?;
    if !looks_like_date(date_token) || !is_time_suffix(rest) {
        return None;
    }

    Some(
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_token, fmt).ok())
            .ok_or(()),
    )
}

fn looks_like_date(token: &str) -> bool {
    let parts: Vec<&str> = token.split(['/', '-']).collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 4 && p.chars().all(|c| c.is_ascii_digit()))
}

/// Empty, or a clock time such as `2:30 PM` / `14:05`
fn is_time_suffix(rest: &[&str]) -> bool {
    match rest {
        [] => true,
        [time] => parse_clock(time),
        [time, meridiem] => {
            parse_clock(time)
                && matches!(meridiem.to_ascii_lowercase().as_str(), "am" | "pm" | "a.m." | "p.m.")
        }
        _ => false,
    }
}

fn parse_clock(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    let token = token.trim_end_matches("am").trim_end_matches("pm");
    NaiveTime::parse_from_str(token, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const NOTES: &str = "Workout\n\n11/11/25\nbench press - 185 * 5\npull-up 10, 8\n\nMonday 11/17/25 2:30 PM\nsquat - 225 * 5\n\n2025-11-20\nrun 3 mi\n11-22-25\n\n11/23/25\ncurl - 30 * 12\n";

    #[test]
    fn test_parse_notes_headers() {
        let log = WorkoutLog::parse_notes(NOTES).unwrap();
        let dates: Vec<_> = log.entries().iter().map(|e| e.date).collect();
        // 11-22-25 has no text and is dropped
        assert_eq!(
            dates,
            vec![date(2025, 11, 11), date(2025, 11, 17), date(2025, 11, 20), date(2025, 11, 23)]
        );
        assert_eq!(log.entries()[0].text, "bench press - 185 * 5\npull-up 10, 8");
    }

    #[test]
    fn test_header_detection() {
        assert_eq!(parse_date_header("11/11/19"), Some(Ok(date(2019, 11, 11))));
        assert_eq!(parse_date_header("Friday, 11/15/2019"), Some(Ok(date(2019, 11, 15))));
        assert_eq!(parse_date_header("11/11/25 14:05"), Some(Ok(date(2025, 11, 11))));
        assert_eq!(parse_date_header("11/11/25 2:30pm"), Some(Ok(date(2025, 11, 11))));
        assert_eq!(parse_date_header("squat - 225 * 5"), None);
        assert_eq!(parse_date_header("11/11/25 squat 10"), None);
        assert_eq!(parse_date_header("02/30/24"), Some(Err(())));
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let err = WorkoutLog::parse_notes("13/45/24\nsquat 10").unwrap_err();
        assert!(matches!(err, JournalError::InvalidDate { line: 1, .. }));
    }

    #[test]
    fn test_crud_by_id() {
        let mut log = WorkoutLog::new();
        let a = log.add(date(2025, 1, 1), "squat - 225 * 5");
        let b = log.add(date(2025, 1, 1), "squat - 225 * 5");
        assert_ne!(a, b);

        log.update_text(b, "squat - 230 * 5").unwrap();
        assert_eq!(log.get(a).unwrap().text, "squat - 225 * 5");
        assert_eq!(log.get(b).unwrap().text, "squat - 230 * 5");

        log.set_theme(a, Some("Leg Day".to_string())).unwrap();
        let removed = log.delete(a).unwrap();
        assert_eq!(removed.theme.as_deref(), Some("Leg Day"));
        assert_eq!(log.position_of(b), Some(0));
        assert!(matches!(log.delete(a), Err(JournalError::EntryNotFound { .. })));
    }

    #[test]
    fn test_notes_round_trip() {
        let log = WorkoutLog::parse_notes(NOTES).unwrap();
        let reparsed = WorkoutLog::parse_notes(&log.to_notes()).unwrap();
        let texts = |l: &WorkoutLog| {
            l.entries()
                .iter()
                .map(|e| (e.date, e.text.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(&log), texts(&reparsed));
    }

    #[test]
    fn test_load_and_save_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = WorkoutLog::load(dir.path().join("missing.txt"));
        assert!(matches!(
            missing,
            Err(LiftLogError::Journal(JournalError::FileNotFound { .. }))
        ));

        let mut log = WorkoutLog::parse_notes(NOTES).unwrap();
        let id = log.entries()[0].id;
        log.set_theme(id, Some("Push".to_string())).unwrap();

        let json_path = dir.path().join("journal.json");
        log.save(&json_path).unwrap();
        let loaded = WorkoutLog::load(&json_path).unwrap();
        assert_eq!(loaded, log);

        let notes_path = dir.path().join("journal.txt");
        log.save(&notes_path).unwrap();
        assert_eq!(WorkoutLog::load(&notes_path).unwrap().len(), log.len());
    }
}
