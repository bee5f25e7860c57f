//! Structured logging and diagnostics for liftlog
//!
//! Log output goes to stderr so JSON responses on stdout stay machine
//! readable. Optional JSON log files rotate daily.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::history::TrainingHistory;
use crate::parser::SkipReason;

/// `[logging]` section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Starting level, raised by each `-v`
    pub level: LogLevel,

    /// Emit stderr events as JSON lines instead of compact text
    pub json: bool,

    /// JSON event log, rolled over daily next to this path
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            json: false,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Level after `verbosity` steps of `-v`
    pub fn raised_by(self, verbosity: u8) -> Self {
        let start = self as usize;
        Self::ALL[(start + verbosity as usize).min(Self::ALL.len() - 1)]
    }
}

/// `RUST_LOG` wins over the configured level
fn filter_for(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("liftlog={}", config.level.as_str())))
}

/// Install the global subscriber. Events go to stderr so `--json` output on
/// stdout stays parseable.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let stderr_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().compact().with_writer(std::io::stderr).boxed()
    };

    let file_layer = match &config.file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            fs::create_dir_all(dir)?;
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("liftlog.log");
            let appender = tracing_appender::rolling::daily(dir, name);
            Some(fmt::layer().json().with_writer(appender).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_for(config))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(level = config.level.as_str(), file = ?config.file, "Logging initialized");
    Ok(())
}

/// A line the parser skipped, located in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLineDetail {
    pub date: NaiveDate,
    /// Entry position in the journal listing
    pub position: usize,
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// What the parser and resolver could not understand, for growing the
/// mapping table and fixing notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// When the report was generated
    pub timestamp: DateTime<Utc>,

    pub entries: usize,
    pub mapping_version: u32,
    pub skipped_lines: Vec<SkippedLineDetail>,
    pub unmatched_exercises: Vec<String>,
    pub warnings: Vec<String>,
    pub liftlog_version: String,
}

impl DiagnosticReport {
    pub fn from_history(history: &TrainingHistory, mapping_version: u32) -> Self {
        let skipped_lines = history
            .skipped_lines()
            .map(|(session, skipped)| SkippedLineDetail {
                date: session.date,
                position: session.position,
                line: skipped.line,
                text: skipped.text.clone(),
                reason: skipped.reason,
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            entries: history.len(),
            mapping_version,
            skipped_lines,
            unmatched_exercises: history.unmatched_exercises().iter().cloned().collect(),
            warnings: Vec::new(),
            liftlog_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_lines.is_empty() && self.unmatched_exercises.is_empty() && self.warnings.is_empty()
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Save report to file
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        tracing::info!("Diagnostic report saved to {}", path.display());
        Ok(())
    }
}
