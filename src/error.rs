//! Unified error hierarchy for liftlog
//!
//! Best-effort conditions (skipped lines, unmapped exercises, short history)
//! are reported as data on results. The types here cover the failures that
//! actually stop an operation, plus the advisory collaborator's failures,
//! which callers usually degrade around.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::EntryId;

/// Top-level error type for all liftlog operations
#[derive(Debug, Error)]
pub enum LiftLogError {
    /// Exercise mapping table errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Workout journal errors
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    /// Advisory collaborator errors
    #[error("Advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Exercise mapping table errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// Table file could not be read
    #[error("Cannot read mapping file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// Table JSON is malformed
    #[error("Invalid mapping JSON: {reason}")]
    Parse { reason: String },

    /// Entry fails validation
    #[error("Invalid mapping entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    /// Entry key not present in the table
    #[error("Unknown exercise: {key}")]
    UnknownExercise { key: String },
}

/// Workout journal errors
#[derive(Debug, Error)]
pub enum JournalError {
    /// Journal file not found at specified path
    #[error("Journal not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Date header could not be understood
    #[error("Invalid date on line {line}: {text}")]
    InvalidDate { line: usize, text: String },

    /// No entry with that id
    #[error("Entry not found: {id}")]
    EntryNotFound { id: EntryId },
}

/// Budget window that refused a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Monthly,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetPeriod::Daily => write!(f, "daily"),
            BudgetPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

/// Advisory collaborator errors
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// Collaborator not configured or switched off
    #[error("Advisory service unavailable: {reason}")]
    Unavailable { reason: String },

    /// API key environment variable not set
    #[error("API key not configured (set {var})")]
    MissingApiKey { var: String },

    /// Call exceeded its time bound
    #[error("Advisory request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Network or transport failure
    #[error("Advisory request failed: {reason}")]
    Request { reason: String },

    /// Service answered with an error status
    #[error("Advisory API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response could not be interpreted
    #[error("Advisory response unreadable: {reason}")]
    Parse { reason: String },

    /// Cost control refused the call
    #[error("{period} budget exhausted: spent ${spent:.2} of ${limit:.2}")]
    BudgetExhausted {
        period: BudgetPeriod,
        spent: f64,
        limit: f64,
    },
}

impl AdvisoryError {
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(self, AdvisoryError::BudgetExhausted { .. })
    }
}

/// Result type alias for liftlog operations
pub type Result<T> = std::result::Result<T, LiftLogError>;

impl LiftLogError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LiftLogError::Advisory(AdvisoryError::Timeout { .. })
                | LiftLogError::Advisory(AdvisoryError::Request { .. })
                | LiftLogError::Io(_)
        )
    }

    pub fn is_budget_exhausted(&self) -> bool {
        matches!(self, LiftLogError::Advisory(e) if e.is_budget_exhausted())
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftLogError::Journal(JournalError::EntryNotFound { .. }) => ErrorSeverity::Warning,
            LiftLogError::Advisory(AdvisoryError::BudgetExhausted { .. }) => ErrorSeverity::Info,
            LiftLogError::Advisory(_) => ErrorSeverity::Warning,
            LiftLogError::Validation(_) => ErrorSeverity::Warning,
            LiftLogError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftLogError::Journal(JournalError::FileNotFound { path }) => {
                format!("Could not find workout journal: {}", path.display())
            }
            LiftLogError::Advisory(AdvisoryError::BudgetExhausted { period, .. }) => {
                format!(
                    "The {} AI budget has been used up. Local results are still available.",
                    period
                )
            }
            LiftLogError::Advisory(_) => {
                "The AI assistant is not reachable right now. Try again later.".to_string()
            }
            LiftLogError::Mapping(MappingError::Io { path, .. }) => {
                format!("Could not read exercise mapping file: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
