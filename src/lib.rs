//! liftlog turns a plain-text workout journal into training history and
//! answers questions about it, such as what to lift next or where progress
//! has stalled. The CLI in `main.rs` is a thin shell over [`Engine`].

pub mod advisory;
pub mod analytics;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod journal;
pub mod logging;
pub mod mapping;
pub mod models;
pub mod overload;
pub mod parser;
pub mod recovery;
pub mod resolver;
pub mod search;

// Re-export commonly used types for convenience
pub use models::*;
pub use advisory::{AdvisoryConfig, AdvisoryMode, AdvisoryProvider, LiveAdvisor, OfflineAdvisor};
pub use analytics::{AnalyticsConfig, AnalyticsEngine, AnalyticsReport};
pub use config::AppConfig;
pub use engine::Engine;
pub use error::{AdvisoryError, LiftLogError, Result};
pub use history::TrainingHistory;
pub use journal::WorkoutLog;
pub use logging::{DiagnosticReport, LogConfig, LogLevel};
pub use mapping::ExerciseMappingTable;
pub use overload::{OverloadConfig, OverloadDecision, OverloadSuggester, OverloadSuggestion};
pub use parser::{parse_workout_text, ParsedWorkout};
pub use recovery::{RecoveryConfig, RecoveryReport, RecoveryTracker};
pub use resolver::MuscleGroupResolver;
pub use search::{SearchConfig, SearchIndex, WorkoutSearch};
