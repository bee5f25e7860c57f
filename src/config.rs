use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::advisory::AdvisoryConfig;
use crate::analytics::AnalyticsConfig;
use crate::logging::LogConfig;
use crate::overload::OverloadConfig;
use crate::recovery::RecoveryConfig;
use crate::search::SearchConfig;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Workout notes file (notes format, or JSON when it ends in `.json`)
    pub journal: PathBuf,

    /// Exercise mapping JSON; the built-in table is used when unset
    pub mapping: Option<PathBuf>,

    /// Configuration metadata
    pub metadata: ConfigMetadata,

    pub recovery: RecoveryConfig,
    pub analytics: AnalyticsConfig,
    pub overload: OverloadConfig,
    pub advisory: AdvisoryConfig,
    pub search: SearchConfig,
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            journal: Self::config_dir().join("workouts.txt"),
            mapping: None,
            metadata: ConfigMetadata::default(),
            recovery: RecoveryConfig::default(),
            analytics: AnalyticsConfig::default(),
            overload: OverloadConfig::default(),
            advisory: AdvisoryConfig::default(),
            search: SearchConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// `~/.liftlog`
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftlog")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration with fallback to defaults. A missing file is not
    /// an error; an unreadable one is reported and ignored.
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring config {}: {:#}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Reject thresholds the reports cannot work with
    pub fn validate(&self) -> Result<()> {
        let analytics = &self.analytics;
        if analytics.strength.window_weeks <= 0 {
            bail!("analytics.strength.window_weeks must be positive");
        }
        if analytics.consistency.window_days <= 0 || analytics.balance.window_days <= 0 {
            bail!("analytics window days must be positive");
        }
        if analytics.plateau.session_threshold < 2 {
            bail!("analytics.plateau.session_threshold must be at least 2");
        }
        if !(0.0..=100.0).contains(&analytics.balance.imbalance_percent) {
            bail!("analytics.balance.imbalance_percent must be between 0 and 100");
        }
        if self.recovery.neglect_days <= 0 || self.recovery.default_recovery_days < 0 {
            bail!("recovery day thresholds must not be negative");
        }
        if self.overload.target_reps_weighted == 0 || self.overload.target_reps_bodyweight == 0 {
            bail!("overload target reps must be positive");
        }
        if self.overload.deload_percent <= rust_decimal::Decimal::ZERO
            || self.overload.deload_percent >= rust_decimal::Decimal::ONE_HUNDRED
        {
            bail!("overload.deload_percent must be between 0 and 100");
        }
        if !(1..=60).contains(&self.advisory.timeout_secs) {
            bail!("advisory.timeout_secs must be between 1 and 60");
        }
        if self.advisory.daily_budget < 0.0 || self.advisory.monthly_budget < 0.0 {
            bail!("advisory budgets must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::AdvisoryMode;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            journal = "/tmp/lifts.txt"

            [recovery]
            neglect_days = 10

            [analytics.plateau]
            session_threshold = 4

            [advisory]
            mode = "live"
            "#,
        )
        .unwrap();

        assert_eq!(config.journal, PathBuf::from("/tmp/lifts.txt"));
        assert_eq!(config.recovery.neglect_days, 10);
        assert_eq!(config.recovery.threshold_for("chest"), 3);
        assert_eq!(config.analytics.plateau.session_threshold, 4);
        assert_eq!(config.analytics.balance.imbalance_percent, 50.0);
        assert_eq!(config.advisory.mode, AdvisoryMode::Live);
        assert_eq!(config.search.max_results, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.overload.target_reps_weighted = 8;
        original_config.mapping = Some(temp_dir.path().join("mapping.json"));

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.overload.target_reps_weighted, 8);
        assert_eq!(loaded_config.mapping, original_config.mapping);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[advisory]\ntimeout_secs = 600\n").unwrap();

        let err = AppConfig::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
