//! Application configuration loading and validation.
//!
//! Configuration lives in a TOML file; every section has working defaults
//! so a missing file or empty table still yields a runnable setup. A bad
//! scoring table is rejected up front rather than surfacing as nonsense
//! scores later.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{BreakpointTable, MatchOptions, SalarySacrificeAdjustments, Scorer, ScoringThresholds};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub matching: MatchOptions,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        self.scoring
            .breakpoints
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "scoring.breakpoints",
                reason,
            })?;
        for band in &self.scoring.thresholds.bands {
            if band.min > 100 {
                return Err(ConfigError::InvalidValue {
                    field: "scoring.thresholds",
                    reason: format!("band '{}' minimum {} exceeds 100", band.band, band.min),
                }
                .into());
            }
        }
        if self.snapshots.fetch_budget_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "snapshots.fetch_budget_ms",
                reason: "time budget must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// Logs go to stderr so machine-readable results on stdout stay clean.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Scoring-engine configuration: one breakpoint table, band thresholds and
/// the salary-sacrifice adjustment knobs.
#[derive(Debug, Default, Deserialize)]
pub struct ScoringSection {
    #[serde(default)]
    pub breakpoints: BreakpointTable,
    #[serde(default)]
    pub thresholds: ScoringThresholds,
    #[serde(default)]
    pub salary_sacrifice: SalarySacrificeAdjustments,
}

impl ScoringSection {
    /// Assemble the configured scoring engine.
    pub fn scorer(&self) -> Scorer {
        Scorer {
            breakpoints: self.breakpoints.clone(),
            thresholds: self.thresholds.clone(),
            adjustments: self.salary_sacrifice,
        }
    }
}

/// Where snapshot files live and how long gathering may take.
#[derive(Debug, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_fetch_budget_ms")]
    pub fetch_budget_ms: u64,
}

impl SnapshotConfig {
    pub fn fetch_budget(&self) -> Duration {
        Duration::from_millis(self.fetch_budget_ms)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_fetch_budget_ms() -> u64 {
    5_000
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            fetch_budget_ms: default_fetch_budget_ms(),
        }
    }
}
