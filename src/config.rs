//! File-based configuration.
//!
//! Every section is optional and falls back to its defaults, so an
//! empty file is a valid configuration.

use crate::roll::{ConfidenceLevel, DieSpec, SpecError};
use crate::stats::{FairnessThresholds, ThresholdError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Arity or confidence level out of range.
    #[error("invalid session settings: {0}")]
    InvalidSession(#[from] SpecError),
    /// Significance level or minimum expected frequency out of range.
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(#[from] ThresholdError),
    /// Simulation or output settings inconsistent with the die.
    #[error("invalid simulation settings: {0}")]
    InvalidSimulation(String),
    /// Output format other than `table` or `json`.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Die and confidence level for the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of faces on the die.
    pub arity: u32,
    /// Two-sided confidence level for per-side intervals.
    pub confidence_level: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arity: 6,
            confidence_level: 0.95,
        }
    }
}

impl SessionConfig {
    /// Returns the validated die specification.
    pub fn die(&self) -> Result<DieSpec, SpecError> {
        DieSpec::new(self.arity)
    }

    /// Returns the validated confidence level.
    pub fn confidence(&self) -> Result<ConfidenceLevel, SpecError> {
        ConfidenceLevel::new(self.confidence_level)
    }
}

/// Simulated die settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rolls to simulate.
    pub rolls: usize,
    /// Fixed seed for reproducible runs; OS entropy when absent.
    pub seed: Option<u64>,
    /// Per-face weights for a loaded die; uniform when absent.
    pub weights: Option<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rolls: 600,
            seed: None,
            weights: None,
        }
    }
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text table.
    #[default]
    Table,
    /// Pretty-printed JSON with a timestamp.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Output configuration.
///
/// Continuous rolling is the `watch` subcommand, not a setting here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Report format.
    pub format: OutputFormat,
    /// Rolls between summaries for `watch`.
    pub report_every: usize,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            report_every: 100,
            metrics_port: 0,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Die and confidence level.
    #[serde(default)]
    pub session: SessionConfig,
    /// Verdict policy.
    #[serde(default)]
    pub thresholds: FairnessThresholds,
    /// Simulated die.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Report output.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let die = self.session.die()?;
        self.session.confidence()?;
        self.thresholds.validate()?;

        if let Some(weights) = &self.simulation.weights {
            if weights.len() != die.arity() as usize {
                return Err(ConfigError::InvalidSimulation(format!(
                    "{} weights given for a {}",
                    weights.len(),
                    die
                )));
            }
        }
        if self.output.report_every == 0 {
            return Err(ConfigError::InvalidSimulation(
                "report_every must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
