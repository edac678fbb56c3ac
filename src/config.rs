// config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// Bridge limits
pub const MAX_WEIGHT: u32 = 1200;
pub const CAR_WEIGHT: u32 = 200;
pub const VAN_WEIGHT: u32 = 300;

// Vehicle generation
pub const CAR_PROBABILITY: f64 = 0.5;

// Timing
pub const CROSSING_DURATION: Duration = Duration::from_secs(3);
pub const REPORT_DEBOUNCE: Duration = Duration::from_millis(500);

// Environment overrides
pub const ENV_CROSSING_MS: &str = "BRIDGE_CROSSING_MS";
pub const ENV_REPORT_DEBOUNCE_MS: &str = "BRIDGE_REPORT_DEBOUNCE_MS";
pub const ENV_REPORT_FORMAT: &str = "BRIDGE_REPORT_FORMAT";
pub const ENV_SEED: &str = "BRIDGE_SEED";
pub const ENV_CROSSING_LOG: &str = "BRIDGE_CROSSING_LOG";

/// How status reports and the final summary are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be `text` or `json`, got {value:?}")]
    InvalidFormat { var: &'static str, value: String },
}

/// Runtime knobs for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub crossing_duration: Duration,
    pub report_debounce: Duration,
    pub report_format: ReportFormat,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// CSV file receiving one row per crossed vehicle.
    pub crossing_log: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            crossing_duration: CROSSING_DURATION,
            report_debounce: REPORT_DEBOUNCE,
            report_format: ReportFormat::Text,
            seed: None,
            crossing_log: None,
        }
    }
}

impl SimulationConfig {
    /// Builds the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable lookup, falling back to
    /// the defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CROSSING_MS) {
            config.crossing_duration = Duration::from_millis(parse_u64(ENV_CROSSING_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_REPORT_DEBOUNCE_MS) {
            config.report_debounce =
                Duration::from_millis(parse_u64(ENV_REPORT_DEBOUNCE_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_REPORT_FORMAT) {
            config.report_format = match value.trim().to_ascii_lowercase().as_str() {
                "text" => ReportFormat::Text,
                "json" => ReportFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidFormat {
                        var: ENV_REPORT_FORMAT,
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup(ENV_SEED) {
            config.seed = Some(parse_u64(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_CROSSING_LOG) {
            if !value.trim().is_empty() {
                config.crossing_log = Some(PathBuf::from(value));
            }
        }

        Ok(config)
    }
}

fn parse_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
