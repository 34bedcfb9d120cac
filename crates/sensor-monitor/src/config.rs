//! Monitor Configuration
//!
//! Layered as: built-in defaults, an optional TOML file, `SENSOR_MONITOR_*`
//! environment variables, then command-line overrides.

use crate::error::ConfigError;
use ::config::{Config, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SENSOR_MONITOR";

/// Default wait after the pipe runs dry before shutting down (ms)
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 10_000;

/// How log lines are timestamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampMode {
    /// Stamp each line when it is written
    #[default]
    PerRecord,
    /// Stamp every line with the time the consumer started
    ConsumerStart,
}

impl TimestampMode {
    /// Name used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampMode::PerRecord => "per-record",
            TimestampMode::ConsumerStart => "consumer-start",
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Slots per buffer (shared by both sensor kinds)
    pub buffer_capacity: usize,
    /// Temperature output log
    pub temperature_log: PathBuf,
    /// pH output log
    pub ph_log: PathBuf,
    /// Named pipe sensors write into
    pub pipe: PathBuf,
    /// Idle wait before end-of-data is sent (ms)
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    /// Log line timestamp policy
    #[serde(default)]
    pub timestamp_mode: TimestampMode,
    /// Physical ranges per sensor kind
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

/// Values supplied on the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub buffer_capacity: Option<usize>,
    pub temperature_log: Option<PathBuf>,
    pub ph_log: Option<PathBuf>,
    pub pipe: Option<PathBuf>,
    pub grace_period_ms: Option<u64>,
    pub timestamp_mode: Option<TimestampMode>,
}

impl MonitorConfig {
    /// Create a config with default grace period, timestamps and ranges
    pub fn new(
        buffer_capacity: usize,
        temperature_log: impl Into<PathBuf>,
        ph_log: impl Into<PathBuf>,
        pipe: impl Into<PathBuf>,
    ) -> Self {
        Self {
            buffer_capacity,
            temperature_log: temperature_log.into(),
            ph_log: ph_log.into(),
            pipe: pipe.into(),
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            timestamp_mode: TimestampMode::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Load from the layered sources and validate
    pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("grace_period_ms", DEFAULT_GRACE_PERIOD_MS as i64)?
            .set_default("timestamp_mode", TimestampMode::default().as_str())?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let config: MonitorConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("buffer_capacity", overrides.buffer_capacity.map(|v| v as i64))?
            .set_override_option("temperature_log", overrides.temperature_log.map(path_value))?
            .set_override_option("ph_log", overrides.ph_log.map(path_value))?
            .set_override_option("pipe", overrides.pipe.map(path_value))?
            .set_override_option("grace_period_ms", overrides.grace_period_ms.map(|v| v as i64))?
            .set_override_option("timestamp_mode", overrides.timestamp_mode.map(|m| m.as_str()))?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the monitor relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        self.validation.check()?;
        Ok(())
    }

    /// Grace period as a duration
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

fn path_value(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
