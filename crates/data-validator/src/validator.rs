//! Data Validator for Range Checking

use crate::error::ValidationError;
use sensor_protocol::SensorKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive `(min, max)` bounds
pub type Range = (f64, f64);

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Temperature valid range (°C)
    pub temperature_range: Range,
    /// pH valid range
    pub ph_range: Range,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            temperature_range: (20.0, 31.6),
            ph_range: (6.0, 8.0),
        }
    }
}

impl ValidationConfig {
    /// Get the range for a sensor kind
    pub fn range_for(&self, kind: SensorKind) -> Range {
        match kind {
            SensorKind::Temperature => self.temperature_range,
            SensorKind::Ph => self.ph_range,
        }
    }

    /// Reject ranges whose bounds are inverted or not finite
    pub fn check(&self) -> Result<(), ValidationError> {
        for kind in SensorKind::ALL {
            let (min, max) = self.range_for(kind);
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(ValidationError::InvertedRange {
                    field: kind.name(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Range validator for sensor readings
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: Range,
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            debug!("{} value {} rejected", field, value);
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a reading against its kind's range
    pub fn validate(&self, kind: SensorKind, value: f64) -> Result<(), ValidationError> {
        self.validate_range(kind.name(), value, self.config.range_for(kind))
    }

    /// Validate temperature
    pub fn validate_temperature(&self, value: f64) -> Result<(), ValidationError> {
        self.validate(SensorKind::Temperature, value)
    }

    /// Validate pH
    pub fn validate_ph(&self, value: f64) -> Result<(), ValidationError> {
        self.validate(SensorKind::Ph, value)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
