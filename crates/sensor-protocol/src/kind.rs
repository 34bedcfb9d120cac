//! Sensor Kind Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor classes understood by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum SensorKind {
    /// Water temperature (code 1)
    Temperature = 1,
    /// Acidity (code 2)
    Ph = 2,
}

impl SensorKind {
    /// All kinds, in shutdown order
    pub const ALL: [SensorKind; 2] = [SensorKind::Temperature, SensorKind::Ph];

    /// Get the wire code for this kind
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Look up a kind by wire code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SensorKind::Temperature),
            2 => Some(SensorKind::Ph),
            _ => None,
        }
    }

    /// Short lowercase name used in logs and thread names
    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Ph => "ph",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(SensorKind::Temperature.code(), 1);
        assert_eq!(SensorKind::Ph.code(), 2);
        assert_eq!(SensorKind::from_code(1), Some(SensorKind::Temperature));
        assert_eq!(SensorKind::from_code(2), Some(SensorKind::Ph));
        assert_eq!(SensorKind::from_code(3), None);
        assert_eq!(SensorKind::from_code(0), None);
    }

    #[test]
    fn test_shutdown_order() {
        assert_eq!(SensorKind::ALL[0], SensorKind::Temperature);
        assert_eq!(SensorKind::ALL[1], SensorKind::Ph);
    }
}
