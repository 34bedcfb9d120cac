//! `type:value` Record Parsing and Encoding

use crate::error::RecordError;
use crate::kind::SensorKind;
use std::str::FromStr;

/// Separator between type code and value
const SEPARATOR: char = ':';

/// A single decoded sensor reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Which sensor produced the reading
    pub kind: SensorKind,
    /// Measured value (never negative once decoded)
    pub value: f64,
}

impl Record {
    /// Create a new record
    pub fn new(kind: SensorKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// Decode a raw line (without or with its trailing newline)
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let line = std::str::from_utf8(bytes).map_err(|_| RecordError::InvalidEncoding)?;
        line.parse()
    }

    /// Encode as a newline-terminated wire line
    pub fn encode(&self) -> String {
        format!("{}{}{:.6}\n", self.kind.code(), SEPARATOR, self.value)
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\n', '\r']);

        let (code, value) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| RecordError::MissingSeparator(line.to_string()))?;

        let code: i64 = code
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidTypeCode(code.to_string()))?;
        let kind = SensorKind::from_code(code).ok_or(RecordError::UnknownSensor(code))?;

        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidValue(value.to_string()))?;
        if !value.is_finite() {
            return Err(RecordError::InvalidValue(value.to_string()));
        }
        if value < 0.0 {
            return Err(RecordError::NegativeValue {
                kind: kind.name(),
                value,
            });
        }

        Ok(Self { kind, value })
    }
}
