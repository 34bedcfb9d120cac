//! Record Error Types

use thiserror::Error;

/// Errors produced while decoding a `type:value` record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Line has no `:` separator
    #[error("Missing ':' separator in record {0:?}")]
    MissingSeparator(String),

    /// Type code is not an integer
    #[error("Invalid sensor type code {0:?}")]
    InvalidTypeCode(String),

    /// Type code is an integer but names no known sensor
    #[error("Unknown sensor type {0}")]
    UnknownSensor(i64),

    /// Value does not parse as a finite float
    #[error("Invalid reading value {0:?}")]
    InvalidValue(String),

    /// Value parsed but is negative
    #[error("Negative reading {value} for {kind}")]
    NegativeValue { kind: &'static str, value: f64 },

    /// Line exceeds the record length limit
    #[error("Record of {0} bytes exceeds the line limit")]
    TooLong(usize),

    /// Bytes are not valid UTF-8
    #[error("Record is not valid UTF-8")]
    InvalidEncoding,
}
