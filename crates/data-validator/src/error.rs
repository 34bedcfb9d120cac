//! Validation Error Types

use thiserror::Error;

/// Errors during data validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Configured range has min above max
    #[error("{field} range [{min}, {max}] is inverted")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}
