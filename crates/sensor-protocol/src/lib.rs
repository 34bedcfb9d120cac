//! Sensor Record Protocol
//!
//! Defines the two sensor kinds handled by the monitor and the
//! newline-terminated `type:value` record carried over the input pipe.

mod error;
mod kind;
mod record;

pub use error::RecordError;
pub use kind::SensorKind;
pub use record::Record;

/// In-band end-of-stream marker pushed through each buffer on shutdown.
///
/// Accepted readings are never negative, so this value cannot collide
/// with a real measurement.
pub const END_OF_DATA: f64 = -9999.0;

/// Longest accepted record line in bytes, newline included
pub const MAX_RECORD_LEN: usize = 256;

/// Returns true if `value` is the end-of-stream marker
pub fn is_end_of_data(value: f64) -> bool {
    value == END_OF_DATA
}
