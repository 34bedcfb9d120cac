//! Sensor Range Validation
//!
//! Checks readings against the physical range of their sensor kind.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Range, ValidationConfig, Validator};
