//! Monitor Error Types

use data_validator::ValidationError;
use ring_buffer::BufferError;
use sensor_protocol::SensorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while assembling the monitor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layered sources failed to load or deserialize
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Buffer capacity of zero
    #[error("Buffer capacity must be a positive integer")]
    ZeroCapacity,

    /// Range table is unusable
    #[error("Invalid validation ranges: {0}")]
    Ranges(#[from] ValidationError),
}

/// Fatal errors that stop the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Named pipe could not be created or opened
    #[error("Pipe error on {path}: {source}")]
    Pipe {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output log could not be opened
    #[error("Failed to open {kind} log {path}: {source}")]
    LogOpen {
        kind: SensorKind,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Buffer construction failed
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// A worker thread panicked
    #[error("{0} thread panicked")]
    ThreadPanicked(String),

    /// Any other I/O failure (thread spawn)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
