//! Sensor Monitor
//!
//! Reads `type:value` records from a named pipe and fans them out to one
//! bounded buffer per sensor kind. A dedicated consumer thread per kind
//! range-checks each reading and appends it to that kind's log file.
//!
//! Shutdown is in-band: once the pipe runs dry the ingestor waits a grace
//! period, then pushes [`sensor_protocol::END_OF_DATA`] into every buffer.

pub mod channel;
pub mod config;
pub mod consumer;
pub mod emitter;
pub mod error;
pub mod ingestor;
pub mod monitor;

pub use channel::SensorPipe;
pub use crate::config::{ConfigOverrides, MonitorConfig, TimestampMode};
pub use consumer::{ConsumerStats, TypedConsumer};
pub use emitter::Emitter;
pub use error::{ConfigError, MonitorError};
pub use ingestor::{IngestStats, Ingestor};
pub use monitor::{Monitor, MonitorReport};

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging (`RUST_LOG` overrides the default `info` level)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
