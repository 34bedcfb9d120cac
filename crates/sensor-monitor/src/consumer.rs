//! Typed Consumer
//!
//! Drains one sensor kind's buffer, range-checks each reading and appends
//! the accepted ones to that kind's log, flushing after every line.

use crate::config::TimestampMode;
use crate::error::MonitorError;
use chrono::{DateTime, Local};
use data_validator::Validator;
use ring_buffer::BoundedBuffer;
use sensor_protocol::{is_end_of_data, SensorKind};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Log line timestamp layout
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counters reported when a consumer stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Lines appended to the log
    pub written: usize,
    /// Readings outside the physical range
    pub out_of_range: usize,
    /// Readings lost to a failed write or flush
    pub write_failures: usize,
}

/// Format one log line: `[YYYY-MM-DD HH:MM:SS] value`
pub fn format_line(stamp: &DateTime<Local>, value: f64) -> String {
    format!("[{}] {:.6}\n", stamp.format(TIMESTAMP_FORMAT), value)
}

/// Consumer side of one buffer
pub struct TypedConsumer<W: Write> {
    kind: SensorKind,
    buffer: Arc<BoundedBuffer<f64>>,
    validator: Validator,
    sink: W,
    timestamp_mode: TimestampMode,
}

impl TypedConsumer<File> {
    /// Open (append, create) the log at `path`; failure is fatal
    pub fn open(
        kind: SensorKind,
        buffer: Arc<BoundedBuffer<f64>>,
        validator: Validator,
        path: &Path,
        timestamp_mode: TimestampMode,
    ) -> Result<Self, MonitorError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| MonitorError::LogOpen {
                kind,
                path: path.to_path_buf(),
                source,
            })?;
        info!("Opened {} log {}", kind, path.display());
        Ok(Self::new(kind, buffer, validator, file, timestamp_mode))
    }
}

impl<W: Write> TypedConsumer<W> {
    /// Create a consumer writing to any sink
    pub fn new(
        kind: SensorKind,
        buffer: Arc<BoundedBuffer<f64>>,
        validator: Validator,
        sink: W,
        timestamp_mode: TimestampMode,
    ) -> Self {
        Self {
            kind,
            buffer,
            validator,
            sink,
            timestamp_mode,
        }
    }

    /// Sensor kind this consumer handles
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Drain the buffer until end-of-data is dequeued
    pub fn run(&mut self) -> ConsumerStats {
        let started_at = Local::now();
        let mut stats = ConsumerStats::default();
        info!("{} consumer started", self.kind);

        loop {
            let value = self.buffer.dequeue();
            if is_end_of_data(value) {
                debug!("{} consumer received end-of-data", self.kind);
                break;
            }

            if let Err(e) = self.validator.validate(self.kind, value) {
                warn!("Discarding reading: {}", e);
                stats.out_of_range += 1;
                continue;
            }

            let stamp = match self.timestamp_mode {
                TimestampMode::PerRecord => Local::now(),
                TimestampMode::ConsumerStart => started_at,
            };
            match self.append(&format_line(&stamp, value)) {
                Ok(()) => stats.written += 1,
                Err(e) => {
                    error!("Failed to write {} reading {}: {}", self.kind, value, e);
                    stats.write_failures += 1;
                }
            }
        }

        info!(
            "{} consumer stopped: {} written, {} out of range, {} write failures",
            self.kind, stats.written, stats.out_of_range, stats.write_failures
        );
        stats
    }

    fn append(&mut self, line: &str) -> std::io::Result<()> {
        self.sink.write_all(line.as_bytes())?;
        self.sink.flush()
    }

    /// Give back the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}
