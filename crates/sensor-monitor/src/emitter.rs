//! Sensor Emitter
//!
//! Replays a file of raw readings into the monitor's pipe as
//! `type:value` records, one per interval.

use sensor_protocol::{Record, SensorKind};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Writes one sensor's readings as wire records
#[derive(Debug, Clone)]
pub struct Emitter {
    kind: SensorKind,
    interval: Duration,
}

impl Emitter {
    /// Create an emitter for `kind`, pausing `interval` after each record
    pub fn new(kind: SensorKind, interval: Duration) -> Self {
        Self { kind, interval }
    }

    /// Send every parsable line of `data` to `sink`; returns records sent
    pub fn run<R: BufRead, W: Write>(&self, data: R, sink: &mut W) -> io::Result<usize> {
        info!("Sending {} readings every {:?}", self.kind, self.interval);
        let mut sent = 0;

        for line in data.lines() {
            let line = line?;
            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }

            let value: f64 = match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    warn!("Skipping unparsable reading {:?}", raw);
                    continue;
                }
            };

            let record = Record::new(self.kind, value).encode();
            sink.write_all(record.as_bytes())?;
            sink.flush()?;
            sent += 1;
            debug!("Sensor sent {}", record.trim_end());

            thread::sleep(self.interval);
        }

        info!("Sent {} {} readings", sent, self.kind);
        Ok(sent)
    }
}
