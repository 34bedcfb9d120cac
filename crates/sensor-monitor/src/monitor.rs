//! Monitor Orchestration
//!
//! Wires one ingestor thread and two consumer threads around the two
//! buffers and joins them once end-of-data has propagated.

use crate::channel::SensorPipe;
use crate::config::MonitorConfig;
use crate::consumer::{ConsumerStats, TypedConsumer};
use crate::error::MonitorError;
use crate::ingestor::{IngestStats, Ingestor};
use data_validator::Validator;
use ring_buffer::BoundedBuffer;
use sensor_protocol::SensorKind;
use std::fs::File;
use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Summary of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorReport {
    pub ingest: IngestStats,
    pub temperature: ConsumerStats,
    pub ph: ConsumerStats,
}

/// Owns the configuration and both buffers
pub struct Monitor {
    config: MonitorConfig,
    temperature: Arc<BoundedBuffer<f64>>,
    ph: Arc<BoundedBuffer<f64>>,
}

impl Monitor {
    /// Validate the config and allocate both buffers
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let temperature = Arc::new(BoundedBuffer::new(config.buffer_capacity)?);
        let ph = Arc::new(BoundedBuffer::new(config.buffer_capacity)?);
        info!(
            "Buffers initialized: temperature capacity {}, pH capacity {}",
            temperature.capacity(),
            ph.capacity()
        );
        Ok(Self {
            config,
            temperature,
            ph,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Create the pipe, wait for a sensor, and run until end-of-data
    pub fn run_with_pipe(self) -> Result<MonitorReport, MonitorError> {
        let pipe = SensorPipe::create(&self.config.pipe)?;
        let consumers = self.open_consumers()?;
        let reader = pipe.open_reader()?;
        self.run_pipeline(consumers, reader, Some(pipe))
    }

    /// Run against an already-open input stream
    pub fn run<R>(self, reader: R) -> Result<MonitorReport, MonitorError>
    where
        R: BufRead + Send + 'static,
    {
        let consumers = self.open_consumers()?;
        self.run_pipeline(consumers, reader, None)
    }

    fn open_consumers(&self) -> Result<[TypedConsumer<File>; 2], MonitorError> {
        let validator = Validator::new(self.config.validation.clone());
        let temperature = TypedConsumer::open(
            SensorKind::Temperature,
            Arc::clone(&self.temperature),
            validator.clone(),
            &self.config.temperature_log,
            self.config.timestamp_mode,
        )?;
        let ph = TypedConsumer::open(
            SensorKind::Ph,
            Arc::clone(&self.ph),
            validator,
            &self.config.ph_log,
            self.config.timestamp_mode,
        )?;
        Ok([temperature, ph])
    }

    fn run_pipeline<R>(
        self,
        consumers: [TypedConsumer<File>; 2],
        reader: R,
        pipe: Option<SensorPipe>,
    ) -> Result<MonitorReport, MonitorError>
    where
        R: BufRead + Send + 'static,
    {
        let ingestor = Ingestor::new(
            Arc::clone(&self.temperature),
            Arc::clone(&self.ph),
            self.config.grace_period(),
        );

        let ingest_handle = thread::Builder::new()
            .name("ingestor".to_string())
            .spawn(move || {
                let stats = ingestor.run(reader);
                if let Some(mut pipe) = pipe {
                    if let Err(e) = pipe.release() {
                        warn!("Failed to remove pipe {}: {}", pipe.path().display(), e);
                    }
                }
                stats
            })?;

        let [temperature, ph] = consumers;
        let temperature_handle = spawn_consumer(temperature)?;
        let ph_handle = spawn_consumer(ph)?;

        let report = MonitorReport {
            ingest: join(ingest_handle, "ingestor")?,
            temperature: join(temperature_handle, "consumer-temperature")?,
            ph: join(ph_handle, "consumer-ph")?,
        };

        info!(
            "Monitor finished: {} temperature and {} pH readings logged",
            report.temperature.written, report.ph.written
        );
        Ok(report)
    }
}

fn spawn_consumer(
    mut consumer: TypedConsumer<File>,
) -> Result<JoinHandle<ConsumerStats>, MonitorError> {
    let name = format!("consumer-{}", consumer.kind());
    Ok(thread::Builder::new().name(name).spawn(move || consumer.run())?)
}

fn join<T>(handle: JoinHandle<T>, name: &str) -> Result<T, MonitorError> {
    handle
        .join()
        .map_err(|_| MonitorError::ThreadPanicked(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimestampMode;
    use std::fs::{self, OpenOptions};
    use std::io::{Cursor, Write};
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn config_in(dir: &Path, capacity: usize, grace_ms: u64) -> MonitorConfig {
        let mut config = MonitorConfig::new(
            capacity,
            dir.join("temperature.log"),
            dir.join("ph.log"),
            dir.join("sensors.pipe"),
        );
        config.grace_period_ms = grace_ms;
        config
    }

    fn logged_values(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| line.split_once("] ").unwrap().1.to_string())
            .collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Monitor::new(config_in(dir.path(), 0, 0)),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn test_buffers_sized_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = Monitor::new(config_in(dir.path(), 3, 0)).unwrap();

        assert_eq!(monitor.config().buffer_capacity, 3);
        assert_eq!(monitor.temperature.capacity(), 3);
        assert_eq!(monitor.ph.capacity(), 3);
    }

    #[test]
    fn test_end_to_end_mixed_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 2, 300);
        let monitor = Monitor::new(config.clone()).unwrap();

        let input = Cursor::new(b"1:25.0\n2:7.0\n1:-3.0\n3:5.0\n".to_vec());
        let started = Instant::now();
        let report = monitor.run(input).unwrap();

        // Shutdown only happens after the idle grace period
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(report.ingest.rejected, 2);
        assert_eq!(report.temperature.written, 1);
        assert_eq!(report.ph.written, 1);

        assert_eq!(logged_values(&config.temperature_log), vec!["25.000000"]);
        assert_eq!(logged_values(&config.ph_log), vec!["7.000000"]);
    }

    #[test]
    fn test_backpressure_with_small_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 1, 0);
        let monitor = Monitor::new(config.clone()).unwrap();

        let mut input = String::new();
        for i in 0..200 {
            input.push_str(&format!("1:{}\n", 20.0 + (i % 10) as f64));
            input.push_str(&format!("2:{}\n", 6.0 + (i % 3) as f64 * 0.5));
        }
        let report = monitor.run(Cursor::new(input.into_bytes())).unwrap();

        assert_eq!(report.ingest.accepted(), 400);
        assert_eq!(report.temperature.written, 200);
        assert_eq!(report.ph.written, 200);

        let temps = logged_values(&config.temperature_log);
        assert_eq!(temps.len(), 200);
        assert_eq!(temps[0], "20.000000");
        assert_eq!(temps[9], "29.000000");
        assert_eq!(temps[10], "20.000000");
    }

    #[test]
    fn test_unopenable_log_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), 2, 0);
        config.ph_log = dir.path().join("missing").join("ph.log");
        let monitor = Monitor::new(config).unwrap();

        assert!(matches!(
            monitor.run(Cursor::new(Vec::new())),
            Err(MonitorError::LogOpen {
                kind: SensorKind::Ph,
                ..
            })
        ));
    }

    #[test]
    fn test_consumer_start_timestamps_shared() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), 4, 0);
        config.timestamp_mode = TimestampMode::ConsumerStart;
        let monitor = Monitor::new(config.clone()).unwrap();

        monitor
            .run(Cursor::new(b"1:21.0\n1:22.0\n1:23.0\n".to_vec()))
            .unwrap();

        let contents = fs::read_to_string(&config.temperature_log).unwrap();
        let stamps: Vec<&str> = contents.lines().map(|l| &l[..21]).collect();
        assert_eq!(stamps.len(), 3);
        assert!(stamps.iter().all(|s| *s == stamps[0]));
    }

    #[test]
    fn test_run_with_pipe_removes_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 2, 100);
        let pipe_path = config.pipe.clone();
        let monitor = Monitor::new(config.clone()).unwrap();

        let sensor = thread::spawn(move || {
            // Wait for the monitor to create the pipe
            let deadline = Instant::now() + Duration::from_secs(5);
            while !pipe_path.exists() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            let mut sink = OpenOptions::new().write(true).open(&pipe_path).unwrap();
            sink.write_all(b"1:24.5\n2:6.8\n").unwrap();
        });

        let report = monitor.run_with_pipe().unwrap();
        sensor.join().unwrap();

        assert_eq!(report.temperature.written, 1);
        assert_eq!(report.ph.written, 1);
        assert!(!config.pipe.exists());
    }
}
