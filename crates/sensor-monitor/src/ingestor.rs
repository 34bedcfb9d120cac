//! Record Ingestor
//!
//! The single producer: reads records from the input stream, routes each
//! accepted reading into its kind's buffer and, once the stream is
//! exhausted, pushes end-of-data into every buffer.

use ring_buffer::BoundedBuffer;
use sensor_protocol::{Record, RecordError, SensorKind, END_OF_DATA, MAX_RECORD_LEN};
use std::io::{self, BufRead, ErrorKind, Read};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Counters reported when ingestion ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Temperature readings enqueued
    pub temperature: usize,
    /// pH readings enqueued
    pub ph: usize,
    /// Lines discarded as malformed, negative or of unknown type
    pub rejected: usize,
}

impl IngestStats {
    /// Total readings enqueued
    pub fn accepted(&self) -> usize {
        self.temperature + self.ph
    }
}

/// Outcome of reading one bounded line
enum LineRead {
    Eof,
    Line,
    /// Line over the limit; holds the bytes discarded up to its newline
    Oversized(usize),
}

/// Read one line of at most `MAX_RECORD_LEN` bytes into `line`.
///
/// Longer lines are dropped through their newline without buffering them.
fn read_bounded_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<LineRead> {
    line.clear();
    let read = reader
        .by_ref()
        .take(MAX_RECORD_LEN as u64 + 1)
        .read_until(b'\n', line)?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if line.len() <= MAX_RECORD_LEN {
        return Ok(LineRead::Line);
    }

    let mut discarded = line.len();
    if line.ends_with(b"\n") {
        line.clear();
        return Ok(LineRead::Oversized(discarded));
    }

    line.clear();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                discarded += pos + 1;
                break;
            }
            None => {
                let len = available.len();
                reader.consume(len);
                discarded += len;
            }
        }
    }
    Ok(LineRead::Oversized(discarded))
}

/// Producer side of both buffers
pub struct Ingestor {
    temperature: Arc<BoundedBuffer<f64>>,
    ph: Arc<BoundedBuffer<f64>>,
    grace_period: Duration,
    stats: IngestStats,
}

impl Ingestor {
    /// Create an ingestor writing into the given buffers
    pub fn new(
        temperature: Arc<BoundedBuffer<f64>>,
        ph: Arc<BoundedBuffer<f64>>,
        grace_period: Duration,
    ) -> Self {
        Self {
            temperature,
            ph,
            grace_period,
            stats: IngestStats::default(),
        }
    }

    fn buffer_for(&self, kind: SensorKind) -> &BoundedBuffer<f64> {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Ph => &self.ph,
        }
    }

    /// Decode one raw line and enqueue it if valid.
    ///
    /// Blank lines yield `Ok(None)`. May block while the target buffer is full.
    pub fn ingest_line(&mut self, line: &[u8]) -> Result<Option<Record>, RecordError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            debug!("Skipping blank line");
            return Ok(None);
        }

        let record = match Record::decode(line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Discarding record: {}", e);
                self.stats.rejected += 1;
                return Err(e);
            }
        };

        self.buffer_for(record.kind).enqueue(record.value);
        match record.kind {
            SensorKind::Temperature => self.stats.temperature += 1,
            SensorKind::Ph => self.stats.ph += 1,
        }
        debug!("Queued {} reading {}", record.kind, record.value);
        Ok(Some(record))
    }

    /// Consume the stream to exhaustion, then run the shutdown sequence
    pub fn run<R: BufRead>(mut self, mut reader: R) -> IngestStats {
        info!("Ingestor started");

        let mut line = Vec::with_capacity(MAX_RECORD_LEN + 1);
        loop {
            match read_bounded_line(&mut reader, &mut line) {
                Ok(LineRead::Eof) => break,
                Ok(LineRead::Line) => {
                    let _ = self.ingest_line(&line);
                }
                Ok(LineRead::Oversized(len)) => {
                    warn!("Discarding record: {}", RecordError::TooLong(len));
                    self.stats.rejected += 1;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!("Input read failed, treating as end of stream: {}", e);
                    break;
                }
            }
        }

        info!(
            "Input exhausted after {} readings, waiting {:?} before shutdown",
            self.stats.accepted(),
            self.grace_period
        );
        thread::sleep(self.grace_period);
        self.finish();
        self.stats
    }

    /// Push end-of-data into each buffer, temperature first
    fn finish(&self) {
        for kind in SensorKind::ALL {
            self.buffer_for(kind).enqueue(END_OF_DATA);
            debug!("End-of-data sent to {} buffer", kind);
        }
        info!(
            "Ingestion finished: {} temperature, {} pH, {} rejected",
            self.stats.temperature, self.stats.ph, self.stats.rejected
        );
    }

    /// Counters so far
    pub fn stats(&self) -> IngestStats {
        self.stats
    }
}
