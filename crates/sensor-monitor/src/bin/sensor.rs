//! Sensor - replays a data file into the monitor's pipe

use anyhow::{bail, Context, Result};
use clap::Parser;
use sensor_monitor::{init_logging, Emitter};
use sensor_protocol::SensorKind;
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sensor")]
#[command(about = "Sends readings from a data file to the sensor monitor")]
struct Args {
    /// Sensor type: 1 = temperature, 2 = pH
    #[arg(short = 's', long = "sensor")]
    sensor: i64,

    /// Seconds between readings
    #[arg(short = 't', long = "interval")]
    interval: u64,

    /// File with one reading per line
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Monitor pipe
    #[arg(short = 'p', long = "pipe")]
    pipe: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let Some(kind) = SensorKind::from_code(args.sensor) else {
        bail!("Unknown sensor type {} (expected 1 or 2)", args.sensor);
    };

    info!("Opening pipe {}", args.pipe.display());
    let mut pipe = OpenOptions::new()
        .write(true)
        .open(&args.pipe)
        .with_context(|| format!("Failed to open pipe {}", args.pipe.display()))?;

    let data = File::open(&args.file)
        .with_context(|| format!("Failed to open data file {}", args.file.display()))?;

    Emitter::new(kind, Duration::from_secs(args.interval))
        .run(BufReader::new(data), &mut pipe)
        .context("Failed to send readings")?;
    Ok(())
}
