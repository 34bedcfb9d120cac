//! Sensor Monitor - Main Entry Point

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sensor_monitor::{init_logging, ConfigOverrides, Monitor, MonitorConfig, TimestampMode};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "sensor-monitor")]
#[command(about = "Receives temperature and pH readings over a named pipe and logs them")]
#[command(disable_help_flag = true)]
struct Args {
    /// Slots in each sensor buffer
    #[arg(short = 'b', long = "buffer-size")]
    buffer_size: Option<usize>,

    /// Temperature log file
    #[arg(short = 't', long = "temp-file")]
    temp_file: Option<PathBuf>,

    /// pH log file
    #[arg(short = 'h', long = "ph-file")]
    ph_file: Option<PathBuf>,

    /// Named pipe sensors write into
    #[arg(short = 'p', long = "pipe")]
    pipe: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Idle wait before shutting down, in milliseconds
    #[arg(short = 'g', long = "grace-ms")]
    grace_ms: Option<u64>,

    /// Log line timestamp policy
    #[arg(long = "timestamps", value_enum)]
    timestamps: Option<TimestampMode>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    info!("=== Sensor Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    run(args).map_err(|e| {
        error!("{:#}", e);
        e
    })
}

fn overrides(args: &Args) -> ConfigOverrides {
    ConfigOverrides {
        buffer_capacity: args.buffer_size,
        temperature_log: args.temp_file.clone(),
        ph_log: args.ph_file.clone(),
        pipe: args.pipe.clone(),
        grace_period_ms: args.grace_ms,
        timestamp_mode: args.timestamps,
    }
}

fn run(args: Args) -> Result<()> {
    let config = MonitorConfig::load(args.config.as_deref(), overrides(&args))
        .context("Invalid monitor configuration")?;
    let monitor = Monitor::new(config).context("Failed to initialize monitor")?;

    info!(
        "Monitoring pipe {} (buffer size {})",
        monitor.config().pipe.display(),
        monitor.config().buffer_capacity
    );

    let report = monitor.run_with_pipe().context("Monitor aborted")?;

    info!(
        "Finished: {} readings accepted, {} rejected at ingestion, {} out of range",
        report.ingest.accepted(),
        report.ingest.rejected,
        report.temperature.out_of_range + report.ph.out_of_range
    );
    Ok(())
}
