use std::time::Duration;

use anyhow::Context;
use clap::Parser;

/// Measure the frame rate of a paced loop with simulated per-frame work.
#[derive(Debug, Clone, Parser)]
#[command(name = "tickmeter-probe", version)]
pub struct Cli {
    /// Target tick rate of the emulated display, in Hz.
    #[arg(long, default_value_t = 60.0)]
    pub hz: f64,

    /// Reporting interval, in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// How long to run, in seconds.
    #[arg(long, default_value_t = 5.0)]
    pub seconds: f64,

    /// Simulated work per frame, in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    pub work_ms: f64,

    /// Log filter in env_logger syntax (falls back to RUST_LOG, then "info").
    #[arg(long)]
    pub log: Option<String>,
}

impl Cli {
    pub fn run_duration(&self) -> anyhow::Result<Duration> {
        secs(self.seconds, "--seconds")
    }

    pub fn work_per_frame(&self) -> anyhow::Result<Duration> {
        if self.work_ms == 0.0 {
            return Ok(Duration::ZERO);
        }
        secs(self.work_ms / 1000.0, "--work-ms")
    }
}

fn secs(value: f64, flag: &str) -> anyhow::Result<Duration> {
    anyhow::ensure!(value.is_finite() && value >= 0.0, "{flag} must be a non-negative number, got {value}");
    Duration::try_from_secs_f64(value).with_context(|| format!("{flag} is out of range: {value}"))
}
