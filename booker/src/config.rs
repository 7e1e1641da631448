use booker_core::{Timings, WaitlistWiring};
use clap::Parser;
use std::path::PathBuf;

/// Book a date. Any date. (They're all taken.)
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// Where should we write logs?
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Seed for picking names and excuses. Random if unset.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Multiply every delay by this much (e.g. 0.1 to speed things up)
    #[clap(long, default_value = "1.0", value_parser = parse_time_scale)]
    time_scale: f64,

    /// Make "Join Waitlist" close and reopen the error instead of starting
    /// the waitlist
    #[clap(long)]
    reopen_quirk: bool,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("zone", "bytes", "booker")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Delays, scaled as requested
    pub fn timings(&self) -> Timings {
        // parse_time_scale only lets through scales that fit
        Timings::default()
            .checked_scaled(self.time_scale)
            .unwrap_or_default()
    }

    /// What "Join Waitlist" should do
    pub fn wiring(&self) -> WaitlistWiring {
        if self.reopen_quirk {
            WaitlistWiring::ReopenOutcome
        } else {
            WaitlistWiring::OpenWaitlist
        }
    }
}

/// Problems with the command-line arguments.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The value wasn't a number at all
    #[error("not a number: {0}")]
    NotANumber(#[from] std::num::ParseFloatError),

    /// Zero, negative, infinite, or NaN
    #[error("time scale must be a positive, finite number (got {0})")]
    BadTimeScale(f64),

    /// Some delay would be too long to wait for
    #[error("time scale {0} makes delays too long")]
    TimeScaleTooLarge(f64),
}

fn parse_time_scale(raw: &str) -> Result<f64, ConfigError> {
    let scale: f64 = raw.parse()?;

    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::BadTimeScale(scale));
    }

    if Timings::default().checked_scaled(scale).is_none() {
        return Err(ConfigError::TimeScaleTooLarge(scale));
    }

    Ok(scale)
}
