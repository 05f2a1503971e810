//! Logging setup for `runlock` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from `--log-level`, then `RUNLOCK_LOG`, then `info`.
//! Both accept the same names (`LogLevel`'s clap values, case-insensitive).
//! Logs go to STDERR; the job inherits STDOUT for its own output.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV: &str = "RUNLOCK_LOG";

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the global stderr subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var(LOG_ENV).ok();

    fmt()
        .with_max_level(effective_level(cli_level, env_level.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

/// An unrecognised `RUNLOCK_LOG` value falls back to `info`.
fn effective_level(cli_level: Option<LogLevel>, env_level: Option<&str>) -> Level {
    cli_level
        .or_else(|| env_level.and_then(|s| <LogLevel as ValueEnum>::from_str(s.trim(), true).ok()))
        .map_or(Level::INFO, Level::from)
}
