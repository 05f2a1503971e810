//! CLI argument parsing for runlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Runlock: run a job at most once at a time, guarded by a lock directory.
///
/// Meant to be called from cron. Without a subcommand it acquires the lock,
/// runs the configured job, and releases the lock on every exit path.
/// Overlapping invocations are skipped, not queued.
#[derive(Parser, Debug)]
#[command(name = "runlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: runlock.yaml in the working directory, if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (overrides RUNLOCK_LOG).
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands for runlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire the lock, run the job, release the lock (default).
    Run,

    /// Show whether the lock is held and how old it is.
    Status,

    /// Remove the lock directory.
    ///
    /// Requires --force when a lock is present. Succeeds when there is no lock.
    Release(ReleaseArgs),
}

/// Arguments for the `release` command.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// Remove a held lock (required for safety).
    #[arg(long)]
    pub force: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// The command to run; no subcommand means `run`.
    pub fn command_or_default(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Run)
    }
}
