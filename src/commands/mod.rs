//! Command implementations for runlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each handler returns the process exit code for outcomes
//! that are not errors (a skipped run exits non-zero without failing).

mod release;
mod run;
mod status;

use crate::cli::Command;
use crate::error::{Result, RunlockError};
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(command: &Command, config_path: Option<&Path>) -> Result<i32> {
    match command {
        Command::Run => run::cmd_run(config_path),
        Command::Status => status::cmd_status(config_path),
        Command::Release(args) => release::cmd_release(config_path, args),
    }
}

/// Working directory at invocation; relative config paths anchor here.
fn invocation_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        RunlockError::UserError(format!("failed to get current working directory: {}", e))
    })
}
