//! Implementation of the `runlock release` command.
//!
//! Operator escape hatch for a lock left behind by a failed release.

use super::invocation_dir;
use crate::cli::ReleaseArgs;
use crate::config::Config;
use crate::error::{Result, RunlockError};
use crate::exit_codes;
use crate::lock::{self, LockInfo, ReleaseOutcome};
use std::path::Path;

/// Execute the `runlock release` command.
pub fn cmd_release(config_path: Option<&Path>, args: &ReleaseArgs) -> Result<i32> {
    let cwd = invocation_dir()?;
    let config = Config::resolve(config_path, &cwd)?;

    match release(&config, &cwd, args.force)? {
        ReleaseOutcome::Released { .. } => {
            println!("Released lock: {}", config.lock_path(&cwd).display())
        }
        ReleaseOutcome::NotHeld => println!("No lock held at: {}", config.lock_path(&cwd).display()),
    }
    Ok(exit_codes::SUCCESS)
}

/// Remove the configured lock. A present lock needs `force`.
fn release(config: &Config, cwd: &Path, force: bool) -> Result<ReleaseOutcome> {
    let lock_path = config.lock_path(cwd);

    if let Some(held) = LockInfo::inspect(&lock_path)?
        && !force
    {
        return Err(RunlockError::UserError(format!(
            "lock is held: {}\nFix: make sure no run is active, then re-run with --force.",
            held
        )));
    }

    lock::release_lock(&lock_path, config.release_policy())
}
