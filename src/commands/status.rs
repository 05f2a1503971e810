//! Implementation of the `runlock status` command.
//!
//! Shows the lock state, the configured job, and the last recorded run.

use super::invocation_dir;
use crate::config::Config;
use crate::error::Result;
use crate::exit_codes;
use crate::history;
use crate::job::JobSpec;
use crate::lock::LockInfo;
use std::path::Path;

/// Execute the `runlock status` command.
pub fn cmd_status(config_path: Option<&Path>) -> Result<i32> {
    let cwd = invocation_dir()?;
    let config = Config::resolve(config_path, &cwd)?;
    print!("{}", render_status(&config, &cwd)?);
    Ok(exit_codes::SUCCESS)
}

/// Render the status report.
fn render_status(config: &Config, cwd: &Path) -> Result<String> {
    let lock_path = config.lock_path(cwd);
    let job = JobSpec::from_config(config, cwd)?;
    let mut out = String::new();

    out.push_str("Lock\n");
    out.push_str(&format!("  path:  {}\n", lock_path.display()));
    match LockInfo::inspect(&lock_path)? {
        Some(lock) => {
            let stale = if lock.is_stale(config.lock_stale_minutes) {
                " [STALE]"
            } else {
                ""
            };
            out.push_str(&format!(
                "  state: held since {} ({} ago){}\n",
                lock.since.to_rfc3339(),
                lock.age_string(),
                stale
            ));
        }
        None => out.push_str("  state: free\n"),
    }

    out.push_str("\nJob\n");
    out.push_str(&format!("  command: {}\n", job.command_line()));
    out.push_str(&format!("  dir:     {}\n", job.working_dir.display()));

    if let Some(history_file) = &config.history_file {
        let records = history::read_records(&cwd.join(history_file))?;
        out.push_str("\nLast run\n");
        match records.last() {
            Some(last) => out.push_str(&format!(
                "  {} at {} by {} (exit {})\n",
                last.kind,
                last.ts.to_rfc3339(),
                last.actor,
                last.exit_code
            )),
            None => out.push_str("  none recorded\n"),
        }
    }

    Ok(out)
}
