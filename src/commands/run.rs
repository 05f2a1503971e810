//! Implementation of the `runlock run` command (the default).

use super::invocation_dir;
use crate::config::Config;
use crate::error::{Result, RunlockError};
use crate::history::{self, RunKind, RunRecord};
use crate::job::JobOutcome;
use crate::lock::ReleaseOutcome;
use crate::runner::{RunOutcome, Runner};
use crate::signals::ShutdownSignal;
use serde_json::{Value, json};
use std::path::Path;
use tracing::{info, warn};

/// Execute the `runlock run` command.
///
/// Signal capture is installed first so that no signal can end the process
/// between acquiring and releasing the lock.
pub fn cmd_run(config_path: Option<&Path>) -> Result<i32> {
    let shutdown = ShutdownSignal::install()?;
    let cwd = invocation_dir()?;
    let config = Config::resolve(config_path, &cwd)?;
    let runner = Runner::from_config(&config, &cwd)?;

    let result = runner.run(&shutdown);
    let exit_code = match &result {
        Ok(outcome) => outcome.exit_code(config.propagate_job_status),
        Err(err) => err.exit_code(),
    };

    if let Ok(outcome) = &result {
        log_outcome(outcome, exit_code);
    }

    if let Some(history_file) = &config.history_file {
        let record = run_record(&result, exit_code);
        if let Err(e) = history::append_record(&cwd.join(history_file), &record) {
            warn!(error = %e, "failed to append run history");
        }
    }

    result.map(|_| exit_code)
}

fn log_outcome(outcome: &RunOutcome, exit_code: i32) {
    match outcome {
        RunOutcome::Skipped { .. } => info!(exit_code, "run skipped"),
        RunOutcome::Cancelled { signal, .. } => {
            info!(signal = %signal, exit_code, "run cancelled before job start")
        }
        RunOutcome::Finished { job, .. } => {
            info!(success = job.is_success(), exit_code, "run finished")
        }
    }
}

/// Build the history record for a run result.
fn run_record(result: &Result<RunOutcome>, exit_code: i32) -> RunRecord {
    match result {
        Ok(RunOutcome::Skipped { held }) => {
            let details = match held {
                Some(lock) => json!({
                    "lock": lock.path.display().to_string(),
                    "held_since": lock.since.to_rfc3339(),
                }),
                None => json!({}),
            };
            RunRecord::new(RunKind::Skipped, exit_code).with_details(details)
        }
        Ok(RunOutcome::Cancelled { signal, release }) => {
            RunRecord::new(RunKind::Cancelled, exit_code).with_details(json!({
                "signal": signal.as_str(),
                "release_attempts": release_attempts(release),
            }))
        }
        Ok(RunOutcome::Finished { job, release }) => {
            let mut details = json!({
                "command": job.command,
                "duration_ms": job.duration.as_millis() as u64,
                "release_attempts": release_attempts(release),
            });
            let kind = match job.outcome {
                JobOutcome::Exited { code, success } => {
                    details["job_exit_code"] = code.map(Value::from).unwrap_or(Value::Null);
                    details["job_success"] = Value::from(success);
                    RunKind::Completed
                }
                JobOutcome::TimedOut => {
                    details["timed_out"] = Value::from(true);
                    RunKind::Completed
                }
                JobOutcome::Interrupted { signal, policy } => {
                    details["signal"] = Value::from(signal.as_str());
                    details["on_signal"] = Value::from(format!("{:?}", policy).to_lowercase());
                    RunKind::Interrupted
                }
            };
            RunRecord::new(kind, exit_code).with_details(details)
        }
        Err(err) => {
            let kind = match err {
                RunlockError::LockCreateFailed { .. } => RunKind::CreateFailed,
                RunlockError::LockReleaseFailed { .. } => RunKind::ReleaseFailed,
                RunlockError::JobSpawnFailed { .. } | RunlockError::UserError(_) => {
                    RunKind::JobFailed
                }
            };
            RunRecord::new(kind, exit_code).with_details(json!({ "error": err.to_string() }))
        }
    }
}

fn release_attempts(release: &ReleaseOutcome) -> u32 {
    match release {
        ReleaseOutcome::Released { attempts } => *attempts,
        ReleaseOutcome::NotHeld => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignalPolicy;
    use crate::exit_codes;
    use crate::job::JobResult;
    use nix::sys::signal::Signal;
    use std::path::PathBuf;
    use std::time::Duration;

    fn finished(outcome: JobOutcome) -> Result<RunOutcome> {
        Ok(RunOutcome::Finished {
            job: JobResult {
                outcome,
                duration: Duration::from_millis(1500),
                command: "node publish.js".to_string(),
            },
            release: ReleaseOutcome::Released { attempts: 2 },
        })
    }

    #[test]
    fn test_record_for_successful_job() {
        let result = finished(JobOutcome::Exited {
            code: Some(0),
            success: true,
        });
        let record = run_record(&result, exit_codes::SUCCESS);

        assert_eq!(record.kind, RunKind::Completed);
        assert_eq!(record.exit_code, 0);
        assert_eq!(record.details["job_exit_code"], 0);
        assert_eq!(record.details["release_attempts"], 2);
        assert_eq!(record.details["duration_ms"], 1500);
    }

    #[test]
    fn test_record_for_interrupted_job() {
        let result = finished(JobOutcome::Interrupted {
            signal: Signal::SIGTERM,
            policy: SignalPolicy::Detach,
        });
        let record = run_record(&result, 143);

        assert_eq!(record.kind, RunKind::Interrupted);
        assert_eq!(record.details["signal"], "SIGTERM");
        assert_eq!(record.details["on_signal"], "detach");
    }

    #[test]
    fn test_record_for_skipped_run() {
        let result = Ok(RunOutcome::Skipped { held: None });
        let record = run_record(&result, exit_codes::LOCK_HELD);

        assert_eq!(record.kind, RunKind::Skipped);
        assert_eq!(record.exit_code, exit_codes::LOCK_HELD);
    }

    #[test]
    fn test_record_for_release_failure() {
        let result = Err(RunlockError::LockReleaseFailed {
            path: PathBuf::from(".publish.lock"),
            attempts: 3,
            source: std::io::Error::other("busy"),
        });
        let record = run_record(&result, exit_codes::LOCK_RELEASE_FAILURE);

        assert_eq!(record.kind, RunKind::ReleaseFailed);
        assert!(
            record.details["error"]
                .as_str()
                .unwrap()
                .contains(".publish.lock")
        );
    }
}
