//! Acquire-and-run orchestration.
//!
//! A run takes the lock, runs the job once, and releases the lock on every
//! path. Overlapping runs are dropped, never queued.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes;
use crate::job::{self, JobOutcome, JobResult, JobSpec};
use crate::lock::{self, Acquisition, LockInfo, ReleaseOutcome, ReleasePolicy};
use crate::signals::Interrupt;
use nix::sys::signal::Signal;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// How a run ended when no fatal error occurred.
#[derive(Debug)]
pub enum RunOutcome {
    /// Another run held the lock; the job did not run.
    Skipped { held: Option<LockInfo> },

    /// The job ran under the lock and the lock was released.
    Finished {
        job: JobResult,
        release: ReleaseOutcome,
    },

    /// A signal arrived after the lock was taken and before the job started.
    Cancelled {
        signal: Signal,
        release: ReleaseOutcome,
    },
}

impl RunOutcome {
    /// Exit code for this outcome.
    ///
    /// A failed or timed-out job maps to `JOB_FAILURE` only when
    /// `propagate_job_status` is set; otherwise the runner reports on lock
    /// handling alone.
    pub fn exit_code(&self, propagate_job_status: bool) -> i32 {
        match self {
            RunOutcome::Skipped { .. } => exit_codes::LOCK_HELD,
            RunOutcome::Cancelled { signal, .. } => signal_exit_code(*signal),
            RunOutcome::Finished { job, .. } => match job.outcome {
                JobOutcome::Interrupted { signal, .. } => signal_exit_code(signal),
                JobOutcome::Exited { success: true, .. } => exit_codes::SUCCESS,
                JobOutcome::Exited { .. } | JobOutcome::TimedOut => {
                    if propagate_job_status {
                        exit_codes::JOB_FAILURE
                    } else {
                        exit_codes::SUCCESS
                    }
                }
            },
        }
    }
}

fn signal_exit_code(signal: Signal) -> i32 {
    exit_codes::SIGNAL_BASE + signal as i32
}

/// Single-instance job runner.
#[derive(Debug, Clone)]
pub struct Runner {
    lock_path: PathBuf,
    policy: ReleasePolicy,
    job: JobSpec,
    remove_lock: fn(&Path) -> io::Result<()>,
}

fn remove_lock_dir(path: &Path) -> io::Result<()> {
    fs::remove_dir(path)
}

impl Runner {
    /// Create a runner for an explicit lock path and job.
    pub fn new(lock_path: PathBuf, policy: ReleasePolicy, job: JobSpec) -> Self {
        Self {
            lock_path,
            policy,
            job,
            remove_lock: remove_lock_dir,
        }
    }

    /// Create a runner from config, anchoring relative paths at `cwd`.
    pub fn from_config(config: &Config, cwd: &Path) -> Result<Self> {
        Ok(Self::new(
            config.lock_path(cwd),
            config.release_policy(),
            JobSpec::from_config(config, cwd)?,
        ))
    }

    /// Replace the lock removal primitive.
    #[cfg(test)]
    pub(crate) fn with_remover(mut self, remove: fn(&Path) -> io::Result<()>) -> Self {
        self.remove_lock = remove;
        self
    }

    /// Get the lock directory path.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Acquire the lock, run the job once, release the lock.
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - Skipped, finished, or cancelled before the job started
    /// * `Err(RunlockError::LockCreateFailed)` - The lock could not be created
    /// * `Err(RunlockError::JobSpawnFailed)` - The job could not start (lock released)
    /// * `Err(RunlockError::LockReleaseFailed)` - The lock is left behind
    pub fn run<I: Interrupt + ?Sized>(&self, interrupt: &I) -> Result<RunOutcome> {
        let guard = match lock::try_acquire(&self.lock_path, self.policy)? {
            Acquisition::Acquired(guard) => guard,
            Acquisition::Held(held) => return Ok(RunOutcome::Skipped { held }),
        };

        if let Some(signal) = interrupt.pending() {
            warn!(signal = %signal, "signal received before job start, not running job");
            let release = guard.release_with(self.remove_lock)?;
            return Ok(RunOutcome::Cancelled { signal, release });
        }

        let job = job::run_job(&self.job, interrupt);
        let release = guard.release_with(self.remove_lock);

        match (job, release) {
            (Ok(job), Ok(release)) => Ok(RunOutcome::Finished { job, release }),
            (Err(job_err), Ok(_)) => Err(job_err),
            (job, Err(release_err)) => {
                if let Err(job_err) = job {
                    error!(error = %job_err, "job failed before the lock release failure");
                }
                Err(release_err)
            }
        }
    }
}
