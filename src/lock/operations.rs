//! Lock acquisition and release operations.

use super::guard::LockGuard;
use super::info::LockInfo;
use crate::error::{Result, RunlockError};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

/// Bounded retry policy for lock release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePolicy {
    /// Total number of removal attempts, including the first.
    pub attempts: u32,

    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Result of an acquire attempt.
#[derive(Debug)]
pub enum Acquisition {
    /// This process now owns the lock.
    Acquired(LockGuard),

    /// Another run holds the lock. The info is `None` when the lock vanished
    /// between the failed create and the inspection.
    Held(Option<LockInfo>),
}

/// Result of a successful release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The lock directory was removed on the given attempt.
    Released { attempts: u32 },

    /// There was no lock to remove.
    NotHeld,
}

/// Try to take the lock by creating its directory.
///
/// Never blocks and never retries.
///
/// # Arguments
///
/// * `path` - Path of the lock directory; its parent must exist
/// * `policy` - Release policy carried by the returned guard
///
/// # Returns
///
/// * `Ok(Acquisition::Acquired)` - Lock created, owned by the guard
/// * `Ok(Acquisition::Held)` - The lock path already exists
/// * `Err(RunlockError::LockCreateFailed)` - Any other creation failure
pub fn try_acquire(path: &Path, policy: ReleasePolicy) -> Result<Acquisition> {
    match fs::create_dir(path) {
        Ok(()) => {
            info!(lock = %path.display(), "lock acquired");
            Ok(Acquisition::Acquired(LockGuard::new(
                path.to_path_buf(),
                policy,
            )))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let held = LockInfo::inspect(path).ok().flatten();
            match &held {
                Some(lock) => info!(
                    lock = %path.display(),
                    since = %lock.since.to_rfc3339(),
                    age = %lock.age_string(),
                    "lock held by another run, skipping"
                ),
                None => info!(lock = %path.display(), "lock held by another run, skipping"),
            }
            Ok(Acquisition::Held(held))
        }
        Err(e) => {
            error!(lock = %path.display(), error = %e, "failed to create lock");
            Err(RunlockError::LockCreateFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Release the lock at `path` without holding a guard.
///
/// Releasing a lock that does not exist is a no-op that reports
/// `ReleaseOutcome::NotHeld`.
pub fn release_lock(path: &Path, policy: ReleasePolicy) -> Result<ReleaseOutcome> {
    remove_with_retry(path, policy, |p| fs::remove_dir(p))
}

/// Remove the lock with bounded retry.
///
/// `remove` is the removal primitive, normally `fs::remove_dir`. A
/// `NotFound` on the first attempt means there was nothing to release; on a
/// later attempt it means the lock is gone and counts as released.
///
/// # Returns
///
/// * `Ok(ReleaseOutcome)` - Lock removed or not present
/// * `Err(RunlockError::LockReleaseFailed)` - Every attempt failed
pub fn remove_with_retry<F>(path: &Path, policy: ReleasePolicy, mut remove: F) -> Result<ReleaseOutcome>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let max_attempts = policy.attempts.max(1);
    let mut last_error = io::Error::other("no release attempt made");

    for attempt in 1..=max_attempts {
        match remove(path) {
            Ok(()) => {
                info!(lock = %path.display(), attempt, "lock released");
                return Ok(ReleaseOutcome::Released { attempts: attempt });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if attempt == 1 {
                    info!(lock = %path.display(), "no lock to release");
                    return Ok(ReleaseOutcome::NotHeld);
                }
                warn!(lock = %path.display(), attempt, "lock disappeared during release");
                return Ok(ReleaseOutcome::Released { attempts: attempt });
            }
            Err(e) => {
                warn!(
                    lock = %path.display(),
                    attempt,
                    max_attempts,
                    error = %e,
                    "release attempt {} of {} failed",
                    attempt,
                    max_attempts
                );
                last_error = e;
                if attempt < max_attempts {
                    std::thread::sleep(policy.delay);
                }
            }
        }
    }

    error!(
        lock = %path.display(),
        attempts = max_attempts,
        error = %last_error,
        "failed to release lock after {} attempts; remove it manually",
        max_attempts
    );
    Err(RunlockError::LockReleaseFailed {
        path: path.to_path_buf(),
        attempts: max_attempts,
        source: last_error,
    })
}
