//! RAII lock guard implementation.

use super::operations::{ReleaseOutcome, ReleasePolicy, remove_with_retry};
use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// RAII guard for an acquired lock directory.
///
/// When dropped, the lock directory is removed with the same bounded retry
/// as an explicit release. If that fails, an error is logged but no panic
/// occurs.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the lock directory.
    path: PathBuf,

    /// Retry policy used for every release path.
    policy: ReleasePolicy,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    /// Create a new lock guard for the given path.
    pub(super) fn new(path: PathBuf, policy: ReleasePolicy) -> Self {
        Self {
            path,
            policy,
            released: false,
        }
    }

    /// Get the path to the lock directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manually release the lock.
    ///
    /// Use this instead of dropping the guard when the release error must
    /// reach the caller.
    pub fn release(self) -> Result<ReleaseOutcome> {
        self.release_with(|p| fs::remove_dir(p))
    }

    /// Release the lock using a custom removal primitive.
    pub fn release_with<F>(mut self, remove: F) -> Result<ReleaseOutcome>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        self.released = true;
        remove_with_retry(&self.path, self.policy, remove)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // remove_with_retry already logs the failure loudly.
        let _ = remove_with_retry(&self.path, self.policy, |p| fs::remove_dir(p));
    }
}
