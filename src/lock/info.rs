//! Inspection of an existing lock directory.

use crate::error::{Result, RunlockError};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Information about a lock directory found on disk.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// The lock directory path.
    pub path: PathBuf,

    /// Last modification time of the directory, which is its creation time
    /// for an untouched lock.
    pub since: DateTime<Utc>,
}

impl LockInfo {
    /// Inspect the lock at `path`.
    ///
    /// Returns `Ok(None)` when no lock exists.
    pub fn inspect(path: &Path) -> Result<Option<Self>> {
        match fs::metadata(path) {
            Ok(meta) => {
                let since = meta
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                Ok(Some(Self {
                    path: path.to_path_buf(),
                    since,
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RunlockError::UserError(format!(
                "failed to inspect lock '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Calculate the age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.since)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Check if the lock is stale based on the given threshold in minutes.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > stale_minutes as i64
    }
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (held since {}, age: {})",
            self.path.display(),
            self.since.to_rfc3339(),
            self.age_string()
        )
    }
}
