//! Error types for the runlock CLI.
//!
//! Uses thiserror for derive macros. A lock held by another run is not an
//! error; it is the `Skipped` outcome of a run (see `runner`).

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for runlock operations.
#[derive(Error, Debug)]
pub enum RunlockError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The lock directory could not be created (permissions, missing parent, disk).
    #[error("failed to create lock '{}': {source}", .path.display())]
    LockCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lock directory could not be removed after all retries.
    #[error(
        "failed to release lock '{}' after {attempts} attempt(s): {source}; remove it manually",
        .path.display()
    )]
    LockReleaseFailed {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// The job process could not be started or waited on.
    #[error("job '{command}' failed to run: {reason}")]
    JobSpawnFailed { command: String, reason: String },
}

impl RunlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunlockError::UserError(_) => exit_codes::USER_ERROR,
            RunlockError::LockCreateFailed { .. } => exit_codes::LOCK_CREATE_FAILURE,
            RunlockError::LockReleaseFailed { .. } => exit_codes::LOCK_RELEASE_FAILURE,
            RunlockError::JobSpawnFailed { .. } => exit_codes::JOB_FAILURE,
        }
    }
}

/// Result type alias for runlock operations.
pub type Result<T> = std::result::Result<T, RunlockError>;
