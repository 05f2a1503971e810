//! Exit code constants for the runlock CLI.
//!
//! - 0: Success
//! - 1: Lock directory could not be created
//! - 2: Lock release failed after all retries
//! - 3: Skipped, another run holds the lock
//! - 4: Job failure (spawn error, or non-zero exit with status propagation on)
//! - 5: User error (bad args, invalid config)
//!
//! A run interrupted by a signal exits with `128 + signo`, after the lock
//! has been released.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// The lock directory could not be created for an environmental reason.
pub const LOCK_CREATE_FAILURE: i32 = 1;

/// The lock directory could not be removed; it is now stale.
pub const LOCK_RELEASE_FAILURE: i32 = 2;

/// Another invocation holds the lock; the job was not run.
pub const LOCK_HELD: i32 = 3;

/// The job could not be spawned, or failed with status propagation enabled.
pub const JOB_FAILURE: i32 = 4;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 5;

/// Base added to a signal number for the exit code of an interrupted run.
pub const SIGNAL_BASE: i32 = 128;
