//! Lock directory subsystem for runlock.
//!
//! A run is serialized against overlapping runs by a single lock directory.
//!
//! # Lock Directory
//!
//! The lock is a directory created with plain `mkdir` semantics (never
//! `mkdir -p`). Directory creation is atomic and exclusive: among concurrent
//! creators exactly one succeeds, the others see `AlreadyExists`. The
//! directory has no content; only its existence matters. Its modification
//! time is reported as the lock age.
//!
//! # Acquire
//!
//! Acquisition never blocks and never retries. A held lock is a normal
//! outcome (`Acquisition::Held`), not an error.
//!
//! # Release
//!
//! Release removes the directory, retrying a bounded number of times with a
//! fixed delay. Releasing a lock that does not exist is a no-op. When every
//! attempt fails the release is fatal so the stale lock is visible.
//!
//! # RAII Guards
//!
//! An acquired lock is owned by a `LockGuard` that releases it when dropped.
//! Callers that need to surface release errors release explicitly.

mod guard;
mod info;
mod operations;


// Re-export public API
pub use guard::LockGuard;
pub use info::LockInfo;
pub use operations::{
    Acquisition, ReleaseOutcome, ReleasePolicy, release_lock, remove_with_retry, try_acquire,
};
