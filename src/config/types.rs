//! Configuration types and defaults for runlock.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "runlock.yaml";

/// What happens to an in-flight job when the runner receives a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// Send SIGTERM to the job, then SIGKILL after the grace period (default).
    #[default]
    Terminate,
    /// Leave the job running and only release the lock.
    Detach,
}

// Default value functions for serde
pub(super) fn default_lock_dir() -> String {
    ".publish.lock".to_string()
}
pub(super) fn default_job_command() -> String {
    "node publish.js".to_string()
}
pub(super) fn default_job_dir() -> String {
    ".".to_string()
}
pub(super) fn default_kill_grace_secs() -> u64 {
    5
}
pub(super) fn default_release_attempts() -> u32 {
    3
}
pub(super) fn default_release_retry_delay_ms() -> u64 {
    1000
}
pub(super) fn default_lock_stale_minutes() -> u32 {
    60
}
