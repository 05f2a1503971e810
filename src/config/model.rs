//! Config struct definition and default implementation.

use super::types::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for a runlock job.
///
/// This struct represents the contents of `runlock.yaml`. When no file is
/// present the built-in defaults describe the publishing job.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Lock directory, relative to the working directory at invocation.
    #[serde(default = "default_lock_dir")]
    pub lock_dir: String,

    /// Number of removal attempts before a release is declared failed.
    #[serde(default = "default_release_attempts")]
    pub release_attempts: u32,

    /// Fixed delay between release attempts.
    #[serde(default = "default_release_retry_delay_ms")]
    pub release_retry_delay_ms: u64,

    /// Minutes after which `status` reports a held lock as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    // =========================================================================
    // Job settings
    // =========================================================================
    /// Job command line, split with shell-words (no shell is involved).
    #[serde(default = "default_job_command")]
    pub job_command: String,

    /// Working directory of the job.
    #[serde(default = "default_job_dir")]
    pub job_dir: String,

    /// Extra environment variables for the job.
    #[serde(default)]
    pub job_env: BTreeMap<String, String>,

    /// Kill the job after this many seconds (no timeout when unset).
    #[serde(default)]
    pub job_timeout_secs: Option<u64>,

    /// What to do with the job when the runner receives a signal.
    #[serde(default)]
    pub on_signal: SignalPolicy,

    /// Seconds between SIGTERM and SIGKILL when terminating the job.
    #[serde(default = "default_kill_grace_secs")]
    pub kill_grace_secs: u64,

    /// Map a failing job to a non-zero runner exit code.
    #[serde(default)]
    pub propagate_job_status: bool,

    // =========================================================================
    // History settings
    // =========================================================================
    /// NDJSON file receiving one record per invocation.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_dir: default_lock_dir(),
            release_attempts: default_release_attempts(),
            release_retry_delay_ms: default_release_retry_delay_ms(),
            lock_stale_minutes: default_lock_stale_minutes(),
            job_command: default_job_command(),
            job_dir: default_job_dir(),
            job_env: BTreeMap::new(),
            job_timeout_secs: None,
            on_signal: SignalPolicy::default(),
            kill_grace_secs: default_kill_grace_secs(),
            propagate_job_status: false,
            history_file: None,
        }
    }
}
