//! Run history for runlock.
//!
//! When `history_file` is configured, every invocation appends one record in
//! NDJSON format (one JSON object per line). Operators use it to tell apart
//! runs that were skipped because of contention, runs whose job failed, and
//! runs that left a stale lock behind.
//!
//! # Record Format
//!
//! - `ts`: RFC3339 timestamp
//! - `kind`: completed, skipped, cancelled, interrupted, create_failed,
//!   release_failed, job_failed
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `pid`: The runner's process ID
//! - `exit_code`: The runner's exit code
//! - `details`: Freeform object with kind-specific details

use crate::error::{Result, RunlockError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Kinds of run that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// The job ran under the lock and the lock was released.
    Completed,
    /// Another run held the lock; the job did not run.
    Skipped,
    /// A signal arrived after the lock was taken but before the job started.
    Cancelled,
    /// A signal arrived while the job was running.
    Interrupted,
    /// The lock directory could not be created.
    CreateFailed,
    /// The lock directory could not be removed.
    ReleaseFailed,
    /// The job could not be started.
    JobFailed,
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunKind::Completed => write!(f, "completed"),
            RunKind::Skipped => write!(f, "skipped"),
            RunKind::Cancelled => write!(f, "cancelled"),
            RunKind::Interrupted => write!(f, "interrupted"),
            RunKind::CreateFailed => write!(f, "create_failed"),
            RunKind::ReleaseFailed => write!(f, "release_failed"),
            RunKind::JobFailed => write!(f, "job_failed"),
        }
    }
}

/// One line of run history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// RFC3339 timestamp when the run ended.
    pub ts: DateTime<Utc>,

    /// How the run ended.
    pub kind: RunKind,

    /// The actor who ran it (e.g., `user@HOST`).
    pub actor: String,

    /// Process ID of the runner.
    pub pid: u32,

    /// Exit code the runner returned.
    pub exit_code: i32,

    /// Freeform details object with kind-specific information.
    pub details: Value,
}

impl RunRecord {
    /// Create a new record with the current timestamp and actor.
    pub fn new(kind: RunKind, exit_code: i32) -> Self {
        Self {
            ts: Utc::now(),
            kind,
            actor: get_actor_string(),
            pid: std::process::id(),
            exit_code,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this record.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the record to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            RunlockError::UserError(format!("failed to serialize run record to JSON: {}", e))
        })
    }
}

/// Get the actor string for run records.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append a record to the history file.
///
/// The file and its parent directory are created if missing.
pub fn append_record(path: &Path, record: &RunRecord) -> Result<()> {
    let json_line = record.to_ndjson_line()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            RunlockError::UserError(format!(
                "failed to create history directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            RunlockError::UserError(format!(
                "failed to open history file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        RunlockError::UserError(format!(
            "failed to write run record to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read all records from the history file.
///
/// A missing file yields an empty list. Lines that fail to parse are skipped.
pub fn read_records(path: &Path) -> Result<Vec<RunRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RunlockError::UserError(format!(
                "failed to read history file '{}': {}",
                path.display(),
                e
            )));
        }
    };

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
