//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{Result, RunlockError};
use crate::lock::ReleasePolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the runlock.yaml file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(RunlockError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RunlockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config for an invocation.
    ///
    /// An explicit path must exist. Without one, `runlock.yaml` in `cwd` is
    /// used when present, otherwise the built-in defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let fallback = cwd.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load(&fallback);
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                RunlockError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_dir` must be non-empty
    /// - `release_attempts` must be positive
    /// - `lock_stale_minutes` must be positive
    /// - `job_command` must split into at least one word
    pub fn validate(&self) -> Result<()> {
        if self.lock_dir.trim().is_empty() {
            return Err(RunlockError::UserError(
                "config validation failed: lock_dir must not be empty".to_string(),
            ));
        }

        if self.release_attempts == 0 {
            return Err(RunlockError::UserError(
                "config validation failed: release_attempts must be greater than 0".to_string(),
            ));
        }

        if self.lock_stale_minutes == 0 {
            return Err(RunlockError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        self.job_args()?;
        Ok(())
    }

    /// Split `job_command` into program and arguments.
    pub fn job_args(&self) -> Result<Vec<String>> {
        let args = shell_words::split(&self.job_command).map_err(|e| {
            RunlockError::UserError(format!(
                "config validation failed: cannot parse job_command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.job_command, e
            ))
        })?;

        if args.is_empty() {
            return Err(RunlockError::UserError(
                "config validation failed: job_command must not be empty".to_string(),
            ));
        }

        Ok(args)
    }

    /// Absolute lock directory path, anchored at `cwd`.
    pub fn lock_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.lock_dir)
    }

    /// Absolute job working directory, anchored at `cwd`.
    pub fn job_dir_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.job_dir)
    }

    /// Retry policy for lock release.
    pub fn release_policy(&self) -> ReleasePolicy {
        ReleasePolicy {
            attempts: self.release_attempts,
            delay: Duration::from_millis(self.release_retry_delay_ms),
        }
    }
}
