//! Tests for config functionality.

use crate::config::{Config, DEFAULT_CONFIG_FILE, SignalPolicy};
use crate::error::RunlockError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.lock_dir, ".publish.lock");
    assert_eq!(config.release_attempts, 3);
    assert_eq!(config.release_retry_delay_ms, 1000);
    assert_eq!(config.lock_stale_minutes, 60);
    assert_eq!(config.job_command, "node publish.js");
    assert_eq!(config.job_dir, ".");
    assert!(config.job_env.is_empty());
    assert_eq!(config.job_timeout_secs, None);
    assert_eq!(config.on_signal, SignalPolicy::Terminate);
    assert_eq!(config.kill_grace_secs, 5);
    assert!(!config.propagate_job_status);
    assert_eq!(config.history_file, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.lock_dir, ".publish.lock");
    assert_eq!(config.release_attempts, 3);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
lock_dir: .sync.lock
job_command: "node sync.js --verbose"
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_dir, ".sync.lock");
    assert_eq!(config.job_args().unwrap(), vec!["node", "sync.js", "--verbose"]);

    // Unspecified values should use defaults
    assert_eq!(config.release_attempts, 3);
    assert_eq!(config.on_signal, SignalPolicy::Terminate);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
lock_dir: /var/lock/publish
release_attempts: 5
release_retry_delay_ms: 250
lock_stale_minutes: 15
job_command: "node 'publish all.js'"
job_dir: /srv/ghost
job_env:
  NODE_ENV: production
job_timeout_secs: 600
on_signal: detach
kill_grace_secs: 2
propagate_job_status: true
history_file: /var/log/runlock.ndjson
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_dir, "/var/lock/publish");
    assert_eq!(config.release_attempts, 5);
    assert_eq!(config.lock_stale_minutes, 15);
    assert_eq!(config.job_args().unwrap(), vec!["node", "publish all.js"]);
    assert_eq!(config.job_dir, "/srv/ghost");
    assert_eq!(
        config.job_env.get("NODE_ENV").map(String::as_str),
        Some("production")
    );
    assert_eq!(config.job_timeout_secs, Some(600));
    assert_eq!(config.on_signal, SignalPolicy::Detach);
    assert_eq!(config.kill_grace_secs, 2);
    assert!(config.propagate_job_status);
    assert_eq!(
        config.history_file,
        Some(PathBuf::from("/var/log/runlock.ndjson"))
    );

    let policy = config.release_policy();
    assert_eq!(policy.attempts, 5);
    assert_eq!(policy.delay, Duration::from_millis(250));
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
lock_dir: .x.lock
some_future_option: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.lock_dir, ".x.lock");
}

#[test]
fn test_zero_release_attempts_rejected() {
    let err = Config::from_yaml("release_attempts: 0").unwrap_err();
    assert!(matches!(err, RunlockError::UserError(_)));
    assert!(err.to_string().contains("release_attempts"));
}

#[test]
fn test_zero_stale_minutes_rejected() {
    let err = Config::from_yaml("lock_stale_minutes: 0").unwrap_err();
    assert!(err.to_string().contains("lock_stale_minutes"));
}

#[test]
fn test_empty_lock_dir_rejected() {
    let err = Config::from_yaml("lock_dir: ''").unwrap_err();
    assert!(err.to_string().contains("lock_dir"));
}

#[test]
fn test_empty_job_command_rejected() {
    let err = Config::from_yaml("job_command: '   '").unwrap_err();
    assert!(err.to_string().contains("job_command must not be empty"));
}

#[test]
fn test_unbalanced_quotes_rejected() {
    let err = Config::from_yaml("job_command: \"node 'oops\"").unwrap_err();
    assert!(err.to_string().contains("unmatched quotes"));
}

#[test]
fn test_unknown_signal_policy_rejected() {
    let err = Config::from_yaml("on_signal: ignore").unwrap_err();
    assert!(matches!(err, RunlockError::UserError(_)));
    assert_eq!(
        Config::from_yaml("on_signal: detach").unwrap().on_signal,
        SignalPolicy::Detach
    );
}

#[test]
fn test_full_config_parses_every_field() {
    let yaml = r#"
lock_dir: /var/lock/blog.lock
release_attempts: 5
release_retry_delay_ms: 250
lock_stale_minutes: 15
job_command: "node publish.js --all"
job_dir: site
job_env:
  NODE_ENV: production
job_timeout_secs: 30
on_signal: detach
kill_grace_secs: 2
propagate_job_status: true
history_file: runs.ndjson
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.release_attempts, 5);
    assert_eq!(config.job_args().unwrap(), vec!["node", "publish.js", "--all"]);
    assert_eq!(
        config.job_env.get("NODE_ENV").map(String::as_str),
        Some("production")
    );
    assert_eq!(config.job_timeout_secs, Some(30));
    assert_eq!(config.on_signal, SignalPolicy::Detach);
    assert_eq!(config.kill_grace_secs, 2);
    assert!(config.propagate_job_status);
    assert_eq!(config.history_file, Some(PathBuf::from("runs.ndjson")));
    assert_eq!(config.release_policy().delay, Duration::from_millis(250));
}

#[test]
fn test_resolve_uses_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::resolve(None, temp_dir.path()).unwrap();
    assert_eq!(config.lock_dir, ".publish.lock");
}

#[test]
fn test_resolve_picks_up_default_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(DEFAULT_CONFIG_FILE),
        "lock_dir: .from-file.lock\n",
    )
    .unwrap();

    let config = Config::resolve(None, temp_dir.path()).unwrap();
    assert_eq!(config.lock_dir, ".from-file.lock");
}

#[test]
fn test_resolve_missing_explicit_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.yaml");
    let err = Config::resolve(Some(&missing), temp_dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_paths_anchor_at_cwd() {
    let config = Config::default();
    let cwd = Path::new("/srv/blog");
    assert_eq!(config.lock_path(cwd), PathBuf::from("/srv/blog/.publish.lock"));
    assert_eq!(config.job_dir_path(cwd), PathBuf::from("/srv/blog/."));

    let absolute = Config {
        lock_dir: "/var/lock/publish".to_string(),
        ..Config::default()
    };
    assert_eq!(absolute.lock_path(cwd), PathBuf::from("/var/lock/publish"));
}
