//! Job subprocess executor.
//!
//! Runs the configured job in its working directory while polling for
//! interrupts and the optional timeout. The runner's own working directory
//! is never changed; the child gets its directory through
//! `Command::current_dir`.

use crate::config::{Config, SignalPolicy};
use crate::error::{Result, RunlockError};
use crate::signals::Interrupt;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::collections::BTreeMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything needed to start the job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments after the program.
    pub args: Vec<String>,
    /// Working directory of the child.
    pub working_dir: PathBuf,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
    /// Kill the job after this long.
    pub timeout: Option<Duration>,
    /// What to do with the job when an interrupt arrives.
    pub on_signal: SignalPolicy,
    /// Time between SIGTERM and SIGKILL.
    pub kill_grace: Duration,
}

impl JobSpec {
    /// Build the job spec from config, resolving the job directory against `cwd`.
    pub fn from_config(config: &Config, cwd: &Path) -> Result<Self> {
        let mut args = config.job_args()?;
        let program = args.remove(0);

        Ok(Self {
            program,
            args,
            working_dir: config.job_dir_path(cwd),
            env: config.job_env.clone(),
            timeout: config.job_timeout_secs.map(Duration::from_secs),
            on_signal: config.on_signal,
            kill_grace: Duration::from_secs(config.kill_grace_secs),
        })
    }

    /// The command line, quoted for logs.
    pub fn command_line(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// How the job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job exited on its own. `code` is `None` when a signal killed it.
    Exited { code: Option<i32>, success: bool },
    /// The job hit its timeout and was terminated.
    TimedOut,
    /// The runner was interrupted; the job was terminated or detached per policy.
    Interrupted { signal: Signal, policy: SignalPolicy },
}

/// Result of running the job.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub outcome: JobOutcome,
    pub duration: Duration,
    /// The command that was executed (for logging).
    pub command: String,
}

impl JobResult {
    /// Check if the job ran to a successful exit.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Exited { success: true, .. })
    }
}

/// Run the job to completion, timeout, or interrupt.
///
/// # Returns
///
/// * `Ok(JobResult)` - The job started; the outcome says how it ended
/// * `Err(RunlockError::JobSpawnFailed)` - The job could not be started or polled
pub fn run_job<I: Interrupt + ?Sized>(spec: &JobSpec, interrupt: &I) -> Result<JobResult> {
    let command_line = spec.command_line();

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .current_dir(&spec.working_dir)
        .envs(&spec.env)
        .stdin(Stdio::null());

    let start_time = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        error!(command = %command_line, dir = %spec.working_dir.display(), error = %e, "failed to start job");
        RunlockError::JobSpawnFailed {
            command: command_line.clone(),
            reason: format!(
                "{} (working dir '{}')\nFix: ensure the program is installed and the directory exists.",
                e,
                spec.working_dir.display()
            ),
        }
    })?;

    info!(command = %command_line, pid = child.id(), "job started");

    let outcome = wait_for_job(&mut child, spec, interrupt, start_time).map_err(|e| {
        RunlockError::JobSpawnFailed {
            command: command_line.clone(),
            reason: format!("failed to check process status: {}", e),
        }
    })?;
    let duration = start_time.elapsed();

    match outcome {
        JobOutcome::Exited { code, success } => info!(
            command = %command_line,
            exit_code = ?code,
            success,
            duration_ms = duration.as_millis() as u64,
            "job exited"
        ),
        JobOutcome::TimedOut => warn!(
            command = %command_line,
            duration_ms = duration.as_millis() as u64,
            "job timed out and was terminated"
        ),
        JobOutcome::Interrupted { signal, policy } => warn!(
            command = %command_line,
            signal = %signal,
            policy = ?policy,
            "job interrupted"
        ),
    }

    Ok(JobResult {
        outcome,
        duration,
        command: command_line,
    })
}

/// Poll the child until it exits, times out, or an interrupt arrives.
fn wait_for_job<I: Interrupt + ?Sized>(
    child: &mut Child,
    spec: &JobSpec,
    interrupt: &I,
    start: Instant,
) -> std::io::Result<JobOutcome> {
    loop {
        if let Some(status) = child.try_wait()? {
            // A group-wide signal can end the job before the flag is polled.
            if let Some(signal) = interrupt.pending() {
                debug!(signal = %signal, status = %status, "job ended alongside interrupt");
                return Ok(JobOutcome::Interrupted {
                    signal,
                    policy: spec.on_signal,
                });
            }
            return Ok(exited(status));
        }

        if let Some(signal) = interrupt.pending() {
            match spec.on_signal {
                SignalPolicy::Terminate => terminate(child, spec.kill_grace)?,
                SignalPolicy::Detach => {
                    info!(pid = child.id(), "leaving job running after interrupt");
                }
            }
            return Ok(JobOutcome::Interrupted {
                signal,
                policy: spec.on_signal,
            });
        }

        if let Some(timeout) = spec.timeout
            && start.elapsed() >= timeout
        {
            terminate(child, spec.kill_grace)?;
            return Ok(JobOutcome::TimedOut);
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

fn exited(status: ExitStatus) -> JobOutcome {
    if let Some(sig) = status.signal() {
        debug!(signal = sig, "job killed by signal");
    }
    JobOutcome::Exited {
        code: status.code(),
        success: status.success(),
    }
}

/// Send SIGTERM, wait up to `grace`, then SIGKILL and reap.
fn terminate(child: &mut Child, grace: Duration) -> std::io::Result<()> {
    let pid = Pid::from_raw(child.id() as i32);
    if let Err(e) = kill(pid, Signal::SIGTERM) {
        debug!(pid = child.id(), error = %e, "SIGTERM delivery failed");
    }

    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    warn!(pid = child.id(), "job ignored SIGTERM, killing");
    // On Unix this is SIGKILL.
    if let Err(e) = child.kill() {
        debug!(pid = child.id(), error = %e, "SIGKILL delivery failed");
    }
    child.wait()?;
    Ok(())
}
