//! Async-signal-safe capture of termination signals.
//!
//! The handler only stores the signal number in an atomic. The main loop
//! polls it, stops or detaches the job, and releases the lock through the
//! normal guarded path before the process exits.

use crate::error::{Result, RunlockError};
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

/// Last signal received (0 if none).
static SIGNAL_RECEIVED: AtomicI32 = AtomicI32::new(0);

/// Signals that interrupt a run.
pub const HANDLED_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGTERM, Signal::SIGHUP];

/// Source of "stop now" requests polled while the job runs.
pub trait Interrupt {
    /// The pending interrupt, if any.
    fn pending(&self) -> Option<Signal>;
}

/// Process-wide signal capture for SIGINT, SIGTERM and SIGHUP.
#[derive(Debug)]
pub struct ShutdownSignal {
    _installed: (),
}

impl ShutdownSignal {
    /// Install the handlers.
    ///
    /// Must be called before the lock is acquired so that no signal can
    /// terminate the process while it holds the lock.
    pub fn install() -> Result<Self> {
        let action = SigAction::new(
            SigHandler::Handler(record_signal),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        for sig in HANDLED_SIGNALS {
            // SAFETY: the handler only performs an atomic store.
            unsafe { signal::sigaction(sig, &action) }.map_err(|e| {
                RunlockError::UserError(format!("failed to install {} handler: {}", sig, e))
            })?;
        }

        debug!("signal handlers installed (SIGINT, SIGTERM, SIGHUP)");
        Ok(Self { _installed: () })
    }

    /// Clear the recorded signal.
    #[cfg(test)]
    pub fn reset(&self) {
        SIGNAL_RECEIVED.store(0, Ordering::SeqCst);
    }
}

impl Interrupt for ShutdownSignal {
    fn pending(&self) -> Option<Signal> {
        match SIGNAL_RECEIVED.load(Ordering::SeqCst) {
            0 => None,
            signo => Signal::try_from(signo).ok(),
        }
    }
}

extern "C" fn record_signal(signo: libc::c_int) {
    SIGNAL_RECEIVED.store(signo, Ordering::SeqCst);
}
