// src/proc/signal.rs

//! Signal delivery backend.
//!
//! Delivery is best-effort and asynchronous from the target's point of
//! view: a successful send says nothing about whether the process acted on
//! it. Confirmation is only ever obtained via the next snapshot.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::errors::{ProcdogError, Result};

/// The two signal classes the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// A termination request the target may intercept and act on (SIGTERM).
    Graceful,
    /// An unconditional termination the target cannot intercept (SIGKILL).
    Forceful,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Graceful => "SIGTERM",
            SignalKind::Forceful => "SIGKILL",
        }
    }
}

/// Trait abstracting signal delivery, so tests can record sends instead of
/// killing anything.
pub trait ProcessSignaller: Send + Sync {
    fn send(&self, pid: u32, kind: SignalKind) -> Result<()>;
}

/// Real signal delivery via `kill(2)`.
#[derive(Debug, Clone, Default)]
pub struct UnixSignaller;

impl ProcessSignaller for UnixSignaller {
    fn send(&self, pid: u32, kind: SignalKind) -> Result<()> {
        let signal = match kind {
            SignalKind::Graceful => Signal::SIGTERM,
            SignalKind::Forceful => Signal::SIGKILL,
        };

        kill(Pid::from_raw(pid as i32), signal).map_err(|e| ProcdogError::Signal {
            pid,
            reason: e.to_string(),
        })
    }
}
