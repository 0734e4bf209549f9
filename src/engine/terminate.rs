// src/engine/terminate.rs

//! Two-phase termination: ask nicely, wait, then force.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::Watchdog;
use crate::errors::Result;
use crate::proc::SignalKind;
use crate::types::{Snapshot, TerminationOutcome};

impl Watchdog {
    /// Terminate every process matching the configured pattern.
    ///
    /// Protocol, in strict order and with no retries beyond the built-in
    /// escalation:
    ///
    /// 1. snapshot; nothing matches → done
    /// 2. graceful signal to every pid (per-pid failures logged, not fatal)
    /// 3. sleep `term_grace`
    /// 4. re-snapshot; empty → done
    /// 5. forceful signal to every survivor
    /// 6. sleep `kill_grace`
    /// 7. final re-snapshot; any records left means termination failed
    ///
    /// Exit confirmation comes exclusively from the re-snapshots — signal
    /// delivery has no observable result of its own.
    pub async fn terminate(&self) -> Result<TerminationOutcome> {
        let matched = self.snapshot().await?;
        if matched.is_empty() {
            debug!("no matching processes to terminate");
            return Ok(TerminationOutcome {
                all_killed: true,
                survivors: Snapshot::default(),
            });
        }

        for record in matched.records() {
            info!(pid = record.pid, "asking process to exit gracefully");
            self.send_signal(record.pid, SignalKind::Graceful);
        }
        sleep(self.timing.term_grace).await;

        let survivors = self.snapshot().await?;
        if survivors.is_empty() {
            return Ok(TerminationOutcome {
                all_killed: true,
                survivors,
            });
        }

        for record in survivors.records() {
            info!(pid = record.pid, "forcing process to exit");
            self.send_signal(record.pid, SignalKind::Forceful);
        }
        sleep(self.timing.kill_grace).await;

        let survivors = self.snapshot().await?;
        if survivors.is_empty() {
            return Ok(TerminationOutcome {
                all_killed: true,
                survivors,
            });
        }

        for record in survivors.records() {
            warn!(
                pid = record.pid,
                command = %record.command,
                "was unable to kill process"
            );
        }
        Ok(TerminationOutcome {
            all_killed: false,
            survivors,
        })
    }

    /// Best-effort send; a failure to signal one pid must not stop the
    /// others from being signalled.
    fn send_signal(&self, pid: u32, kind: SignalKind) {
        debug!(pid, signal = kind.as_str(), "sending signal");
        if let Err(e) = self.signaller.send(pid, kind) {
            warn!(pid, signal = kind.as_str(), error = %e, "failed to send signal");
        }
    }
}
