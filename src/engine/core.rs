// src/engine/core.rs

//! The `Watchdog` engine type and the top-level `watch` orchestration.

use std::sync::Arc;

use tracing::{debug, error, info, Instrument};

use crate::context::RunContext;
use crate::errors::{ProcdogError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::proc::{
    parse, Launcher, ProcessSignaller, ProcessTable, PsProcessTable, ShellLauncher, UnixSignaller,
};
use crate::types::{Snapshot, Timing, WatchConfig, WatchReport};

/// One-shot watchdog over a single watched target.
///
/// Owns the resolved configuration and handles to the four OS collaborators.
/// All state is per-invocation; nothing is carried across `watch` calls.
pub struct Watchdog {
    pub(crate) config: WatchConfig,
    pub(crate) timing: Timing,
    pub(crate) ctx: RunContext,
    pub(crate) table: Arc<dyn ProcessTable>,
    pub(crate) signaller: Arc<dyn ProcessSignaller>,
    pub(crate) launcher: Arc<dyn Launcher>,
    pub(crate) fs: Arc<dyn FileSystem>,
}

impl Watchdog {
    /// Build a watchdog wired to the real OS collaborators.
    pub fn new(config: WatchConfig, timing: Timing, ctx: RunContext) -> Self {
        Self {
            config,
            timing,
            ctx,
            table: Arc::new(PsProcessTable::new()),
            signaller: Arc::new(UnixSignaller),
            launcher: Arc::new(ShellLauncher),
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Swap in a different process-table backend (used by tests).
    pub fn with_process_table(mut self, table: Arc<dyn ProcessTable>) -> Self {
        self.table = table;
        self
    }

    /// Swap in a different signal backend (used by tests).
    pub fn with_signaller(mut self, signaller: Arc<dyn ProcessSignaller>) -> Self {
        self.signaller = signaller;
        self
    }

    /// Swap in a different launcher (used by tests).
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Swap in a different filesystem (used by tests).
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Perform one full watch pass.
    ///
    /// Linear state machine, no loops: evaluate, then — unless healthy —
    /// terminate and relaunch. The only error this returns for an unhealthy
    /// target is [`ProcdogError::TerminationFailed`]; everything else
    /// degrades to logged warnings and the pass continues.
    pub async fn watch(&self) -> Result<WatchReport> {
        let span = tracing::info_span!(
            "watch",
            host = %self.ctx.hostname,
            watchdog_pid = self.ctx.pid,
            pattern = %self.config.pattern,
        );

        async {
            debug!("watchdog starting");
            let result = self.run_pass().await;
            // Emitted on every exit path, including the fatal abort.
            debug!("watchdog exiting");
            result
        }
        .instrument(span)
        .await
    }

    async fn run_pass(&self) -> Result<WatchReport> {
        let decision = self.evaluate().await?;

        if !decision.needs_restart() {
            debug!("nothing to do");
            return Ok(WatchReport {
                decision,
                termination: None,
                launch: None,
            });
        }

        info!(?decision, "restart required");

        let termination = self.terminate().await?;
        if !termination.all_killed {
            let survivors = termination.survivors.pids();
            // Restarting over a still-alive old instance would run two
            // copies at once; a missed restart is the lesser failure.
            error!(
                ?survivors,
                "abandoning watch pass: processes survived forced termination"
            );
            return Err(ProcdogError::TerminationFailed { survivors });
        }

        let launch = self.launch().await?;

        Ok(WatchReport {
            decision,
            termination: Some(termination),
            launch: Some(launch),
        })
    }

    /// Take a fresh snapshot of processes matching the configured pattern.
    ///
    /// Queries the process table, parses the raw lines (dropping malformed
    /// ones with a warning), and applies the substring match against the
    /// command text.
    pub(crate) async fn snapshot(&self) -> Result<Snapshot> {
        let lines = self.table.query(&self.config.pattern).await?;
        let snapshot = parse::parse_records(&lines).filter_matching(&self.config.pattern);
        debug!(
            count = snapshot.len(),
            pids = ?snapshot.pids(),
            "process snapshot taken"
        );
        Ok(snapshot)
    }
}
