// src/engine/restart.rs

//! Detached relaunch and verification.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::engine::Watchdog;
use crate::errors::Result;
use crate::types::LaunchOutcome;

impl Watchdog {
    /// Start the replacement process and verify it became visible.
    ///
    /// The command is spawned detached — the watchdog never waits for it to
    /// exit. After the settle period, a fresh snapshot with the original
    /// pattern decides `started`. A negative verification is a warning, not
    /// an error: the next scheduled invocation will see `NoMatchingProcess`
    /// and retry naturally.
    pub async fn launch(&self) -> Result<LaunchOutcome> {
        info!(cmd = %self.config.restart_cmd, "starting a new process");
        if let Err(e) = self.launcher.launch(&self.config.restart_cmd) {
            warn!(cmd = %self.config.restart_cmd, error = %e, "failed to spawn replacement process");
        }

        sleep(self.timing.launch_settle).await;

        let matched = self.snapshot().await?;
        let started = !matched.is_empty();

        info!(
            count = matched.len(),
            pids = ?matched.pids(),
            pattern = %self.config.pattern,
            "processes matching pattern after launch"
        );
        if !started {
            warn!(
                pattern = %self.config.pattern,
                "no processes restarted - none match pattern"
            );
        }

        Ok(LaunchOutcome { started, matched })
    }
}
