// src/engine/evaluate.rs

//! Staleness evaluation: is a restart warranted?

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::engine::Watchdog;
use crate::errors::Result;
use crate::types::Decision;

impl Watchdog {
    /// Decide whether the watched process needs a restart.
    ///
    /// Cheap checks run first: a missing or unreadable heartbeat file is
    /// `DeadHeartbeat`, an over-age one `StaleHeartbeat` — both without
    /// touching the process table. Only a fresh heartbeat leads to a
    /// snapshot, against which dependency-file mtimes and the
    /// at-least-one-match requirement are checked.
    pub async fn evaluate(&self) -> Result<Decision> {
        let heartbeat = &self.config.heartbeat_file;

        let mtime = match self.fs.modified(heartbeat) {
            Ok(Some(mtime)) => Some(mtime),
            Ok(None) => {
                info!(file = %heartbeat.display(), "heartbeat file does not exist");
                None
            }
            Err(e) => {
                warn!(
                    file = %heartbeat.display(),
                    error = %e,
                    "heartbeat file mtime unreadable"
                );
                None
            }
        };
        let Some(mtime) = mtime else {
            return Ok(Decision::DeadHeartbeat);
        };

        let age = heartbeat_age(SystemTime::now(), mtime);
        debug!(
            file = %heartbeat.display(),
            age_secs = age.as_secs_f64(),
            "heartbeat last touched"
        );

        if is_stale(age, self.config.max_heartbeat_age) {
            info!(
                file = %heartbeat.display(),
                age_secs = age.as_secs_f64(),
                max_age_secs = self.config.max_heartbeat_age.as_secs_f64(),
                "heartbeat file is over the maximum age, restarting"
            );
            return Ok(Decision::StaleHeartbeat);
        }

        let snapshot = self.snapshot().await?;

        if !self.config.depends_on.is_empty() && !snapshot.is_empty() {
            debug!(
                files = ?self.config.depends_on,
                "checking dependency files for changes since process start"
            );
            for record in snapshot.records() {
                for dep in &self.config.depends_on {
                    match self.fs.modified(dep) {
                        Ok(Some(mtime)) => {
                            let modified: DateTime<Local> = mtime.into();
                            if modified > record.start_time {
                                info!(
                                    file = %dep.display(),
                                    pid = record.pid,
                                    "dependency file changed after process start, restarting"
                                );
                                return Ok(Decision::DependencyChanged);
                            }
                        }
                        Ok(None) => {
                            debug!(file = %dep.display(), "dependency file missing, skipping");
                        }
                        Err(e) => {
                            debug!(
                                file = %dep.display(),
                                error = %e,
                                "dependency file mtime unreadable, skipping"
                            );
                        }
                    }
                }
            }
        }

        if snapshot.is_empty() {
            info!(
                pattern = %self.config.pattern,
                "no running processes match pattern"
            );
            return Ok(Decision::NoMatchingProcess);
        }

        Ok(Decision::Healthy)
    }
}

/// Age of a heartbeat given its mtime. A modification time in the future is
/// clamped to zero — by itself it never makes the heartbeat stale.
pub(crate) fn heartbeat_age(now: SystemTime, mtime: SystemTime) -> Duration {
    now.duration_since(mtime).unwrap_or(Duration::ZERO)
}

/// Strict inequality: an age exactly equal to the maximum is still fresh.
pub(crate) fn is_stale(age: Duration, max_age: Duration) -> bool {
    age > max_age
}
