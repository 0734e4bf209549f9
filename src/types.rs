// src/types.rs

//! Core data types shared across the engine.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

/// One process as seen in a point-in-time process-table snapshot.
///
/// Immutable once constructed; a record only lives as long as the
/// [`Snapshot`] it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    /// OS process id.
    pub pid: u32,
    /// When the process was started, as reported by the process table.
    pub start_time: DateTime<Local>,
    /// Full command line, including arguments.
    pub command: String,
}

/// A point-in-time read of matching OS processes.
///
/// Records preserve the order of the raw process-table output. Two snapshots
/// are never merged; every decision point takes a fresh one because process
/// state changes between steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<ProcessRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.pid).collect()
    }

    /// Sub-filter: keep only records whose command line contains `pattern`.
    ///
    /// Matching is case-sensitive substring containment against the full
    /// command line, no anchoring. Choosing a pattern specific enough not to
    /// also match unrelated processes (or the restart command's shell) is
    /// the caller's responsibility.
    pub fn filter_matching(&self, pattern: &str) -> Snapshot {
        Snapshot {
            records: self
                .records
                .iter()
                .filter(|r| r.command.contains(pattern))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<ProcessRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ProcessRecord>>(iter: I) -> Self {
        Snapshot {
            records: iter.into_iter().collect(),
        }
    }
}

/// Outcome of one liveness evaluation.
///
/// Anything other than `Healthy` means the watched process should be
/// terminated and relaunched. Decisions are transient per invocation and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Heartbeat fresh, no dependency changed, at least one process matches.
    Healthy,
    /// The heartbeat file does not exist or its mtime cannot be read.
    DeadHeartbeat,
    /// The heartbeat file is older than the configured maximum age.
    StaleHeartbeat,
    /// A dependency file was modified after a matched process started.
    DependencyChanged,
    /// Heartbeat fresh but no process matches the pattern.
    NoMatchingProcess,
}

impl Decision {
    /// Whether this decision requires the terminate + relaunch path.
    pub fn needs_restart(self) -> bool {
        !matches!(self, Decision::Healthy)
    }
}

/// Result of the two-phase termination protocol.
#[derive(Debug, Clone)]
pub struct TerminationOutcome {
    /// True when the final snapshot contained no matching processes.
    pub all_killed: bool,
    /// Processes still alive after both signal phases (empty on success).
    pub survivors: Snapshot,
}

/// Result of the detached relaunch attempt.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    /// True when the verification snapshot contained at least one match.
    pub started: bool,
    /// The verification snapshot taken after the settle period.
    pub matched: Snapshot,
}

/// Everything one `watch` pass did, for the caller's benefit.
#[derive(Debug, Clone)]
pub struct WatchReport {
    pub decision: Decision,
    /// `None` when the decision was `Healthy`.
    pub termination: Option<TerminationOutcome>,
    /// `None` when no restart was attempted.
    pub launch: Option<LaunchOutcome>,
}

/// Resolved watch target configuration consumed by the engine.
///
/// Invariants (enforced by `config::validate`): `pattern` and `restart_cmd`
/// are non-empty, `max_heartbeat_age` is positive.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Shell command used to launch a replacement process.
    pub restart_cmd: String,
    /// Substring used to find the target in the process table. Must not also
    /// match the watchdog's own invocation.
    pub pattern: String,
    /// File the watched process is expected to touch periodically.
    pub heartbeat_file: PathBuf,
    /// Worst-case interval at which the heartbeat file should be touched.
    pub max_heartbeat_age: Duration,
    /// Files whose modification after process start forces a restart.
    /// Order is irrelevant.
    pub depends_on: Vec<PathBuf>,
}

/// Tunable pauses between the engine's phases.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Window given to processes to exit after the graceful signal.
    pub term_grace: Duration,
    /// Window given to processes to disappear after the forceful signal.
    pub kill_grace: Duration,
    /// Wait before verifying that the relaunched process is visible.
    pub launch_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            term_grace: Duration::from_secs(2),
            kill_grace: Duration::from_secs(2),
            launch_settle: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(pid: u32, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            start_time: Local.with_ymd_and_hms(2021, 2, 16, 15, 16, 6).unwrap(),
            command: command.to_string(),
        }
    }

    #[test]
    fn filter_matching_is_case_sensitive_substring() {
        let snapshot = Snapshot::new(vec![
            record(1, "/usr/bin/python3 myscript.py"),
            record(2, "/usr/bin/python3 MYSCRIPT.py"),
            record(3, "/bin/ls"),
        ]);

        let matched = snapshot.filter_matching("myscript.py");
        assert_eq!(matched.pids(), vec![1]);
    }

    #[test]
    fn filter_matching_preserves_order() {
        let snapshot = Snapshot::new(vec![
            record(9, "worker --id 9"),
            record(3, "worker --id 3"),
            record(7, "other"),
        ]);

        assert_eq!(snapshot.filter_matching("worker").pids(), vec![9, 3]);
    }

    #[test]
    fn healthy_is_the_only_decision_without_restart() {
        assert!(!Decision::Healthy.needs_restart());
        for d in [
            Decision::DeadHeartbeat,
            Decision::StaleHeartbeat,
            Decision::DependencyChanged,
            Decision::NoMatchingProcess,
        ] {
            assert!(d.needs_restart());
        }
    }
}
