// src/proc/table.rs

//! Process-table query backend.
//!
//! The engine talks to a [`ProcessTable`] instead of running `ps` itself.
//! This makes it easy to swap in a scripted fake in tests while keeping the
//! production query here.
//!
//! The pattern is handed over as a plain value and matched in-process; no
//! shell command is ever composed from it, so it cannot be interpreted as
//! extra query syntax.

use std::future::Future;
use std::pin::Pin;

use tokio::process::Command;

use crate::errors::{ProcdogError, Result};

/// Trait abstracting the OS process-table query.
///
/// `query` returns raw text lines, one per process whose command line
/// contains `pattern`, each carrying pid, start timestamp, and full command
/// line. The querying process itself is excluded (self-match avoidance).
/// Lines that do not parse are the caller's problem to skip.
pub trait ProcessTable: Send + Sync {
    fn query(&self, pattern: &str)
    -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>>;
}

/// Real process table backed by `ps`.
///
/// Runs `ps -eo pid=,lstart=,args=` — the `=` suffixes suppress the header
/// line, so every output line is a process row.
#[derive(Debug, Clone)]
pub struct PsProcessTable {
    own_pid: u32,
}

impl PsProcessTable {
    pub fn new() -> Self {
        Self {
            own_pid: std::process::id(),
        }
    }
}

impl Default for PsProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for PsProcessTable {
    fn query(
        &self,
        pattern: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        // Clone the pattern so the future doesn't borrow it across `await`.
        let pattern = pattern.to_string();
        let own_pid = self.own_pid;

        Box::pin(async move {
            let output = Command::new("ps")
                .args(["-eo", "pid=,lstart=,args="])
                .output()
                .await
                .map_err(|e| ProcdogError::ProcessTable(format!("spawning ps: {e}")))?;

            if !output.status.success() {
                return Err(ProcdogError::ProcessTable(format!(
                    "ps exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(filter_raw_lines(stdout.lines(), &pattern, own_pid))
        })
    }
}

/// Keep the lines whose text contains `pattern`, excluding the row of the
/// querying process itself.
fn filter_raw_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
    pattern: &str,
    own_pid: u32,
) -> Vec<String> {
    let own_pid = own_pid.to_string();
    lines
        .filter(|line| line.contains(pattern))
        .filter(|line| line.trim_start().split_whitespace().next() != Some(own_pid.as_str()))
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_matching_lines_only() {
        let lines = [
            " 3061 Tue Feb 16 15:16:06 2021 /bin/ls",
            "19191 Tue Feb 16 15:00:05 2021 /usr/bin/python3 myscript.py",
            "19200 Tue Feb 16 15:00:05 2021 /usr/bin/vim notes.txt",
        ];

        let kept = filter_raw_lines(lines.into_iter(), "myscript.py", 1);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].contains("19191"));
    }

    #[test]
    fn filter_excludes_own_pid() {
        let lines = [
            "  500 Tue Feb 16 15:16:06 2021 procdog --config Procdog.toml myscript.py",
            "19191 Tue Feb 16 15:00:05 2021 /usr/bin/python3 myscript.py",
        ];

        let kept = filter_raw_lines(lines.into_iter(), "myscript.py", 500);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].contains("19191"));
    }

    #[tokio::test]
    async fn ps_query_with_unmatchable_pattern_is_empty_not_an_error() {
        let table = PsProcessTable::new();
        let lines = table
            .query("zz-no-such-process-will-ever-match-zz")
            .await
            .unwrap();
        assert!(lines.is_empty());
    }
}
