//! Scripted fakes for the engine's OS collaborator traits.
//!
//! Tests push canned process-table outputs, then drive the engine and
//! assert on what was queried, signalled, and launched — no real processes
//! are ever touched.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use anyhow::anyhow;
use procdog::errors::{ProcdogError, Result};
use procdog::proc::{Launcher, ProcessSignaller, ProcessTable, SignalKind};

/// A fake process table that replays scripted raw-line outputs.
///
/// Each `query` pops the next scripted output (in push order) and records
/// the pattern it was asked for. Once the script is exhausted, further
/// queries see an empty table.
#[derive(Debug, Default)]
pub struct FakeProcessTable {
    outputs: Mutex<VecDeque<Vec<String>>>,
    queries: Mutex<Vec<String>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the raw lines returned by the next unanswered query.
    pub fn push_lines(&self, lines: Vec<String>) {
        self.outputs.lock().unwrap().push_back(lines);
    }

    /// Patterns queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl ProcessTable for FakeProcessTable {
    fn query(
        &self,
        pattern: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        self.queries.lock().unwrap().push(pattern.to_string());
        let lines = self.outputs.lock().unwrap().pop_front().unwrap_or_default();
        Box::pin(async move { Ok(lines) })
    }
}

/// A fake signaller that records every send in order.
#[derive(Debug, Default)]
pub struct RecordingSignaller {
    sent: Mutex<Vec<(u32, SignalKind)>>,
    fail_pids: Mutex<HashSet<u32>>,
}

impl RecordingSignaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `pid` fail (after being recorded).
    pub fn fail_for(&self, pid: u32) {
        self.fail_pids.lock().unwrap().insert(pid);
    }

    /// All `(pid, kind)` sends so far, in order.
    pub fn sent(&self) -> Vec<(u32, SignalKind)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ProcessSignaller for RecordingSignaller {
    fn send(&self, pid: u32, kind: SignalKind) -> Result<()> {
        self.sent.lock().unwrap().push((pid, kind));
        if self.fail_pids.lock().unwrap().contains(&pid) {
            return Err(ProcdogError::Signal {
                pid,
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

/// A fake launcher that records commands instead of spawning them.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    launched: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every launch fail (after being recorded).
    pub fn fail_spawns(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// Commands launched so far, in order.
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, command: &str) -> Result<()> {
        self.launched.lock().unwrap().push(command.to_string());
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("injected spawn failure").into());
        }
        Ok(())
    }
}
