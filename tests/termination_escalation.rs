//! Two-phase termination: escalation order, short-circuits, and the
//! fatal-on-survivors rule.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use procdog::engine::Watchdog;
use procdog::errors::ProcdogError;
use procdog::fs::mock::MockFileSystem;
use procdog::proc::SignalKind;
use procdog_test_utils::builders::{
    fast_timing, ps_line, started_ago, test_context, watch_config,
};
use procdog_test_utils::fakes::{FakeLauncher, FakeProcessTable, RecordingSignaller};
use procdog_test_utils::init_tracing;

const HB: &str = "/tmp/hb";
const PATTERN: &str = "myscript.py";
const CMD: &str = "python3 myscript.py";

struct Harness {
    table: Arc<FakeProcessTable>,
    signaller: Arc<RecordingSignaller>,
    launcher: Arc<FakeLauncher>,
    fs: MockFileSystem,
    watchdog: Watchdog,
}

fn harness() -> Harness {
    init_tracing();

    let table = Arc::new(FakeProcessTable::new());
    let signaller = Arc::new(RecordingSignaller::new());
    let launcher = Arc::new(FakeLauncher::new());
    let fs = MockFileSystem::new();

    let watchdog = Watchdog::new(
        watch_config(PATTERN, CMD, Path::new(HB)),
        fast_timing(),
        test_context(),
    )
    .with_process_table(table.clone())
    .with_signaller(signaller.clone())
    .with_launcher(launcher.clone())
    .with_filesystem(Arc::new(fs.clone()));

    Harness {
        table,
        signaller,
        launcher,
        fs,
        watchdog,
    }
}

fn line(pid: u32) -> String {
    ps_line(pid, started_ago(60), CMD)
}

#[tokio::test]
async fn graceful_signals_precede_any_forceful_signal() {
    let h = harness();
    h.table.push_lines(vec![line(101), line(102)]);
    h.table.push_lines(vec![line(102)]); // 101 exited during the grace period
    h.table.push_lines(vec![]);

    let outcome = h.watchdog.terminate().await.unwrap();

    assert!(outcome.all_killed);
    assert!(outcome.survivors.is_empty());
    // Every graceful send happens before any forceful send, and the
    // forceful one only goes to the pid still present in the re-snapshot.
    assert_eq!(
        h.signaller.sent(),
        vec![
            (101, SignalKind::Graceful),
            (102, SignalKind::Graceful),
            (102, SignalKind::Forceful),
        ]
    );
    assert_eq!(h.table.query_count(), 3);
}

#[tokio::test]
async fn all_exited_after_grace_skips_force_phase() {
    let h = harness();
    h.table.push_lines(vec![line(101)]);
    h.table.push_lines(vec![]);

    let outcome = h.watchdog.terminate().await.unwrap();

    assert!(outcome.all_killed);
    assert_eq!(h.signaller.sent(), vec![(101, SignalKind::Graceful)]);
    assert_eq!(h.table.query_count(), 2);
}

#[tokio::test]
async fn nothing_matching_returns_immediately() {
    let h = harness();
    h.table.push_lines(vec![]);

    let outcome = h.watchdog.terminate().await.unwrap();

    assert!(outcome.all_killed);
    assert!(h.signaller.sent().is_empty());
    assert_eq!(h.table.query_count(), 1);
}

#[tokio::test]
async fn survivors_after_force_phase_fail_the_termination() {
    let h = harness();
    h.table.push_lines(vec![line(101)]);
    h.table.push_lines(vec![line(101)]);
    h.table.push_lines(vec![line(101)]);

    let outcome = h.watchdog.terminate().await.unwrap();

    assert!(!outcome.all_killed);
    assert_eq!(outcome.survivors.pids(), vec![101]);
    assert_eq!(
        h.signaller.sent(),
        vec![(101, SignalKind::Graceful), (101, SignalKind::Forceful)]
    );
}

#[tokio::test]
async fn failing_to_signal_one_pid_does_not_stop_the_rest() {
    let h = harness();
    h.signaller.fail_for(101);
    h.table.push_lines(vec![line(101), line(102)]);
    h.table.push_lines(vec![]);

    let outcome = h.watchdog.terminate().await.unwrap();

    assert!(outcome.all_killed);
    assert_eq!(
        h.signaller.sent(),
        vec![(101, SignalKind::Graceful), (102, SignalKind::Graceful)]
    );
}

#[tokio::test]
async fn watch_never_launches_over_survivors() {
    let h = harness();
    h.fs.touched_ago(HB, Duration::from_secs(20)); // stale → restart path
    h.table.push_lines(vec![line(101)]);
    h.table.push_lines(vec![line(101)]);
    h.table.push_lines(vec![line(101)]);

    let err = h.watchdog.watch().await.unwrap_err();

    match err {
        ProcdogError::TerminationFailed { survivors } => {
            assert_eq!(survivors, vec![101]);
        }
        other => panic!("expected TerminationFailed, got {other:?}"),
    }
    assert!(h.launcher.launched().is_empty());
}
