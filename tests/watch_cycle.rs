//! Full watch passes: evaluate → terminate → relaunch → verify.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use procdog::engine::Watchdog;
use procdog::fs::mock::MockFileSystem;
use procdog::proc::SignalKind;
use procdog::types::Decision;
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

#[tokio::test]
async fn stale_heartbeat_drives_a_full_restart_cycle() {
    let h = harness();
    // Heartbeat last touched 20s ago with a 15s maximum: stale.
    h.fs.touched_ago(HB, Duration::from_secs(20));
    // One matching process, pid 3061, started 20s ago.
    h.table
        .push_lines(vec![ps_line(3061, started_ago(20), CMD)]);
    // Gone after the graceful signal and grace period.
    h.table.push_lines(vec![]);
    // The replacement shows up in the verification snapshot.
    h.table
        .push_lines(vec![ps_line(4001, started_ago(0), CMD)]);

    let report = h.watchdog.watch().await.unwrap();

    assert_eq!(report.decision, Decision::StaleHeartbeat);

    let termination = report.termination.unwrap();
    assert!(termination.all_killed);
    assert!(termination.survivors.is_empty());
    assert_eq!(h.signaller.sent(), vec![(3061, SignalKind::Graceful)]);

    let launch = report.launch.unwrap();
    assert!(launch.started);
    assert_eq!(launch.matched.pids(), vec![4001]);
    assert_eq!(h.launcher.launched(), vec![CMD.to_string()]);
}

#[tokio::test]
async fn healthy_passes_are_idempotent() {
    let h = harness();
    h.fs.touch(HB);
    h.table
        .push_lines(vec![ps_line(3061, started_ago(60), CMD)]);
    h.table
        .push_lines(vec![ps_line(3061, started_ago(60), CMD)]);

    let first = h.watchdog.watch().await.unwrap();
    let second = h.watchdog.watch().await.unwrap();

    assert_eq!(first.decision, Decision::Healthy);
    assert_eq!(second.decision, Decision::Healthy);
    assert!(first.termination.is_none() && first.launch.is_none());
    assert!(second.termination.is_none() && second.launch.is_none());
    assert!(h.signaller.sent().is_empty());
    assert!(h.launcher.launched().is_empty());
    // One snapshot per pass, nothing else.
    assert_eq!(h.table.query_count(), 2);
}

#[tokio::test]
async fn dead_heartbeat_with_no_processes_still_relaunches() {
    let h = harness();
    // No heartbeat file at all; nothing running either.
    h.table.push_lines(vec![]); // terminate: nothing to do
    h.table
        .push_lines(vec![ps_line(4001, started_ago(0), CMD)]); // verification

    let report = h.watchdog.watch().await.unwrap();

    assert_eq!(report.decision, Decision::DeadHeartbeat);
    assert!(report.termination.unwrap().all_killed);
    assert!(report.launch.unwrap().started);
    assert!(h.signaller.sent().is_empty());
    assert_eq!(h.launcher.launched(), vec![CMD.to_string()]);
}

#[tokio::test]
async fn failed_launch_verification_is_a_warning_not_an_error() {
    let h = harness();
    h.fs.touched_ago(HB, Duration::from_secs(20));
    h.table.push_lines(vec![ps_line(3061, started_ago(20), CMD)]);
    h.table.push_lines(vec![]); // all dead after graceful
    h.table.push_lines(vec![]); // ...and nothing came back after launch

    let report = h.watchdog.watch().await.unwrap();

    let launch = report.launch.unwrap();
    assert!(!launch.started);
    assert!(launch.matched.is_empty());
    assert_eq!(h.launcher.launched(), vec![CMD.to_string()]);
}

#[tokio::test]
async fn spawn_failure_degrades_to_failed_verification() {
    let h = harness();
    h.launcher.fail_spawns();
    h.fs.touched_ago(HB, Duration::from_secs(20));
    h.table.push_lines(vec![ps_line(3061, started_ago(20), CMD)]);
    h.table.push_lines(vec![]);
    h.table.push_lines(vec![]);

    let report = h.watchdog.watch().await.unwrap();

    assert!(!report.launch.unwrap().started);
}

#[tokio::test]
async fn dependency_change_restarts_even_with_fresh_heartbeat() {
    let dep = "/opt/app/settings.yaml";
    let table = Arc::new(FakeProcessTable::new());
    let signaller = Arc::new(RecordingSignaller::new());
    let launcher = Arc::new(FakeLauncher::new());
    let fs = MockFileSystem::new();

    let mut config = watch_config(PATTERN, CMD, Path::new(HB));
    config.depends_on = vec![dep.into()];

    let watchdog = Watchdog::new(config, fast_timing(), test_context())
        .with_process_table(table.clone())
        .with_signaller(signaller.clone())
        .with_launcher(launcher.clone())
        .with_filesystem(Arc::new(fs.clone()));

    fs.touch(HB);
    fs.touch(dep); // newer than the process start below
    table.push_lines(vec![ps_line(3061, started_ago(60), CMD)]); // evaluate
    table.push_lines(vec![ps_line(3061, started_ago(60), CMD)]); // terminate
    table.push_lines(vec![]); // gone after graceful
    table.push_lines(vec![ps_line(4001, started_ago(0), CMD)]); // verification

    let report = watchdog.watch().await.unwrap();

    assert_eq!(report.decision, Decision::DependencyChanged);
    assert_eq!(signaller.sent(), vec![(3061, SignalKind::Graceful)]);
    assert!(report.launch.unwrap().started);
}
