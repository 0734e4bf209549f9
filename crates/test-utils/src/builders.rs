#![allow(dead_code)]

//! Builders for raw process-table lines and engine configuration.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use procdog::context::RunContext;
use procdog::types::{Timing, WatchConfig};

/// Format one raw process-table line the way `ps -eo pid=,lstart=,args=`
/// prints it: right-aligned pid, `lstart` timestamp, full command line.
pub fn ps_line(pid: u32, start: DateTime<Local>, command: &str) -> String {
    format!("{:>5} {} {}", pid, start.format("%a %b %e %H:%M:%S %Y"), command)
}

/// A start time `seconds` in the past.
pub fn started_ago(seconds: i64) -> DateTime<Local> {
    Local::now() - chrono::Duration::seconds(seconds)
}

/// A minimal valid [`WatchConfig`] for tests.
pub fn watch_config(pattern: &str, restart_cmd: &str, heartbeat_file: &Path) -> WatchConfig {
    WatchConfig {
        restart_cmd: restart_cmd.to_string(),
        pattern: pattern.to_string(),
        heartbeat_file: heartbeat_file.to_path_buf(),
        max_heartbeat_age: Duration::from_secs(15),
        depends_on: vec![],
    }
}

/// Short pauses so a full watch pass finishes quickly under test.
pub fn fast_timing() -> Timing {
    Timing {
        term_grace: Duration::from_millis(10),
        kill_grace: Duration::from_millis(10),
        launch_settle: Duration::from_millis(10),
    }
}

/// A fixed run context so assertions don't depend on the host.
pub fn test_context() -> RunContext {
    RunContext {
        hostname: "testhost".to_string(),
        pid: 1,
    }
}
