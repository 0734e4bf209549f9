// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{ProcdogError, Result};
use crate::types::{Timing, WatchConfig};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// restart_cmd = "python3 /opt/app/myscript.py"
/// pattern = "myscript.py"
/// heartbeat_file = "/tmp/myscript.watchdog"
/// max_heartbeat_age = "15s"
/// depends_on = ["/opt/app/myscript.py", "/opt/app/settings.yaml"]
///
/// [timing]
/// term_grace = "2s"
/// kill_grace = "2s"
/// launch_settle = "1s"
/// ```
///
/// The `[timing]` section is optional and defaults to 2s / 2s / 1s.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// The watched target from `[watch]`.
    pub watch: WatchSection,

    /// Phase pauses from `[timing]`.
    #[serde(default)]
    pub timing: TimingSection,
}

/// `[watch]` section: the five fields that make up the external contract.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Shell command that (re)starts the watched process.
    pub restart_cmd: String,

    /// Substring used to find the watched process in the process table.
    ///
    /// Pick something specific enough not to also match unrelated processes
    /// or this watchdog's own command line.
    pub pattern: String,

    /// File the watched process touches periodically.
    pub heartbeat_file: PathBuf,

    /// Worst-case interval at which `heartbeat_file` should be touched,
    /// as a duration string (e.g. `"15s"`, `"2m"`).
    pub max_heartbeat_age: String,

    /// Files whose modification after process start forces a restart.
    #[serde(default)]
    pub depends_on: Vec<PathBuf>,
}

/// `[timing]` section.
///
/// All values are duration strings; see [`parse_duration`] for the accepted
/// formats.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingSection {
    /// Pause between the graceful signal and the first re-check.
    #[serde(default = "default_term_grace")]
    pub term_grace: String,

    /// Pause between the forceful signal and the final re-check.
    #[serde(default = "default_kill_grace")]
    pub kill_grace: String,

    /// Pause between relaunching and verifying the replacement is visible.
    #[serde(default = "default_launch_settle")]
    pub launch_settle: String,
}

fn default_term_grace() -> String {
    "2s".to_string()
}

fn default_kill_grace() -> String {
    "2s".to_string()
}

fn default_launch_settle() -> String {
    "1s".to_string()
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            term_grace: default_term_grace(),
            kill_grace: default_kill_grace(),
            launch_settle: default_launch_settle(),
        }
    }
}

impl ConfigFile {
    /// Resolve the raw (string-typed) config into the typed values the
    /// engine consumes.
    ///
    /// Assumes [`validate_config`](crate::config::validate_config) has
    /// already passed; duration parse failures still surface as
    /// configuration errors here rather than panics.
    pub fn resolve(&self) -> Result<(WatchConfig, Timing)> {
        let watch = WatchConfig {
            restart_cmd: self.watch.restart_cmd.clone(),
            pattern: self.watch.pattern.clone(),
            heartbeat_file: self.watch.heartbeat_file.clone(),
            max_heartbeat_age: parse_duration(&self.watch.max_heartbeat_age)
                .map_err(|e| ProcdogError::Config(format!("[watch].max_heartbeat_age: {e}")))?,
            depends_on: self.watch.depends_on.clone(),
        };

        let timing = Timing {
            term_grace: parse_duration(&self.timing.term_grace)
                .map_err(|e| ProcdogError::Config(format!("[timing].term_grace: {e}")))?,
            kill_grace: parse_duration(&self.timing.kill_grace)
                .map_err(|e| ProcdogError::Config(format!("[timing].kill_grace: {e}")))?,
            launch_settle: parse_duration(&self.timing.launch_settle)
                .map_err(|e| ProcdogError::Config(format!("[timing].launch_settle: {e}")))?,
        };

        Ok((watch, timing))
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
///
/// Intentionally minimal; extend if more formats are ever needed.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
