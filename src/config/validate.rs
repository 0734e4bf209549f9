// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{parse_duration, ConfigFile};
use crate::errors::{ProcdogError, Result};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - `pattern` and `restart_cmd` are non-empty
/// - `heartbeat_file` is a non-empty path
/// - `max_heartbeat_age` parses and is strictly positive
/// - all `[timing]` durations parse, and the two grace periods are positive
///
/// It does **not** check that the pattern actually matches anything, or that
/// the restart command is runnable; both are only observable at watch time.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_watch_target(cfg)?;
    ensure_heartbeat(cfg)?;
    ensure_timing(cfg)?;
    Ok(())
}

fn ensure_watch_target(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.pattern.trim().is_empty() {
        return Err(ProcdogError::Config(
            "[watch].pattern must not be empty".to_string(),
        ));
    }
    if cfg.watch.restart_cmd.trim().is_empty() {
        return Err(ProcdogError::Config(
            "[watch].restart_cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_heartbeat(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.heartbeat_file.as_os_str().is_empty() {
        return Err(ProcdogError::Config(
            "[watch].heartbeat_file must not be empty".to_string(),
        ));
    }

    let age = parse_duration(&cfg.watch.max_heartbeat_age)
        .map_err(|e| ProcdogError::Config(format!("[watch].max_heartbeat_age: {e}")))?;
    if age == Duration::ZERO {
        return Err(ProcdogError::Config(
            "[watch].max_heartbeat_age must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn ensure_timing(cfg: &ConfigFile) -> Result<()> {
    let term_grace = parse_duration(&cfg.timing.term_grace)
        .map_err(|e| ProcdogError::Config(format!("[timing].term_grace: {e}")))?;
    let kill_grace = parse_duration(&cfg.timing.kill_grace)
        .map_err(|e| ProcdogError::Config(format!("[timing].kill_grace: {e}")))?;
    parse_duration(&cfg.timing.launch_settle)
        .map_err(|e| ProcdogError::Config(format!("[timing].launch_settle: {e}")))?;

    // A zero grace period gives the target no window at all to shut down and
    // makes the escalation pointless.
    if term_grace == Duration::ZERO || kill_grace == Duration::ZERO {
        return Err(ProcdogError::Config(
            "[timing] grace periods must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
