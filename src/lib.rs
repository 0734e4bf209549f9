// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod proc;
pub mod types;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::context::RunContext;
use crate::engine::Watchdog;
use crate::errors::Result;
use crate::types::{Timing, WatchConfig};

pub use crate::types::{Decision, LaunchOutcome, TerminationOutcome, WatchReport};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + validation
/// - run-context capture
/// - the watchdog engine with its real OS collaborators
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let (watch_cfg, timing) = cfg.resolve()?;

    if args.dry_run {
        print_dry_run(&watch_cfg, &timing);
        return Ok(());
    }

    let ctx = RunContext::capture();
    let watchdog = Watchdog::new(watch_cfg, timing, ctx);

    if args.check {
        let decision = watchdog.evaluate().await?;
        info!(?decision, "check-only evaluation complete");
        println!("{decision:?}");
        return Ok(());
    }

    let report = watchdog.watch().await?;
    match &report.launch {
        Some(launch) => info!(
            decision = ?report.decision,
            started = launch.started,
            pids = ?launch.matched.pids(),
            "watch pass complete"
        ),
        None => info!(decision = ?report.decision, "watch pass complete"),
    }

    Ok(())
}

/// Simple dry-run output: print the resolved target and timing.
fn print_dry_run(cfg: &WatchConfig, timing: &Timing) {
    println!("procdog dry-run");
    println!("  restart_cmd: {}", cfg.restart_cmd);
    println!("  pattern: {}", cfg.pattern);
    println!("  heartbeat_file: {}", cfg.heartbeat_file.display());
    println!("  max_heartbeat_age: {:?}", cfg.max_heartbeat_age);
    if !cfg.depends_on.is_empty() {
        println!("  depends_on:");
        for dep in &cfg.depends_on {
            println!("    - {}", dep.display());
        }
    }
    println!("  term_grace: {:?}", timing.term_grace);
    println!("  kill_grace: {:?}", timing.kill_grace);
    println!("  launch_settle: {:?}", timing.launch_settle);

    debug!("dry-run complete (no execution)");
}
