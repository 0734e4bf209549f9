// src/proc/launch.rs

//! Detached process launching.
//!
//! The replacement process must outlive the watchdog invocation, so it is
//! spawned in its own process group with stdio detached, and the child
//! handle is dropped without ever being waited on.

use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::errors::Result;

/// Trait abstracting how the restart command is started, so tests can
/// record launches instead of spawning real processes.
pub trait Launcher: Send + Sync {
    fn launch(&self, command: &str) -> Result<()>;
}

/// Real launcher: `sh -c <command>`, detached.
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch(&self, command: &str) -> Result<()> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // Own process group: the child must not die with our terminal
            // session or receive signals aimed at the watchdog.
            .process_group(0);

        let child = cmd
            .spawn()
            .with_context(|| format!("spawning replacement process '{command}'"))?;

        // Deliberately not waited on; the child keeps running after we exit.
        drop(child);
        Ok(())
    }
}
